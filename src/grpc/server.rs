//! Demo backend: answers `echo.Echo/Ping` and sends the custom metadata it
//! received back as response headers. Credentials are never echoed; the reply
//! only reports whether the call carried them.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{transport::Server, Request, Response, Status};

use super::{
    rpc::{
        echo_server::{Echo, EchoServer},
        PingReply, PingRequest,
    },
    util::{is_application_key, log_metadata, merge_metadata_filtered},
};
use crate::error::Result;

const AUTHORIZATION_KEY: &str = "authorization";

#[derive(Debug, Default)]
pub struct EchoService {}

#[tonic::async_trait]
impl Echo for EchoService {
    async fn ping(
        &self,
        request: Request<PingRequest>,
    ) -> std::result::Result<Response<PingReply>, Status> {
        log_metadata("request", request.metadata());

        let mut response = Response::new(PingReply {
            message: request.get_ref().message.clone(),
            authorized: request.metadata().contains_key(AUTHORIZATION_KEY),
        });
        // propagate custom metadata to response
        merge_metadata_filtered(response.metadata_mut(), request.metadata(), is_echoed);
        Ok(response)
    }
}

fn is_echoed(key: &str) -> bool {
    key != AUTHORIZATION_KEY && is_application_key(key)
}

pub async fn run(addr: SocketAddr) -> Result<()> {
    tracing::info!(%addr, "echo backend listening");
    Server::builder()
        .add_service(EchoServer::new(EchoService::default()))
        .serve(addr)
        .await?;

    Ok(())
}

/// Serves the backend on an already bound listener.
pub async fn serve(listener: TcpListener) -> Result<()> {
    Server::builder()
        .add_service(EchoServer::new(EchoService::default()))
        .serve_with_incoming(TcpListenerStream::new(listener))
        .await?;

    Ok(())
}
