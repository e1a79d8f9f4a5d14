//! HTTP front end for the echo backend.
//!
//! Every request is annotated with its forwarded metadata, sent to the
//! backend as a `Ping` carrying the request body, and answered with the
//! backend's reply. Metadata the backend sent back is surfaced as
//! `Grpc-Metadata-*` / `Grpc-Trailer-*` response headers.

use std::{convert::Infallible, net::SocketAddr};

use hyper::{
    server::conn::AddrStream,
    service::make_service_fn,
    Body, Request, Response, Server, StatusCode,
};
use tonic::{transport::Channel, Code};

use crate::{
    annotate::annotate_context,
    context::Context,
    error::Result,
    grpc::client,
    response::apply_server_metadata,
    server_metadata::{
        new_server_metadata_context, server_metadata_from_context, ServerMetadata,
    },
};

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub listen: SocketAddr,
    pub backend_port: u16,
}

pub async fn run(config: GatewayConfig) -> Result<()> {
    let backend = client::connect_lazy(config.backend_port)?;
    let listener = std::net::TcpListener::bind(config.listen)?;
    tracing::info!(addr = %config.listen, backend_port = config.backend_port, "gateway listening");
    serve(listener, backend).await
}

/// Serves the gateway on an already bound listener.
pub async fn serve(listener: std::net::TcpListener, backend: Channel) -> Result<()> {
    let make_svc = make_service_fn(move |conn: &AddrStream| {
        let backend = backend.clone();
        let remote_addr = conn.remote_addr();
        async move {
            Ok::<_, Infallible>(tower::service_fn(move |req| {
                handle(backend.clone(), remote_addr, req)
            }))
        }
    });

    Server::from_tcp(listener)?.serve(make_svc).await?;
    Ok(())
}

pub async fn handle(
    backend: Channel,
    remote_addr: SocketAddr,
    mut req: Request<Body>,
) -> std::result::Result<Response<Body>, Infallible> {
    req.extensions_mut().insert(remote_addr);
    let ctx = annotate_context(&Context::background(), &req);

    let message = match hyper::body::to_bytes(req.into_body()).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(%remote_addr, error = %e, "failed to read request body");
            return Ok(plain(StatusCode::BAD_REQUEST, e.to_string()));
        }
    };

    let (status, body, md) = match client::ping(backend, ctx.clone(), message).await {
        Ok(response) => {
            let md = ServerMetadata::from_response(&response);
            (StatusCode::OK, response.into_inner().message, md)
        }
        Err(status) => {
            tracing::warn!(
                %remote_addr,
                code = ?status.code(),
                error_message = status.message(),
                "backend call failed"
            );
            (
                http_status_from_code(status.code()),
                status.message().to_owned(),
                ServerMetadata::from_status(&status),
            )
        }
    };
    let ctx = new_server_metadata_context(&ctx, md);

    let mut response = plain(status, body);
    if let Some(md) = server_metadata_from_context(&ctx).filter(|md| !md.is_empty()) {
        apply_server_metadata(md, response.headers_mut());
    }
    tracing::info!(%remote_addr, status = status.as_u16(), "request completed");
    Ok(response)
}

/// HTTP status answered for a failed backend call.
pub fn http_status_from_code(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        Code::Cancelled => StatusCode::REQUEST_TIMEOUT,
        Code::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::FailedPrecondition => StatusCode::BAD_REQUEST,
        Code::Aborted => StatusCode::CONFLICT,
        Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn plain(status: StatusCode, body: String) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
}
