use tonic::{
    transport::{Channel, Endpoint},
    Request, Response, Status,
};

use super::{
    interceptors::forward_context,
    rpc::{echo_client::EchoClient, PingReply, PingRequest},
    util::log_metadata,
};
use crate::{context::Context, error::Result};

pub async fn connect(port: u16) -> Result<Channel> {
    let channel = Endpoint::from_shared(port_to_url(port))?.connect().await?;
    Ok(channel)
}

/// Channel that connects on first use, so the gateway can start before its
/// backend does.
pub fn connect_lazy(port: u16) -> Result<Channel> {
    Ok(Endpoint::from_shared(port_to_url(port))?.connect_lazy())
}

/// Calls `echo.Echo/Ping`, forwarding the outgoing metadata carried by `ctx`.
pub async fn ping(
    channel: Channel,
    ctx: Context,
    message: String,
) -> std::result::Result<Response<PingReply>, Status> {
    let mut request = Request::new(PingRequest { message });
    request.extensions_mut().insert(ctx);

    let mut client = EchoClient::with_interceptor(channel, forward_context);
    let response = client.ping(request).await?;
    log_metadata("response", response.metadata());
    Ok(response)
}

fn port_to_url(port: u16) -> String {
    format!("http://127.0.0.1:{}", port)
}
