//! Carries HTTP request metadata into gRPC calls, and gRPC response metadata
//! back out, on a request-scoped [`context::Context`].

pub mod annotate;
pub mod context;
pub mod error;
pub mod gateway;
pub mod response;
pub mod server_metadata;

pub mod grpc {
    pub mod client;
    pub mod interceptors;
    pub mod rpc;
    pub mod server;
    pub mod util;
}

pub use annotate::{annotate_context, outgoing_metadata};
pub use context::Context;
pub use server_metadata::{
    new_server_metadata_context, server_metadata_from_context, ServerMetadata,
};
