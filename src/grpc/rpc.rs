//! Messages of the `echo.Echo` demo service. Client and server stubs are
//! generated by build.rs.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PingRequest {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PingReply {
    #[prost(string, tag = "1")]
    pub message: ::prost::alloc::string::String,
    /// Whether the call carried `authorization` metadata.
    #[prost(bool, tag = "2")]
    pub authorized: bool,
}

include!(concat!(env!("OUT_DIR"), "/echo.Echo.rs"));
