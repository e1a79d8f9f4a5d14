//! Inbound direction: turn HTTP request metadata into gRPC call metadata.
//!
//! [`annotate_context`] collects the client's remote address, the
//! `Authorization` header and every `Grpc-Metadata-*` header into a metadata
//! map and attaches it to a [`Context`] as outgoing metadata. The gRPC client
//! picks it up again through [`outgoing_metadata`].

use std::net::SocketAddr;

use hyper::Request;
use tonic::metadata::{Ascii, Binary, MetadataKey, MetadataMap, MetadataValue};

use crate::context::Context;

/// Headers carrying this prefix are forwarded with the prefix removed.
pub const METADATA_HEADER_PREFIX: &str = "Grpc-Metadata-";

/// Forwarded as is, without any prefix.
pub const AUTHORIZATION: &str = "Authorization";

/// Always the first forwarded pair.
pub const REMOTE_ADDR_KEY: &str = "RemoteAddr";

struct OutgoingMetadataKey;

/// Collects the key/value pairs a request forwards to the gRPC backend.
///
/// The first pair is always `("RemoteAddr", addr)`, where `addr` comes from
/// the [`SocketAddr`] request extension (empty when the extension is
/// missing). `RemoteAddr` is the one key with a fixed spelling. Every other
/// key is the header name as the HTTP layer presents it, which is lowercase
/// for `hyper` (`Grpc-Metadata-Session` arrives as `session`). Header names
/// are compared ignoring ASCII case. Key case is not significant further on,
/// because gRPC metadata keys are lowercase.
pub fn forwarded_pairs<B>(req: &Request<B>) -> Vec<(String, String)> {
    let remote_addr = req
        .extensions()
        .get::<SocketAddr>()
        .map(ToString::to_string)
        .unwrap_or_default();

    let mut pairs = vec![(REMOTE_ADDR_KEY.to_owned(), remote_addr)];

    for (name, value) in req.headers() {
        let name = name.as_str();
        let Ok(value) = value.to_str() else {
            tracing::debug!(header = name, "skipping header with non-ascii value");
            continue;
        };

        if name.eq_ignore_ascii_case(AUTHORIZATION) {
            pairs.push((name.to_owned(), value.to_owned()));
        } else if let Some(key) = strip_prefix_ignore_case(name, METADATA_HEADER_PREFIX) {
            if !key.is_empty() {
                pairs.push((key.to_owned(), value.to_owned()));
            }
        }
    }

    pairs
}

/// Attaches the request's forwarded metadata to `ctx`.
///
/// When the request carries no `Authorization` or `Grpc-Metadata-*` header,
/// `ctx` itself is returned, not a child wrapping only the remote address.
pub fn annotate_context<B>(ctx: &Context, req: &Request<B>) -> Context {
    let pairs = forwarded_pairs(req);
    if pairs.len() <= 1 {
        return ctx.clone();
    }
    new_outgoing_context(ctx, metadata_from_pairs(&pairs))
}

/// Derives a child of `ctx` carrying `md` as outgoing metadata, replacing
/// whatever an ancestor carried.
pub fn new_outgoing_context(ctx: &Context, md: MetadataMap) -> Context {
    ctx.with_value::<OutgoingMetadataKey, _>(md)
}

pub fn outgoing_metadata(ctx: &Context) -> Option<&MetadataMap> {
    ctx.value::<OutgoingMetadataKey, MetadataMap>()
}

/// Builds a metadata map from ordered pairs, keeping repeated keys.
///
/// Keys ending in `-bin` are stored as binary metadata. Pairs that are not
/// valid gRPC metadata are dropped.
pub fn metadata_from_pairs(pairs: &[(String, String)]) -> MetadataMap {
    let mut md = MetadataMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        if key.to_ascii_lowercase().ends_with("-bin") {
            match MetadataKey::<Binary>::from_bytes(key.as_bytes()) {
                Ok(key) => {
                    md.append_bin(key, MetadataValue::from_bytes(value.as_bytes()));
                }
                Err(e) => {
                    tracing::debug!(key = %key, error = ?e, "skipping invalid metadata key")
                }
            }
            continue;
        }

        let name = match MetadataKey::<Ascii>::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(key = %key, error = ?e, "skipping invalid metadata key");
                continue;
            }
        };
        let val = match value.parse::<MetadataValue<Ascii>>() {
            Ok(val) => val,
            Err(e) => {
                tracing::debug!(key = %key, error = ?e, "skipping invalid metadata value");
                continue;
            }
        };
        md.append(name, val);
    }
    md
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}
