//! Outbound direction: metadata a gRPC backend sent back with its response.

use tonic::{metadata::MetadataMap, Response, Status};

use crate::{
    context::Context,
    grpc::util::{is_application_key, merge_metadata_filtered},
};

/// Metadata received from a gRPC backend.
///
/// `header_md` is what the backend sent before the response message,
/// `trailer_md` what it sent after it.
#[derive(Clone, Debug, Default)]
pub struct ServerMetadata {
    pub header_md: MetadataMap,
    pub trailer_md: MetadataMap,
}

struct ServerMetadataKey;

impl ServerMetadata {
    pub fn new(header_md: MetadataMap, trailer_md: MetadataMap) -> Self {
        ServerMetadata {
            header_md,
            trailer_md,
        }
    }

    /// Captures the metadata of a successful call.
    ///
    /// tonic merges the trailers of a unary call into the response metadata,
    /// so everything ends up in `header_md`. Transport headers and `grpc-*`
    /// fields are left out.
    pub fn from_response<T>(response: &Response<T>) -> Self {
        ServerMetadata {
            header_md: application_metadata(response.metadata()),
            trailer_md: MetadataMap::new(),
        }
    }

    /// Captures the metadata of a failed call, which arrives with the status
    /// in the trailers.
    pub fn from_status(status: &Status) -> Self {
        ServerMetadata {
            header_md: MetadataMap::new(),
            trailer_md: application_metadata(status.metadata()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.header_md.is_empty() && self.trailer_md.is_empty()
    }
}

fn application_metadata(md: &MetadataMap) -> MetadataMap {
    let mut filtered = MetadataMap::new();
    merge_metadata_filtered(&mut filtered, md, is_application_key);
    filtered
}

/// Derives a child of `ctx` carrying `md`. The record is attached even when
/// both maps are empty.
pub fn new_server_metadata_context(ctx: &Context, md: ServerMetadata) -> Context {
    ctx.with_value::<ServerMetadataKey, _>(md)
}

/// Returns the [`ServerMetadata`] attached to `ctx` or one of its ancestors.
///
/// Callers wanting the empty record on absence use
/// `server_metadata_from_context(&ctx).cloned().unwrap_or_default()`.
pub fn server_metadata_from_context(ctx: &Context) -> Option<&ServerMetadata> {
    ctx.value::<ServerMetadataKey, ServerMetadata>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    struct OtherKey;

    fn sample() -> ServerMetadata {
        let mut header_md = MetadataMap::new();
        header_md.insert("x-request-id", "42".parse().unwrap());
        let mut trailer_md = MetadataMap::new();
        trailer_md.append("x-cost", "1".parse().unwrap());
        trailer_md.append("x-cost", "2".parse().unwrap());
        ServerMetadata::new(header_md, trailer_md)
    }

    #[test]
    fn absent_metadata_reads_as_none() {
        let ctx = Context::background().with_value::<OtherKey, _>(ServerMetadata::default());
        assert!(server_metadata_from_context(&ctx).is_none());

        let md = server_metadata_from_context(&ctx)
            .cloned()
            .unwrap_or_default();
        assert!(md.header_md.is_empty());
        assert!(md.trailer_md.is_empty());
    }

    #[test]
    fn attached_metadata_reads_back() {
        let ctx = new_server_metadata_context(&Context::background(), sample());

        let md = server_metadata_from_context(&ctx).unwrap();
        assert_eq!(md.header_md.get("x-request-id").unwrap(), "42");
        assert_eq!(md.trailer_md.get_all("x-cost").iter().count(), 2);
        assert_eq!(
            md.header_md.clone().into_headers(),
            sample().header_md.into_headers()
        );
    }

    #[test]
    fn empty_record_is_still_attached() {
        let ctx = new_server_metadata_context(&Context::background(), ServerMetadata::default());
        let md = server_metadata_from_context(&ctx).unwrap();
        assert!(md.is_empty());
    }

    #[test]
    fn record_is_visible_from_descendants_only() {
        let base = Context::background();
        let ctx = new_server_metadata_context(&base, sample());
        let child = ctx.with_value::<OtherKey, _>(0u8);

        assert!(server_metadata_from_context(&child).is_some());
        assert!(server_metadata_from_context(&base).is_none());
    }

    #[test]
    fn reattaching_shadows_previous_record() {
        let first = new_server_metadata_context(&Context::background(), sample());
        let second = new_server_metadata_context(&first, ServerMetadata::default());

        assert!(server_metadata_from_context(&second).unwrap().is_empty());
        assert!(!server_metadata_from_context(&first).unwrap().is_empty());
    }

    #[test]
    fn captures_response_headers() {
        let mut response = Response::new(());
        response
            .metadata_mut()
            .insert("x-served-by", "backend-1".parse().unwrap());

        let md = ServerMetadata::from_response(&response);
        assert_eq!(md.header_md.get("x-served-by").unwrap(), "backend-1");
        assert!(md.trailer_md.is_empty());
    }

    #[test]
    fn capture_drops_transport_and_protocol_fields() {
        let mut response = Response::new(());
        let md = response.metadata_mut();
        md.insert("content-type", "application/grpc".parse().unwrap());
        md.insert("date", "Fri, 16 Oct 2026 10:00:00 GMT".parse().unwrap());
        md.insert("grpc-status", "0".parse().unwrap());
        md.insert("x-served-by", "backend-1".parse().unwrap());

        let md = ServerMetadata::from_response(&response);
        assert_eq!(md.header_md.len(), 1);
        assert_eq!(md.header_md.get("x-served-by").unwrap(), "backend-1");

        let mut status = Status::new(Code::Internal, "boom");
        status
            .metadata_mut()
            .insert("grpc-message", "boom".parse().unwrap());
        status
            .metadata_mut()
            .insert("x-reason", "overload".parse().unwrap());

        let md = ServerMetadata::from_status(&status);
        assert_eq!(md.trailer_md.len(), 1);
        assert_eq!(md.trailer_md.get("x-reason").unwrap(), "overload");
    }

    #[test]
    fn captures_status_trailers() {
        let mut status = Status::new(Code::NotFound, "missing");
        status
            .metadata_mut()
            .insert("x-reason", "gone".parse().unwrap());

        let md = ServerMetadata::from_status(&status);
        assert!(md.header_md.is_empty());
        assert_eq!(md.trailer_md.get("x-reason").unwrap(), "gone");
    }
}
