//! Surfaces captured [`ServerMetadata`] on the HTTP response.

use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use tonic::metadata::{KeyAndValueRef, MetadataMap};

use crate::server_metadata::ServerMetadata;

pub use crate::annotate::METADATA_HEADER_PREFIX;

/// Prefix for backend trailers written back as response headers.
pub const METADATA_TRAILER_PREFIX: &str = "Grpc-Trailer-";

/// Writes header metadata as `Grpc-Metadata-<key>` and trailer metadata as
/// `Grpc-Trailer-<key>` into `headers`. Binary values keep their base64
/// wire encoding.
pub fn apply_server_metadata(md: &ServerMetadata, headers: &mut HeaderMap) {
    append_prefixed(headers, METADATA_HEADER_PREFIX, &md.header_md);
    append_prefixed(headers, METADATA_TRAILER_PREFIX, &md.trailer_md);
}

fn append_prefixed(headers: &mut HeaderMap, prefix: &str, md: &MetadataMap) {
    for key_and_value in md.iter() {
        let (key, value) = match key_and_value {
            KeyAndValueRef::Ascii(k, v) => (k.as_str(), v.as_encoded_bytes()),
            KeyAndValueRef::Binary(k, v) => (k.as_str(), v.as_encoded_bytes()),
        };

        let name = match HeaderName::from_bytes(format!("{prefix}{key}").as_bytes()) {
            Ok(name) => name,
            Err(e) => {
                tracing::debug!(key, error = ?e, "skipping metadata with invalid header name");
                continue;
            }
        };
        let value = match HeaderValue::from_bytes(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key, error = ?e, "skipping metadata with invalid header value");
                continue;
            }
        };
        headers.append(name, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::metadata::MetadataValue;

    #[test]
    fn headers_and_trailers_get_their_prefix() {
        let mut header_md = MetadataMap::new();
        header_md.insert("x-request-id", "42".parse().unwrap());
        let mut trailer_md = MetadataMap::new();
        trailer_md.append("x-cost", "1".parse().unwrap());
        trailer_md.append("x-cost", "2".parse().unwrap());

        let mut headers = HeaderMap::new();
        apply_server_metadata(&ServerMetadata::new(header_md, trailer_md), &mut headers);

        assert_eq!(headers.get("grpc-metadata-x-request-id").unwrap(), "42");
        let costs: Vec<_> = headers.get_all("grpc-trailer-x-cost").iter().collect();
        assert_eq!(costs, ["1", "2"]);
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn binary_values_stay_encoded() {
        let mut header_md = MetadataMap::new();
        header_md.insert_bin("trace-bin", MetadataValue::from_bytes(b"raw"));

        let mut headers = HeaderMap::new();
        apply_server_metadata(
            &ServerMetadata::new(header_md, MetadataMap::new()),
            &mut headers,
        );

        assert_eq!(headers.get("grpc-metadata-trace-bin").unwrap(), "cmF3");
    }

    #[test]
    fn empty_record_writes_nothing() {
        let mut headers = HeaderMap::new();
        apply_server_metadata(&ServerMetadata::default(), &mut headers);
        assert!(headers.is_empty());
    }
}
