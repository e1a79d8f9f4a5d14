use tonic::metadata::{KeyAndValueRef, MetadataMap};

/// Transport headers that travel next to application metadata.
const TRANSPORT_KEYS: &[&str] = &["content-type", "date", "te", "user-agent"];

/// Whether `key` is application metadata rather than a transport header or a
/// `grpc-*` protocol field.
pub fn is_application_key(key: &str) -> bool {
    !key.starts_with("grpc-") && !TRANSPORT_KEYS.contains(&key)
}

pub fn log_metadata(direction: &str, metadata: &MetadataMap) {
    for key_and_value in metadata.iter() {
        match key_and_value {
            KeyAndValueRef::Ascii(key, value) => {
                tracing::trace!(direction, key = key.as_str(), value = ?value, "metadata")
            }
            KeyAndValueRef::Binary(key, value) => {
                tracing::trace!(direction, key = key.as_str(), value = ?value, "binary metadata")
            }
        }
    }
}

/// Appends every entry of `md_from` to `md_into`, keeping repeated keys.
pub fn merge_metadata(md_into: &mut MetadataMap, md_from: &MetadataMap) {
    merge_metadata_filtered(md_into, md_from, |_| true)
}

/// Like [`merge_metadata`], but only for keys accepted by `keep`.
pub fn merge_metadata_filtered<F>(md_into: &mut MetadataMap, md_from: &MetadataMap, mut keep: F)
where
    F: FnMut(&str) -> bool,
{
    for key_and_value in md_from.iter() {
        match key_and_value {
            KeyAndValueRef::Ascii(key, value) => {
                if keep(key.as_str()) {
                    md_into.append(key.clone(), value.clone());
                }
            }
            KeyAndValueRef::Binary(key, value) => {
                if keep(key.as_str()) {
                    md_into.append_bin(key.clone(), value.clone());
                }
            }
        }
    }
}
