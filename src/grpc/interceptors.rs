use tonic::{Request, Status};

use super::util::merge_metadata;
use crate::{annotate::outgoing_metadata, context::Context};

/// Client interceptor: applies the outgoing metadata of the [`Context`]
/// found in the request extensions. Requests without a context pass through
/// untouched.
pub fn forward_context(mut req: Request<()>) -> Result<Request<()>, Status> {
    let Some(context) = req.extensions().get::<Context>().cloned() else {
        return Ok(req);
    };

    if let Some(metadata) = outgoing_metadata(&context) {
        merge_metadata(req.metadata_mut(), metadata);
    }

    Ok(req)
}
