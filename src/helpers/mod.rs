//! Pure helpers used to assemble a request.
//!
//! None of these functions fail: they assume their inputs already passed the
//! [`validators`](crate::validators).

mod headers;
mod url;

pub use headers::merge_headers_with_defaults;
pub use url::{
    append_query_string, encode_query_string, merge_base_url_and_endpoint_template,
    replace_path_params,
};

use crate::clients::{RawResponse, RawTransportError};

/// Passes 2xx responses through and turns any other status into a
/// transport error carrying the response.
///
/// # Errors
///
/// Returns [`RawTransportError::status`] for non-2xx responses.
pub fn check_response(raw: RawResponse) -> Result<RawResponse, RawTransportError> {
    if (200..=299).contains(&raw.status) {
        Ok(raw)
    } else {
        Err(RawTransportError::status(raw))
    }
}
