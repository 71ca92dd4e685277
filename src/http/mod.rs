mod request_ext;
mod response_body;

use std::sync::Arc;

pub use request_ext::HeaderExt;
pub use response_body::ResponseBody;

/// Extension type carrying the DER-encoded peer certificate presented during the TLS
/// handshake, inserted into the request by the listener.
///
/// Certificate validation (expiry, CA trust chain) happens in the TLS layer; client
/// certificate schemes only read the already-validated bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerCertificate(pub Arc<Vec<u8>>);
