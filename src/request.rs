//! Request and response records produced by descriptor decoding.

use std::collections::HashMap;

use http::StatusCode;

use crate::files::FileIncoming;
use crate::multimap::MultiMap;
use crate::protocol::{ProtocolHandle, ProtocolVariant};

/// A decoded request, ready for routing.
///
/// Header keys are normalized to lowercase at decode time; every other
/// field is carried as the descriptor delivered it, with query
/// parameters and cookies already extracted.
#[derive(Debug)]
pub struct Request {
    /// Shared protocol object, cloned into the paired [`Response`]
    pub prot: ProtocolHandle,
    /// Protocol this request arrived over
    pub variant: ProtocolVariant,
    /// Serving root configured for the host
    pub document_root: String,
    /// Value of the Host header or :authority pseudo-header
    pub host: String,
    /// Request target, query and fragment included
    pub path: String,
    /// Request method verbatim
    pub method: String,
    /// Query parameters extracted from `path`
    pub params: MultiMap,
    /// Headers, keys lowercased, duplicates preserved
    pub headers: MultiMap,
    /// Form data fields
    pub data: MultiMap,
    /// Uploaded files keyed by form field name
    pub files: MultiMap<FileIncoming>,
    /// Cookies parsed from the Cookie header
    pub cookies: MultiMap,
}

/// The response under construction for a decoded request.
#[derive(Debug)]
pub struct Response {
    /// Shared protocol object, same allocation as the request's
    pub prot: ProtocolHandle,
    /// Protocol the response will be written over
    pub variant: ProtocolVariant,
    /// Outgoing headers; later inserts overwrite earlier ones
    pub headers: HashMap<String, String>,
    /// Status chosen by a handler, unset until one decides
    pub status: Option<StatusCode>,
}

impl Response {
    pub fn new(prot: ProtocolHandle, variant: ProtocolVariant) -> Self {
        Self {
            prot,
            variant,
            headers: HashMap::new(),
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{share, ServerHttp1, ServerProtocol};
    use crate::socket::testing::MockAdapter;

    #[test]
    fn test_response_starts_without_status() {
        let handle = share(ServerProtocol::Http1(ServerHttp1::new(Box::new(
            MockAdapter::new(),
        ))));
        let response = Response::new(handle, ProtocolVariant::Http1);
        assert!(response.status.is_none());
        assert!(response.headers.is_empty());

        let mut response = response;
        response.status = Some(StatusCode::NOT_FOUND);
        assert_eq!(response.status.map(|s| s.as_u16()), Some(404));
    }
}
