//! h2c upgrade negotiation.
//!
//! A cleartext HTTP/1.1 request may opt into HTTP/2 on the same
//! connection. This module checks the request for a well-formed
//! upgrade offer and, when one is present, writes the fixed
//! 101 Switching Protocols interim response.

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use tracing::{debug, trace};

use crate::protocol::lock_protocol;
use crate::request::{Request, Response};
use crate::Config;

/// Check for an h2c upgrade offer and answer it.
///
/// Returns `true` when the connection switches to HTTP/2. The offer is
/// accepted only on a cleartext connection carrying an `Upgrade: h2c`
/// header, a `Connection` header listing the `upgrade` token, and an
/// `HTTP2-Settings` header. The protocol name comparison is
/// case-sensitive per RFC 7540 section 3.2.
///
/// The 101 write is fire-and-forget: a failed or short send is logged
/// and the switch still happens, the connection dying on its own.
pub fn negotiate_h2c(config: &Config, request: &Request, response: &mut Response) -> bool {
    if lock_protocol(&request.prot).socket().is_secure() {
        return false;
    }

    let upgrade = match request.headers.get("upgrade") {
        Some(value) => value,
        None => return false,
    };
    let connection = match request.headers.get("connection") {
        Some(value) => value,
        None => return false,
    };

    let offers_upgrade = connection
        .split(',')
        .any(|token| token.trim().eq_ignore_ascii_case("upgrade"));
    if !offers_upgrade {
        trace!(%connection, "connection header lacks upgrade token");
        return false;
    }

    if upgrade != "h2c" {
        trace!(%upgrade, "unsupported upgrade target");
        return false;
    }

    if !request.headers.contains("http2-settings") {
        return false;
    }

    response
        .headers
        .insert("connection".to_string(), "upgrade".to_string());
    response
        .headers
        .insert("upgrade".to_string(), "h2c".to_string());

    let interim = build_switching_protocols();
    let mut prot = lock_protocol(&request.prot);
    match prot.socket_mut().send_timeout(&interim, config.upgrade_send_timeout) {
        Ok(sent) if sent == interim.len() => {
            debug!("switching connection to h2c");
        }
        Ok(sent) => {
            debug!(sent, expected = interim.len(), "short 101 write");
        }
        Err(error) => {
            debug!(%error, "101 write failed");
        }
    }
    true
}

/// Serialize the fixed 101 interim response.
fn build_switching_protocols() -> bytes::Bytes {
    let status = StatusCode::SWITCHING_PROTOCOLS;
    let mut buf = BytesMut::with_capacity(72);
    buf.put_slice(b"HTTP/1.1 ");
    buf.put_slice(status.as_str().as_bytes());
    buf.put_slice(b" ");
    buf.put_slice(
        status
            .canonical_reason()
            .unwrap_or("Switching Protocols")
            .as_bytes(),
    );
    buf.put_slice(b"\r\nConnection: Upgrade\r\nUpgrade: h2c\r\n\r\n");
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multimap::MultiMap;
    use crate::protocol::{share, ProtocolVariant, ServerHttp1, ServerProtocol};
    use crate::socket::testing::MockAdapter;

    fn request_with_headers(adapter: MockAdapter, headers: &[(&str, &str)]) -> (Request, Response) {
        let prot = share(ServerProtocol::Http1(ServerHttp1::new(Box::new(adapter))));
        let mut map = MultiMap::new();
        for (key, value) in headers {
            map.insert(*key, value.to_string());
        }
        let request = Request {
            prot: prot.clone(),
            variant: ProtocolVariant::Http1,
            document_root: "/var/www".to_string(),
            host: "example.com".to_string(),
            path: "/".to_string(),
            method: "GET".to_string(),
            params: MultiMap::new(),
            headers: map,
            data: MultiMap::new(),
            files: MultiMap::new(),
            cookies: MultiMap::new(),
        };
        let response = Response::new(prot, ProtocolVariant::Http1);
        (request, response)
    }

    const OFFER: &[(&str, &str)] = &[
        ("upgrade", "h2c"),
        ("connection", "Upgrade, HTTP2-Settings"),
        ("http2-settings", "AAMAAABkAARAAAAA"),
    ];

    #[test]
    fn test_upgrade_accepted() {
        let adapter = MockAdapter::new();
        let (request, mut response) = request_with_headers(adapter.clone(), OFFER);

        assert!(negotiate_h2c(&Config::default(), &request, &mut response));
        assert_eq!(response.headers.get("connection").map(String::as_str), Some("upgrade"));
        assert_eq!(response.headers.get("upgrade").map(String::as_str), Some("h2c"));
        assert!(response.status.is_none());

        assert_eq!(
            adapter.sent(),
            b"HTTP/1.1 101 Switching Protocols\r\nConnection: Upgrade\r\nUpgrade: h2c\r\n\r\n"
        );
    }

    #[test]
    fn test_secure_connection_never_upgrades() {
        let adapter = MockAdapter::secure();
        let (request, mut response) = request_with_headers(adapter.clone(), OFFER);

        assert!(!negotiate_h2c(&Config::default(), &request, &mut response));
        assert!(adapter.sent().is_empty());
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_missing_upgrade_header() {
        let (request, mut response) = request_with_headers(
            MockAdapter::new(),
            &[("connection", "upgrade"), ("http2-settings", "x")],
        );
        assert!(!negotiate_h2c(&Config::default(), &request, &mut response));
    }

    #[test]
    fn test_connection_without_upgrade_token() {
        let (request, mut response) = request_with_headers(
            MockAdapter::new(),
            &[
                ("upgrade", "h2c"),
                ("connection", "keep-alive"),
                ("http2-settings", "x"),
            ],
        );
        assert!(!negotiate_h2c(&Config::default(), &request, &mut response));
    }

    #[test]
    fn test_protocol_name_is_case_sensitive() {
        let (request, mut response) = request_with_headers(
            MockAdapter::new(),
            &[
                ("upgrade", "H2C"),
                ("connection", "upgrade"),
                ("http2-settings", "x"),
            ],
        );
        assert!(!negotiate_h2c(&Config::default(), &request, &mut response));
    }

    #[test]
    fn test_missing_settings_header() {
        let (request, mut response) = request_with_headers(
            MockAdapter::new(),
            &[("upgrade", "h2c"), ("connection", "upgrade")],
        );
        assert!(!negotiate_h2c(&Config::default(), &request, &mut response));
    }

    #[test]
    fn test_failed_send_still_switches() {
        let adapter = MockAdapter::failing();
        let (request, mut response) = request_with_headers(adapter.clone(), OFFER);

        assert!(negotiate_h2c(&Config::default(), &request, &mut response));
        assert!(adapter.sent().is_empty());
    }
}
