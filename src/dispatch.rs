//! Descriptor decoding and protocol dispatch.
//!
//! The front end serializes each accepted request into a binary
//! descriptor; [`decode_request`] turns one descriptor plus its socket
//! into a typed request/response pair for the matching protocol.

use tracing::{debug, trace};

use crate::decode::Reader;
use crate::error::{Error, Result};
use crate::http2::{ConnectionSettings, DynamicTable, LockRegistry, Stream};
use crate::multimap::MultiMap;
use crate::protocol::{share, ProtocolVariant, ServerHttp1, ServerHttp2, ServerProtocol};
use crate::query::{extract_query_params, parse_cookies};
use crate::request::{Request, Response};
use crate::socket::SocketAdapter;
use crate::Config;

/// Decode a request descriptor into a request/response pair.
///
/// Descriptor layout, in order: protocol tag, document root, host,
/// path, method, then for HTTP/2 the stream block (stream id, six
/// connection settings, table seed, lock token), then headers, form
/// data and uploaded files.
///
/// On any error nothing is allocated for the caller: the socket is
/// dropped and no half-built pair escapes.
pub fn decode_request(
    config: &Config,
    locks: &LockRegistry,
    descriptor: &[u8],
    socket: Box<dyn SocketAdapter>,
) -> Result<(Request, Response)> {
    let mut reader = Reader::new(descriptor, config);

    let tag = reader.read_u64()?;
    let variant = ProtocolVariant::from_tag(tag).ok_or(Error::UnknownVariant(tag))?;

    let document_root = reader.read_string()?;
    let host = reader.read_string()?;
    let path = reader.read_string()?;
    let method = reader.read_string()?;

    let stream = match variant {
        ProtocolVariant::Http1 => None,
        ProtocolVariant::Http2 => Some(read_stream_block(&mut reader, locks)?),
    };

    let headers: MultiMap = reader
        .read_pairs()?
        .into_iter()
        .map(|(key, value)| (key.to_ascii_lowercase(), value))
        .collect();
    let data = reader.read_multimap()?;
    let files = reader.read_files()?;

    let cookies = headers
        .get("cookie")
        .map(|value| parse_cookies(value))
        .unwrap_or_default();
    let params = extract_query_params(&path);

    let protocol = match stream {
        None => ServerProtocol::Http1(ServerHttp1::new(socket)),
        Some(stream) => ServerProtocol::Http2(ServerHttp2::new(socket, stream)),
    };
    let prot = share(protocol);

    trace!(
        protocol = %variant,
        %method,
        %path,
        headers = headers.len(),
        "request decoded"
    );

    let response = Response::new(prot.clone(), variant);
    let request = Request {
        prot,
        variant,
        document_root,
        host,
        path,
        method,
        params,
        headers,
        data,
        files,
        cookies,
    };
    Ok((request, response))
}

/// Read the HTTP/2 stream block and resolve its cross-stream lock.
fn read_stream_block(reader: &mut Reader<'_>, locks: &LockRegistry) -> Result<Stream> {
    let id = reader.read_u32()?;

    let settings = ConnectionSettings {
        header_table_size: reader.read_u32()?,
        enable_push: reader.read_u32()?,
        max_concurrent_streams: reader.read_u32()?,
        initial_window_size: reader.read_u32()?,
        max_frame_size: reader.read_u32()?,
        max_header_list_size: reader.read_u32()?,
    };

    let seed = reader.read_pairs()?;
    let token = reader.read_handle()?;
    let lock = locks.get(token).ok_or(Error::UnknownLockToken(token))?;

    let table = DynamicTable::seeded(
        settings.header_table_size,
        settings.max_header_list_size,
        seed,
    );
    debug!(stream = id, seeded = table.len(), "stream block decoded");

    Ok(Stream::new(id, settings, table, lock))
}
