//! Error taxonomy shared by every operation.
//!
//! Every failure is a [`DavError`]. Callers that only care about the flat
//! `(code, description)` pair can convert any outcome into a
//! [`NormalizedError`]; callers that want to branch on the cause use
//! [`DavError::kind`].

use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use hyper::StatusCode;
use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::Value;
use thiserror::Error;

use crate::webdav::streaming::resolve_reference;

/// Numeric codes compatible with the platform URL-loading error space.
pub mod codes {
    pub const SUCCESS: i32 = 0;
    pub const UNKNOWN: i32 = -1;
    pub const CANCELLED: i32 = -999;
    pub const BAD_URL: i32 = -1000;
    pub const TIMED_OUT: i32 = -1001;
    pub const UNSUPPORTED_URL: i32 = -1002;
    pub const CANNOT_FIND_HOST: i32 = -1003;
    pub const CANNOT_CONNECT_TO_HOST: i32 = -1004;
    pub const NETWORK_CONNECTION_LOST: i32 = -1005;
    pub const NOT_CONNECTED_TO_INTERNET: i32 = -1009;
    pub const BAD_SERVER_RESPONSE: i32 = -1011;
    pub const CANNOT_DECODE_CONTENT: i32 = -1016;
    pub const CANNOT_PARSE_RESPONSE: i32 = -1017;
    pub const REQUEST_BODY_STREAM_EXHAUSTED: i32 = -1021;
    pub const CANNOT_ENCODE_REQUEST: i32 = -1103;
    pub const SECURE_CONNECTION_FAILED: i32 = -1200;
    pub const CANNOT_CREATE_FILE: i32 = -3000;
    pub const CANNOT_OPEN_FILE: i32 = -3001;
    pub const CANNOT_WRITE_TO_FILE: i32 = -3003;
}

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection, TLS, timeout or cancellation; no usable HTTP status.
    Transport,
    /// The server answered with a status outside `200..300`.
    Protocol,
    /// Request could not be built, or a successful response was unusable.
    Structural,
}

#[derive(Debug, Error)]
pub enum DavError {
    #[error("{description}")]
    Transport { code: i32, description: String },

    #[error("{description}")]
    Protocol { status: u16, description: String },

    #[error("Invalid server url")]
    BadUrl { input: String },

    #[error("Invalid date format")]
    InvalidDate,

    #[error("Invalid response, error decode XML")]
    MissingBody,

    #[error("Cannot encode request: {0}")]
    Encoding(String),

    #[error("{}: {source}", path.display())]
    LocalFile {
        path: PathBuf,
        code: i32,
        #[source]
        source: io::Error,
    },
}

impl DavError {
    pub fn bad_url(input: impl Into<String>) -> Self {
        DavError::BadUrl {
            input: input.into(),
        }
    }

    pub fn cancelled() -> Self {
        DavError::Transport {
            code: codes::CANCELLED,
            description: "cancelled".to_string(),
        }
    }

    pub fn timed_out() -> Self {
        DavError::Transport {
            code: codes::TIMED_OUT,
            description: "The request timed out.".to_string(),
        }
    }

    pub fn undecodable(err: impl std::fmt::Display) -> Self {
        DavError::Transport {
            code: codes::CANNOT_DECODE_CONTENT,
            description: format!("cannot decode raw data: {err}"),
        }
    }

    /// Map a failure while reading a response body.
    ///
    /// Corrupt encoded data is a decoding failure; anything else is the
    /// connection giving out and keeps its transport cause.
    pub fn from_body_read(err: &io::Error) -> Self {
        if err.kind() == io::ErrorKind::InvalidData {
            DavError::undecodable(err)
        } else {
            DavError::from_transport(err)
        }
    }

    pub(crate) fn local_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DavError::LocalFile {
            path: path.into(),
            code: codes::CANNOT_OPEN_FILE,
            source,
        }
    }

    pub(crate) fn local_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let code = match source.kind() {
            io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                codes::CANNOT_CREATE_FILE
            }
            _ => codes::CANNOT_WRITE_TO_FILE,
        };
        DavError::LocalFile {
            path: path.into(),
            code,
            source,
        }
    }

    /// Build a protocol error from a failed status and whatever body came with it.
    pub fn protocol(status: StatusCode, body: &[u8]) -> Self {
        let description = server_message(body).unwrap_or_else(|| generic_status_phrase(status));
        DavError::Protocol {
            status: status.as_u16(),
            description,
        }
    }

    /// Map an error raised while talking to the server into a transport error.
    ///
    /// The whole source chain is inspected; the innermost recognisable cause wins.
    pub fn from_transport(err: &(dyn StdError + 'static)) -> Self {
        let description = chain_description(err);
        let mut code = codes::UNKNOWN;
        let mut cursor: Option<&(dyn StdError + 'static)> = Some(err);

        while let Some(current) = cursor {
            if let Some(io_err) = current.downcast_ref::<io::Error>() {
                let recognised = io_error_code(io_err);
                if recognised != codes::UNKNOWN {
                    code = recognised;
                }
            }
            cursor = current.source();
        }

        if code == codes::UNKNOWN {
            let lower = description.to_ascii_lowercase();
            if lower.contains("dns error") || lower.contains("failed to lookup address") {
                code = codes::CANNOT_FIND_HOST;
            } else if lower.contains("certificate") || lower.contains("tls") {
                code = codes::SECURE_CONNECTION_FAILED;
            } else if lower.contains("connection closed")
                || lower.contains("incomplete message")
                || lower.contains("end of file before message length")
            {
                code = codes::NETWORK_CONNECTION_LOST;
            } else if lower.contains("client error (connect)") {
                code = codes::CANNOT_CONNECT_TO_HOST;
            }
        }

        DavError::Transport { code, description }
    }

    pub fn code(&self) -> i32 {
        match self {
            DavError::Transport { code, .. } => *code,
            DavError::Protocol { status, .. } => i32::from(*status),
            DavError::BadUrl { .. } => codes::BAD_URL,
            DavError::InvalidDate | DavError::MissingBody => codes::BAD_SERVER_RESPONSE,
            DavError::Encoding(_) => codes::CANNOT_ENCODE_REQUEST,
            DavError::LocalFile { code, .. } => *code,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DavError::Transport { .. } => ErrorKind::Transport,
            DavError::Protocol { .. } => ErrorKind::Protocol,
            _ => ErrorKind::Structural,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, DavError::Transport { code, .. } if *code == codes::CANCELLED)
    }

    /// HTTP status for protocol errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DavError::Protocol { status, .. } => StatusCode::from_u16(*status).ok(),
            _ => None,
        }
    }

    pub fn normalized(&self) -> NormalizedError {
        NormalizedError {
            code: self.code(),
            description: self.to_string(),
        }
    }
}

/// Flat `(code, description)` view of an outcome. Code `0` means success.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NormalizedError {
    pub code: i32,
    pub description: String,
}

impl NormalizedError {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.code == codes::SUCCESS
    }

    pub fn from_result<T>(result: &Result<T, DavError>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(err) => err.normalized(),
        }
    }
}

impl From<&DavError> for NormalizedError {
    fn from(err: &DavError) -> Self {
        err.normalized()
    }
}

impl From<DavError> for NormalizedError {
    fn from(err: DavError) -> Self {
        err.normalized()
    }
}

/// Classify one exchange.
///
/// A transport failure always wins; the status is only looked at when the
/// exchange actually completed.
pub fn classify_exchange(
    transport: Option<DavError>,
    status: Option<StatusCode>,
    body: &[u8],
) -> Result<(), DavError> {
    if let Some(err) = transport {
        return Err(err);
    }
    match status {
        Some(status) if status.is_success() => Ok(()),
        Some(status) => Err(DavError::protocol(status, body)),
        None => Err(DavError::Transport {
            code: codes::CANNOT_PARSE_RESPONSE,
            description: "no response from server".to_string(),
        }),
    }
}

fn io_error_code(err: &io::Error) -> i32 {
    match err.kind() {
        io::ErrorKind::TimedOut => codes::TIMED_OUT,
        io::ErrorKind::ConnectionRefused => codes::CANNOT_CONNECT_TO_HOST,
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe
        | io::ErrorKind::UnexpectedEof => codes::NETWORK_CONNECTION_LOST,
        io::ErrorKind::NotConnected
        | io::ErrorKind::NetworkUnreachable
        | io::ErrorKind::HostUnreachable => codes::NOT_CONNECTED_TO_INTERNET,
        io::ErrorKind::AddrNotAvailable => codes::CANNOT_FIND_HOST,
        io::ErrorKind::InvalidData => codes::SECURE_CONNECTION_FAILED,
        _ => codes::UNKNOWN,
    }
}

fn chain_description(err: &(dyn StdError + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut cursor = err.source();
    while let Some(current) = cursor {
        let text = current.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        cursor = current.source();
    }
    parts.join(": ")
}

fn generic_status_phrase(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_ascii_lowercase(),
        None => format!("HTTP status {}", status.as_u16()),
    }
}

/// Pull a human-readable message out of a server error body.
///
/// Understands the Sabre XML error document (`<s:message>`, falling back to
/// `<s:exception>`) and the OCS JSON envelope (`ocs.meta.message`).
pub fn server_message(body: &[u8]) -> Option<String> {
    let first = body.iter().find(|b| !b.is_ascii_whitespace())?;
    match first {
        b'{' => ocs_message(body),
        b'<' => sabre_message(body),
        _ => None,
    }
}

fn ocs_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = value.pointer("/ocs/meta/message")?.as_str()?.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

fn sabre_message(body: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut current: Option<&'static str> = None;
    let mut message = String::new();
    let mut exception = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                current = if name.as_ref().eq_ignore_ascii_case(b"message") {
                    Some("message")
                } else if name.as_ref().eq_ignore_ascii_case(b"exception") {
                    Some("exception")
                } else {
                    None
                };
            }
            Ok(Event::Text(e)) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                match current {
                    Some("message") => message.push_str(&text),
                    Some("exception") => exception.push_str(&text),
                    _ => {}
                }
            }
            Ok(Event::GeneralRef(e)) => {
                let text = resolve_reference(&e).unwrap_or_default();
                match current {
                    Some("message") => message.push_str(&text),
                    Some("exception") => exception.push_str(&text),
                    _ => {}
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    let message = message.trim();
    if !message.is_empty() {
        return Some(message.to_string());
    }
    let exception = exception.trim();
    if exception.is_empty() {
        None
    } else {
        Some(exception.to_string())
    }
}
