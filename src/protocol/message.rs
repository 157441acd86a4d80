//! # Protocol Messages
//!
//! Typed request and response values exchanged through the engine.
//!
//! A [`Request`] is produced by decoding one frame and lives for a
//! single dispatch cycle. A [`Response`] is built by the factory with
//! its `message_size` already filled in, then encoded once and
//! discarded. Nothing here is mutated after construction.

use bytes::Bytes;

/// API key of the version-negotiation handshake.
pub const API_VERSIONS_KEY: u16 = 18;

/// Error codes carried in response bodies.
///
/// The taxonomy is open for extension; these are the codes the engine
/// produces today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum ErrorCode {
    /// Request handled successfully.
    NoError = 0,
    /// Requested API version is outside the supported range.
    UnsupportedVersion = 35,
}

impl ErrorCode {
    /// Wire value of the code.
    pub fn code(self) -> i16 {
        self as i16
    }
}

/// Header fields decoded from a request frame.
///
/// `client_id` and `tag_buffer` are populated only when the frame
/// carries bytes past the fixed twelve-byte header; a minimal frame
/// yields `None` and an empty buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub api_key: u16,
    pub api_version: u16,
    pub correlation_id: i32,
    pub client_id: Option<String>,
    pub tag_buffer: Bytes,
}

/// One decoded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Size the sender declared in the frame prefix, excluding the
    /// prefix itself. Echoed from the wire, not validated against the
    /// frame length.
    pub declared_size: u32,
    pub header: RequestHeader,
}

/// Response header, version 0: the echoed correlation id and nothing
/// else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    pub correlation_id: i32,
}

/// One advertised API with its supported version window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiKeyVersion {
    pub api_key: i16,
    pub min_version: i16,
    pub max_version: i16,
}

/// Body of a version-negotiation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiVersionsBody {
    pub error_code: ErrorCode,
    pub api_keys: Vec<ApiKeyVersion>,
    pub throttle_time_ms: i32,
}

/// Response bodies, one variant per structural shape on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    ApiVersions(ApiVersionsBody),
}

/// A complete response, ready to encode.
///
/// `message_size` is derived, not author-supplied: it must equal the
/// encoded length of everything after the size field itself. The
/// factory fills it before a response becomes visible to callers. A
/// `None` body encodes as a header-only response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub message_size: u32,
    pub header: ResponseHeader,
    pub body: Option<ResponseBody>,
}
