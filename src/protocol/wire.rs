//! # Wire Codec
//!
//! Decodes request frames into typed values and encodes typed
//! responses back into wire bytes.
//!
//! ## Request Layout
//! ```text
//! [messageSize:4][apiKey:2][apiVersion:2][correlationId:4][clientId?][tagBuffer?]
//! ```
//! All integers are big-endian with no padding. The fixed fields sit at
//! fixed offsets from the start of the frame, prefix included, so
//! decoding never depends on the declared size agreeing with the frame
//! length. The variable tail is parsed only when bytes exist past the
//! fixed header: the client id as a nullable string (signed 16-bit
//! length, `-1` for null), the tagged-field section as opaque bytes.
//!
//! ## Response Sizing
//! `message_size` is derived from the schema registry, never summed by
//! hand: header fields count once, an array-length indicator counts
//! once, and array-element fields count once per element. The encoder
//! then writes exactly that many bytes after the size field.

use bytes::{BufMut, Bytes, BytesMut};

use crate::core::frame::{Frame, LENGTH_PREFIX_SIZE};
use crate::error::{ProtocolError, Result};
use crate::protocol::message::{Request, RequestHeader, Response, ResponseBody};
use crate::protocol::schema::{FieldRole, SchemaRegistry, SchemaVariant};

/// Minimum bytes a frame must hold to decode the fixed header: the
/// 4-byte size prefix plus apiKey, apiVersion, and correlationId.
pub const MIN_HEADER_SIZE: usize = 12;

/// Most elements a response body's compact array can carry: the
/// one-byte length stores `count + 1`.
pub const MAX_COMPACT_ARRAY_LEN: usize = u8::MAX as usize - 1;

/// Decode one frame into a typed request.
///
/// # Errors
/// [`ProtocolError::TruncatedHeader`] if the frame is shorter than
/// [`MIN_HEADER_SIZE`], if a variable-length header field declares
/// more bytes than the frame holds, or if the client id is not valid
/// UTF-8.
pub fn decode_request(frame: &Frame) -> Result<Request> {
    let data = frame.as_ref();
    if data.len() < MIN_HEADER_SIZE {
        return Err(ProtocolError::TruncatedHeader(data.len()));
    }

    let declared_size = frame.declared_size();
    let api_key = u16::from_be_bytes([data[4], data[5]]);
    let api_version = u16::from_be_bytes([data[6], data[7]]);
    let correlation_id = i32::from_be_bytes([data[8], data[9], data[10], data[11]]);
    let (client_id, tag_buffer) = decode_header_tail(frame)?;

    Ok(Request {
        declared_size,
        header: RequestHeader {
            api_key,
            api_version,
            correlation_id,
            client_id,
            tag_buffer,
        },
    })
}

/// Parse the variable fields after the fixed header, when present.
///
/// A frame that stops at the fixed header yields a null client id and
/// an empty tag buffer. A client id whose declared length runs past
/// the frame end, or whose bytes are not valid UTF-8, fails with
/// [`ProtocolError::TruncatedHeader`].
fn decode_header_tail(frame: &Frame) -> Result<(Option<String>, Bytes)> {
    let data = frame.as_ref();
    if data.len() == MIN_HEADER_SIZE {
        return Ok((None, Bytes::new()));
    }

    if data.len() < MIN_HEADER_SIZE + 2 {
        return Err(ProtocolError::TruncatedHeader(data.len()));
    }
    let id_len = i16::from_be_bytes([data[12], data[13]]);
    let mut offset = MIN_HEADER_SIZE + 2;

    let client_id = if id_len < 0 {
        None
    } else {
        let end = offset + id_len as usize;
        if data.len() < end {
            return Err(ProtocolError::TruncatedHeader(data.len()));
        }
        let id = String::from_utf8(data[offset..end].to_vec())
            .map_err(|_| ProtocolError::TruncatedHeader(data.len()))?;
        offset = end;
        Some(id)
    };

    let tag_buffer = frame.as_bytes().slice(offset..);
    Ok((client_id, tag_buffer))
}

/// Compute the exact `message_size` for a response: the encoded length
/// of everything after the size field itself.
///
/// # Errors
/// [`ProtocolError::UnknownStructure`] if the variant is not in the
/// registry, if the response carries a body the variant's layout
/// cannot describe, or if the body holds more array elements than
/// [`MAX_COMPACT_ARRAY_LEN`].
pub fn response_size(
    response: &Response,
    variant: SchemaVariant,
    schemas: &SchemaRegistry,
) -> Result<usize> {
    let schema = schemas.get(variant)?;

    let mut size = 0;
    for field in schema.header {
        size += field.width.byte_width();
    }

    if let Some(body) = &response.body {
        let fields = schema.body.ok_or_else(|| {
            ProtocolError::UnknownStructure(format!(
                "{} (body present but layout is header-only)",
                variant.name()
            ))
        })?;
        let element_count = body_element_count(body);
        if element_count > MAX_COMPACT_ARRAY_LEN {
            return Err(ProtocolError::UnknownStructure(format!(
                "{} ({} elements overflow the one-byte compact array length)",
                variant.name(),
                element_count
            )));
        }

        for field in fields {
            size += match field.role {
                FieldRole::Plain | FieldRole::ArrayLength => field.width.byte_width(),
                FieldRole::ArrayElement => field.width.byte_width() * element_count,
            };
        }
    }

    Ok(size)
}

fn body_element_count(body: &ResponseBody) -> usize {
    match body {
        ResponseBody::ApiVersions(b) => b.api_keys.len(),
    }
}

/// Encode a response into its complete wire image, size prefix
/// included.
///
/// Writes, in order: the 4-byte `message_size`, the 4-byte correlation
/// id, and then the body for the variant: error code, compact array
/// length (`count + 1`), each advertised API as three 16-bit integers
/// plus an empty per-element trailer, throttle time, and a final empty
/// trailer. A response without a body stops after the correlation id.
///
/// # Errors
/// [`ProtocolError::UnknownStructure`] if the variant is not in the
/// registry, if the response carries a body the variant's layout
/// cannot describe, or if the body holds more array elements than
/// [`MAX_COMPACT_ARRAY_LEN`].
pub fn encode_response(
    response: &Response,
    variant: SchemaVariant,
    schemas: &SchemaRegistry,
) -> Result<Bytes> {
    let schema = schemas.get(variant)?;

    let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + response.message_size as usize);
    buf.put_u32(response.message_size);
    buf.put_i32(response.header.correlation_id);

    if let Some(body) = &response.body {
        if schema.body.is_none() {
            return Err(ProtocolError::UnknownStructure(format!(
                "{} (body present but layout is header-only)",
                variant.name()
            )));
        }

        match body {
            ResponseBody::ApiVersions(b) => {
                buf.put_i16(b.error_code.code());
                let compact_len = u8::try_from(b.api_keys.len() + 1).map_err(|_| {
                    ProtocolError::UnknownStructure(format!(
                        "{} ({} elements overflow the one-byte compact array length)",
                        variant.name(),
                        b.api_keys.len()
                    ))
                })?;
                buf.put_u8(compact_len);
                for entry in &b.api_keys {
                    buf.put_i16(entry.api_key);
                    buf.put_i16(entry.min_version);
                    buf.put_i16(entry.max_version);
                    buf.put_u8(0);
                }
                buf.put_i32(b.throttle_time_ms);
                buf.put_u8(0);
            }
        }
    }

    Ok(buf.freeze())
}
