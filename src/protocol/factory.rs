//! # Response Factory
//!
//! Builders for well-formed response values.
//!
//! Every builder fills `message_size` from the schema registry before
//! returning, so a response is never observable with a stale or zero
//! size once it leaves this module.

use crate::error::Result;
use crate::protocol::message::{
    ApiKeyVersion, ApiVersionsBody, ErrorCode, Response, ResponseBody, ResponseHeader,
};
use crate::protocol::schema::{SchemaRegistry, SchemaVariant};
use crate::protocol::wire;

/// Successful version-negotiation response advertising `api_keys`.
pub fn versions_response(
    correlation_id: i32,
    api_keys: Vec<ApiKeyVersion>,
    schemas: &SchemaRegistry,
) -> Result<Response> {
    let body = ApiVersionsBody {
        error_code: ErrorCode::NoError,
        api_keys,
        throttle_time_ms: 0,
    };
    sized(correlation_id, body, schemas)
}

/// Version-negotiation error response with an empty API list.
pub fn versions_error_response(
    correlation_id: i32,
    error_code: ErrorCode,
    schemas: &SchemaRegistry,
) -> Result<Response> {
    let body = ApiVersionsBody {
        error_code,
        api_keys: Vec::new(),
        throttle_time_ms: 0,
    };
    sized(correlation_id, body, schemas)
}

/// Permissive success response for APIs without a handler: no error,
/// nothing advertised.
pub fn empty_response(correlation_id: i32, schemas: &SchemaRegistry) -> Result<Response> {
    let body = ApiVersionsBody {
        error_code: ErrorCode::NoError,
        api_keys: Vec::new(),
        throttle_time_ms: 0,
    };
    sized(correlation_id, body, schemas)
}

fn sized(
    correlation_id: i32,
    body: ApiVersionsBody,
    schemas: &SchemaRegistry,
) -> Result<Response> {
    let mut response = Response {
        message_size: 0,
        header: ResponseHeader { correlation_id },
        body: Some(ResponseBody::ApiVersions(body)),
    };
    response.message_size =
        wire::response_size(&response, SchemaVariant::ApiVersionsV4, schemas)? as u32;
    Ok(response)
}
