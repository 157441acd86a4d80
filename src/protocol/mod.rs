//! # Protocol Layer
//!
//! Typed request/response handling above the framing layer.
//!
//! ## Components
//! - **Message**: Request and response value types
//! - **Schema**: Declarative response layouts for size derivation
//! - **Wire**: Decode requests, size and encode responses
//! - **Dispatcher**: API-key routing with in-band version negotiation
//! - **Factory**: Response builders that fill `message_size` on construction
//! - **Engine**: The decode → dispatch → encode pipeline as one entry point
//!
//! ## Version Negotiation
//! A client discovers the server's API surface by sending an
//! ApiVersions request (API key 18). Unsupported versions are answered
//! with a well-formed error response carrying `UNSUPPORTED_VERSION`,
//! never with a closed connection.

pub mod dispatcher;
pub mod engine;
pub mod factory;
pub mod message;
pub mod schema;
pub mod wire;


pub use dispatcher::{ApiDispatcher, VersionRange, API_VERSIONS_RANGE};
pub use engine::ProtocolEngine;
pub use message::{
    ApiKeyVersion, ApiVersionsBody, ErrorCode, Request, RequestHeader, Response, ResponseBody,
    ResponseHeader, API_VERSIONS_KEY,
};
pub use schema::{SchemaRegistry, SchemaVariant};
