//! # Protocol Engine
//!
//! The full decode → dispatch → encode pipeline behind one entry
//! point.
//!
//! The engine owns the two read-only registries (response schemas and
//! API handlers) and turns a complete frame into a complete wire
//! response. It performs no I/O and holds no per-connection state, so
//! one engine instance can be shared read-only across every
//! connection.

use bytes::Bytes;
use tracing::debug;

use crate::core::frame::Frame;
use crate::error::Result;
use crate::protocol::dispatcher::ApiDispatcher;
use crate::protocol::schema::{SchemaRegistry, SchemaVariant};
use crate::protocol::wire;

/// Frame-in, wire-bytes-out protocol engine.
pub struct ProtocolEngine {
    schemas: SchemaRegistry,
    dispatcher: ApiDispatcher,
}

impl ProtocolEngine {
    /// Engine with the built-in schemas and APIs registered.
    pub fn new() -> Self {
        Self {
            schemas: SchemaRegistry::new(),
            dispatcher: ApiDispatcher::with_builtin_apis(),
        }
    }

    /// Engine assembled from explicit registries.
    pub fn with_parts(schemas: SchemaRegistry, dispatcher: ApiDispatcher) -> Self {
        Self {
            schemas,
            dispatcher,
        }
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    pub fn dispatcher(&self) -> &ApiDispatcher {
        &self.dispatcher
    }

    /// Handle one complete frame: decode the request, dispatch it, and
    /// encode the response as a complete wire image ready for the
    /// socket.
    ///
    /// # Errors
    /// [`ProtocolError::TruncatedHeader`](crate::error::ProtocolError::TruncatedHeader)
    /// if the frame is too short to decode; aborts this frame only.
    /// [`ProtocolError::UnknownStructure`](crate::error::ProtocolError::UnknownStructure)
    /// if the response schemas are miswired, which is a defect rather
    /// than a peer condition.
    pub fn handle_frame(&self, frame: &Frame) -> Result<Bytes> {
        let request = wire::decode_request(frame)?;
        debug!(
            api_key = request.header.api_key,
            api_version = request.header.api_version,
            correlation_id = request.header.correlation_id,
            "Dispatching request"
        );

        let response = self.dispatcher.dispatch(&request, &self.schemas)?;
        wire::encode_response(&response, SchemaVariant::ApiVersionsV4, &self.schemas)
    }
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}
