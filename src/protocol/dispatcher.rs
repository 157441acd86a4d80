use std::collections::HashMap;

use crate::error::Result;
use crate::protocol::factory;
use crate::protocol::message::{ApiKeyVersion, ErrorCode, Request, Response, API_VERSIONS_KEY};
use crate::protocol::schema::SchemaRegistry;

type HandlerFn = dyn Fn(&Request, &SchemaRegistry) -> Result<Response> + Send + Sync + 'static;

/// Supported versions of the version-negotiation API.
pub const API_VERSIONS_RANGE: VersionRange = VersionRange::new(0, 4);

/// Inclusive version window one API supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: u16,
    pub max: u16,
}

impl VersionRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, version: u16) -> bool {
        version >= self.min && version <= self.max
    }
}

/// Request dispatcher keyed on the API key.
///
/// Holds two immutable-after-startup tables: the version window each
/// API supports, and the handler that serves it. Both are registered
/// before the dispatcher is shared with connections; dispatch itself
/// only reads, so concurrent use needs no locking.
///
/// Version negotiation failures are answered in-band: an unsupported
/// version yields a well-formed error response, never an `Err`. A key
/// with no handler at all falls through to a permissive empty success,
/// leaving room for APIs not yet implemented.
pub struct ApiDispatcher {
    version_ranges: HashMap<u16, VersionRange>,
    handlers: HashMap<u16, Box<HandlerFn>>,
}

impl Default for ApiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiDispatcher {
    /// Dispatcher with no APIs registered; every request falls through
    /// to the empty-success default.
    pub fn new() -> Self {
        Self {
            version_ranges: HashMap::new(),
            handlers: HashMap::new(),
        }
    }

    /// Dispatcher with the built-in version-negotiation API registered.
    pub fn with_builtin_apis() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register_api(API_VERSIONS_KEY, API_VERSIONS_RANGE, |request, schemas| {
            let advertised = vec![ApiKeyVersion {
                api_key: API_VERSIONS_KEY as i16,
                min_version: API_VERSIONS_RANGE.min as i16,
                max_version: API_VERSIONS_RANGE.max as i16,
            }];
            factory::versions_response(request.header.correlation_id, advertised, schemas)
        });
        dispatcher
    }

    /// Register an API's version window and handler, replacing any
    /// existing registration for the key.
    pub fn register_api<F>(&mut self, api_key: u16, range: VersionRange, handler: F)
    where
        F: Fn(&Request, &SchemaRegistry) -> Result<Response> + Send + Sync + 'static,
    {
        self.version_ranges.insert(api_key, range);
        self.handlers.insert(api_key, Box::new(handler));
    }

    /// Version window registered for an API key, if any.
    pub fn supported_range(&self, api_key: u16) -> Option<VersionRange> {
        self.version_ranges.get(&api_key).copied()
    }

    pub fn is_version_supported(&self, api_key: u16, version: u16) -> bool {
        self.supported_range(api_key)
            .is_some_and(|range| range.contains(version))
    }

    /// Route a request to its handler and produce a response.
    ///
    /// A pure function of the request and the registered tables: no
    /// side effects beyond constructing the response value. The
    /// returned `Err` only reports schema-registry defects; every
    /// protocol-level outcome, unsupported versions included, comes
    /// back as a well-formed `Response`.
    pub fn dispatch(&self, request: &Request, schemas: &SchemaRegistry) -> Result<Response> {
        let api_key = request.header.api_key;
        let correlation_id = request.header.correlation_id;

        match self.handlers.get(&api_key) {
            Some(handler) => {
                if self.is_version_supported(api_key, request.header.api_version) {
                    handler(request, schemas)
                } else {
                    factory::versions_error_response(
                        correlation_id,
                        ErrorCode::UnsupportedVersion,
                        schemas,
                    )
                }
            }
            None => factory::empty_response(correlation_id, schemas),
        }
    }
}
