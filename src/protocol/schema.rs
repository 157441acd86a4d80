//! # Response Schema Registry
//!
//! Declarative descriptions of each response shape on the wire.
//!
//! A response's byte layout is configuration, not code: every shape is
//! described once as an ordered list of fields tagged with a primitive
//! width and a role, and the codec derives sizes from that description
//! instead of a hand-written calculation per message type. Adding a
//! response shape means adding a schema entry, not touching the codec.
//!
//! Whether a field repeats per array element is an explicit
//! [`FieldRole`] on the field itself, never inferred from its name.
//!
//! The registry is loaded once at startup and shared read-only across
//! connections.

use std::collections::HashMap;
use std::fmt;

use crate::error::{ProtocolError, Result};

/// Primitive wire widths a field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    Int8,
    Int16,
    Int32,
    /// Single-byte compact-array length, for arrays shorter than 127.
    CompactArrayLength,
    /// Single zero byte standing in for an empty tagged-field section.
    TagBufferEmpty,
}

impl FieldWidth {
    /// Encoded size of the field in bytes.
    pub const fn byte_width(self) -> usize {
        match self {
            FieldWidth::Int8 | FieldWidth::CompactArrayLength | FieldWidth::TagBufferEmpty => 1,
            FieldWidth::Int16 => 2,
            FieldWidth::Int32 => 4,
        }
    }
}

/// How a field contributes to the encoded size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// Appears exactly once.
    Plain,
    /// The length indicator of a repeated collection; appears once.
    ArrayLength,
    /// Repeats once per element of the collection.
    ArrayElement,
}

/// One field in a response layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub width: FieldWidth,
    pub role: FieldRole,
}

impl FieldSpec {
    pub const fn new(name: &'static str, width: FieldWidth, role: FieldRole) -> Self {
        Self { name, width, role }
    }

    /// A field that appears exactly once.
    pub const fn plain(name: &'static str, width: FieldWidth) -> Self {
        Self::new(name, width, FieldRole::Plain)
    }
}

/// Ordered field layout of one response shape.
///
/// `body` is `None` for shapes that consist of a header alone.
#[derive(Debug, Clone, Copy)]
pub struct ResponseSchema {
    pub header: &'static [FieldSpec],
    pub body: Option<&'static [FieldSpec]>,
}

/// Names of the response shapes the codec can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVariant {
    /// Version-negotiation response, version 4.
    ApiVersionsV4,
}

impl SchemaVariant {
    pub fn name(self) -> &'static str {
        match self {
            SchemaVariant::ApiVersionsV4 => "API_VERSIONS_V4",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Layout of the version-negotiation response, version 4.
pub const API_VERSIONS_V4_SCHEMA: ResponseSchema = ResponseSchema {
    header: &[FieldSpec::plain("correlation_id", FieldWidth::Int32)],
    body: Some(&[
        FieldSpec::plain("error_code", FieldWidth::Int16),
        FieldSpec::new(
            "api_keys_length",
            FieldWidth::CompactArrayLength,
            FieldRole::ArrayLength,
        ),
        FieldSpec::new("api_key", FieldWidth::Int16, FieldRole::ArrayElement),
        FieldSpec::new("min_version", FieldWidth::Int16, FieldRole::ArrayElement),
        FieldSpec::new("max_version", FieldWidth::Int16, FieldRole::ArrayElement),
        FieldSpec::new(
            "tag_buffer",
            FieldWidth::TagBufferEmpty,
            FieldRole::ArrayElement,
        ),
        FieldSpec::plain("throttle_time_ms", FieldWidth::Int32),
        FieldSpec::plain("final_tag_buffer", FieldWidth::TagBufferEmpty),
    ]),
};

/// Immutable lookup table from variant name to layout.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<SchemaVariant, ResponseSchema>,
}

impl SchemaRegistry {
    /// Registry populated with every built-in shape.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.insert(SchemaVariant::ApiVersionsV4, API_VERSIONS_V4_SCHEMA);
        registry
    }

    /// Registry with no shapes registered. Lookups fail with
    /// [`ProtocolError::UnknownStructure`].
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Register a layout for a variant, replacing any existing entry.
    pub fn insert(&mut self, variant: SchemaVariant, schema: ResponseSchema) {
        self.schemas.insert(variant, schema);
    }

    /// Look up the layout for a variant.
    ///
    /// A miss means the codec was asked for a shape that was never
    /// registered, which is a defect in the caller's wiring rather
    /// than a runtime condition.
    pub fn get(&self, variant: SchemaVariant) -> Result<&ResponseSchema> {
        self.schemas
            .get(&variant)
            .ok_or_else(|| ProtocolError::UnknownStructure(variant.name().to_string()))
    }

    pub fn contains(&self, variant: SchemaVariant) -> bool {
        self.schemas.contains_key(&variant)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_widths() {
        assert_eq!(FieldWidth::Int8.byte_width(), 1);
        assert_eq!(FieldWidth::Int16.byte_width(), 2);
        assert_eq!(FieldWidth::Int32.byte_width(), 4);
        assert_eq!(FieldWidth::CompactArrayLength.byte_width(), 1);
        assert_eq!(FieldWidth::TagBufferEmpty.byte_width(), 1);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_builtin_registry_has_api_versions() {
        let registry = SchemaRegistry::new();
        assert!(registry.contains(SchemaVariant::ApiVersionsV4));

        let schema = registry.get(SchemaVariant::ApiVersionsV4).expect("schema");
        assert_eq!(schema.header.len(), 1);
        assert_eq!(schema.header[0].name, "correlation_id");
        assert!(schema.body.is_some());
    }

    #[test]
    fn test_empty_registry_reports_unknown_structure() {
        let registry = SchemaRegistry::empty();
        match registry.get(SchemaVariant::ApiVersionsV4) {
            Err(ProtocolError::UnknownStructure(name)) => {
                assert_eq!(name, "API_VERSIONS_V4");
            }
            other => panic!("expected UnknownStructure, got {other:?}"),
        }
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn test_array_membership_is_an_explicit_role() {
        let registry = SchemaRegistry::new();
        let schema = registry.get(SchemaVariant::ApiVersionsV4).expect("schema");
        let body = schema.body.expect("body fields");

        let element_fields: Vec<&str> = body
            .iter()
            .filter(|f| f.role == FieldRole::ArrayElement)
            .map(|f| f.name)
            .collect();

        assert_eq!(
            element_fields,
            ["api_key", "min_version", "max_version", "tag_buffer"]
        );
    }
}
