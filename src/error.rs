//! Error types for query construction and extension field access.
//!
//! All errors are synchronous and raised at the offending call site; a failed
//! call never leaves a half-written filter or field behind.

use crate::{extension::ExtensionFieldType, schema::ScimResourceType};

/// Result type for query-builder and extension operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the query builder and the extension field store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Attribute is empty or not a filterable attribute of the resource type.
    #[error("invalid attribute '{attribute}' for resource type {resource_type}")]
    InvalidAttribute {
        /// Resource type the attribute was validated against
        resource_type: ScimResourceType,
        /// The rejected attribute path
        attribute: String,
    },

    /// A required argument was empty.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Builder calls arrived in an order that cannot produce a valid filter.
    #[error("invalid usage: {0}")]
    InvalidUsage(&'static str),

    /// Extension field lookup on a name that is not present.
    #[error("field '{field}' is not present in this extension")]
    FieldNotFound {
        /// The requested field name
        field: String,
    },

    /// Stored extension value does not parse as the requested type.
    #[error("field '{field}' does not hold a valid {expected} value: '{value}'")]
    InvalidFieldValue {
        /// The requested field name
        field: String,
        /// The type the caller asked for
        expected: ExtensionFieldType,
        /// The stored canonical string that failed to parse
        value: String,
    },
}
