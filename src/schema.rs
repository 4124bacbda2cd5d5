//! SCIM resource schemas and attribute validation.
//!
//! Each resource type carries a compiled-in table of the attribute paths a
//! SCIM server accepts in filter expressions, per RFC 7643. The query builder
//! consults [`is_valid_attribute`] before an attribute ever reaches the
//! filter text, so a malformed path fails at the call site instead of as a
//! 400 from the server.
//!
//! ## Attribute paths
//!
//! ```text
//! attrPath = ATTRNAME ["." SUBATTRNAME]
//! ```
//!
//! A path is valid when its head names a declared attribute and, for complex
//! attributes, the sub-attribute belongs to the attribute's declared set.
//! Matching is ASCII-case-insensitive (RFC 7643 Section 2.1).

use std::fmt;

use serde::{Deserialize, Serialize};

/// SCIM resource type a query or validation runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScimResourceType {
    User,
    Group,
}

impl ScimResourceType {
    /// The filterable attribute table for this resource type.
    pub fn attributes(self) -> &'static [AttributeDef] {
        match self {
            ScimResourceType::User => USER_ATTRIBUTES,
            ScimResourceType::Group => GROUP_ATTRIBUTES,
        }
    }
}

impl fmt::Display for ScimResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScimResourceType::User => write!(f, "User"),
            ScimResourceType::Group => write!(f, "Group"),
        }
    }
}

/// One declared attribute of a resource schema.
#[derive(Debug, Clone, Copy)]
pub struct AttributeDef {
    /// Attribute name as it appears in filter expressions
    name: &'static str,
    /// Declared sub-attributes (empty for simple attributes)
    sub_attrs: &'static [&'static str],
    /// Whether the attribute may be referenced without a sub-attribute
    bare: bool,
}

impl AttributeDef {
    /// A simple single-valued attribute (e.g. `userName`).
    const fn flat(name: &'static str) -> Self {
        Self {
            name,
            sub_attrs: &[],
            bare: true,
        }
    }

    /// A complex attribute that may also be referenced bare (e.g. `name`).
    const fn complex(name: &'static str, sub_attrs: &'static [&'static str]) -> Self {
        Self {
            name,
            sub_attrs,
            bare: true,
        }
    }

    /// A complex attribute that requires a sub-attribute (e.g. `meta`).
    const fn nested_only(name: &'static str, sub_attrs: &'static [&'static str]) -> Self {
        Self {
            name,
            sub_attrs,
            bare: false,
        }
    }

    /// Attribute name as declared in the schema.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared sub-attributes, empty for simple attributes.
    pub fn sub_attrs(&self) -> &'static [&'static str] {
        self.sub_attrs
    }

    fn matches(&self, attr: &str, sub_attr: Option<&str>) -> bool {
        if !self.name.eq_ignore_ascii_case(attr) {
            return false;
        }
        match sub_attr {
            None => self.bare,
            Some(sub) => self.sub_attrs.iter().any(|s| s.eq_ignore_ascii_case(sub)),
        }
    }
}

/// Sub-attributes shared by multi-valued attributes (emails, phoneNumbers).
const MULTI_VALUED_SUB_ATTRS: &[&str] = &["value", "display", "type", "primary"];

/// Sub-attributes of the common `meta` attribute.
const META_SUB_ATTRS: &[&str] = &[
    "resourceType",
    "created",
    "lastModified",
    "location",
    "version",
];

/// Filterable attributes of the core User schema (RFC 7643 Section 4.1).
const USER_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef::flat("id"),
    AttributeDef::flat("externalId"),
    AttributeDef::flat("userName"),
    AttributeDef::flat("displayName"),
    AttributeDef::flat("nickName"),
    AttributeDef::flat("profileUrl"),
    AttributeDef::flat("title"),
    AttributeDef::flat("userType"),
    AttributeDef::flat("preferredLanguage"),
    AttributeDef::flat("locale"),
    AttributeDef::flat("timezone"),
    AttributeDef::flat("active"),
    AttributeDef::complex(
        "name",
        &[
            "formatted",
            "familyName",
            "givenName",
            "middleName",
            "honorificPrefix",
            "honorificSuffix",
        ],
    ),
    AttributeDef::complex("emails", MULTI_VALUED_SUB_ATTRS),
    AttributeDef::complex("phoneNumbers", MULTI_VALUED_SUB_ATTRS),
    AttributeDef::nested_only("groups", &["value", "display", "type"]),
    AttributeDef::nested_only("meta", META_SUB_ATTRS),
];

/// Filterable attributes of the core Group schema (RFC 7643 Section 4.2).
const GROUP_ATTRIBUTES: &[AttributeDef] = &[
    AttributeDef::flat("id"),
    AttributeDef::flat("externalId"),
    AttributeDef::flat("displayName"),
    AttributeDef::nested_only("members", &["value", "display", "type"]),
    AttributeDef::nested_only("meta", META_SUB_ATTRS),
];

/// Check whether `path` names a filterable attribute of `resource_type`.
///
/// Splits the path on the first `.`; the head must be a declared attribute
/// and the tail (if any) one of its declared sub-attributes. Paths with more
/// than two segments never match.
pub fn is_valid_attribute(resource_type: ScimResourceType, path: &str) -> bool {
    if path.is_empty() {
        return false;
    }

    let (attr, sub_attr) = match path.split_once('.') {
        Some((attr, sub)) => (attr, Some(sub)),
        None => (path, None),
    };

    let valid = resource_type
        .attributes()
        .iter()
        .any(|def| def.matches(attr, sub_attr));

    if !valid {
        tracing::debug!(
            resource_type = %resource_type,
            attribute = path,
            "rejected attribute not in schema"
        );
    }

    valid
}
