//! SCIM resource types (RFC 7643).
//!
//! Client-side model of the core User and Group resources: enough shape to
//! construct provisioning payloads and to attach [`Extension`] data, without
//! any of the server-side protocol surface (list responses, PATCH machinery,
//! service-provider configuration).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::extension::Extension;

/// SCIM Core User schema URI
pub const SCHEMA_USER: &str = "urn:ietf:params:scim:schemas:core:2.0:User";

/// SCIM Core Group schema URI
pub const SCHEMA_GROUP: &str = "urn:ietf:params:scim:schemas:core:2.0:Group";

/// SCIM Enterprise User extension schema URI
pub const SCHEMA_ENTERPRISE_USER: &str =
    "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

/// Resource metadata common to all SCIM resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimMeta {
    /// The resource type (e.g. "User", "Group")
    pub resource_type: String,

    /// When the resource was created
    pub created: DateTime<Utc>,

    /// When the resource was last modified
    pub last_modified: DateTime<Utc>,

    /// The absolute URI of the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// ETag for optimistic concurrency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ScimMeta {
    /// Metadata for a User resource
    pub fn user(created: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        Self {
            resource_type: "User".to_string(),
            created,
            last_modified,
            location: None,
            version: None,
        }
    }

    /// Metadata for a Group resource
    pub fn group(created: DateTime<Utc>, last_modified: DateTime<Utc>) -> Self {
        Self {
            resource_type: "Group".to_string(),
            created,
            last_modified,
            location: None,
            version: None,
        }
    }

    /// Set the location URI
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the ETag version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// User's name components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimName {
    /// Full formatted name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,

    /// Family name (last name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,

    /// Given name (first name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,

    /// Middle name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,

    /// Honorific prefix (e.g. "Dr.")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_prefix: Option<String>,

    /// Honorific suffix (e.g. "PhD")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub honorific_suffix: Option<String>,
}

impl ScimName {
    /// Create a name from given and family names
    pub fn from_names(given: impl Into<String>, family: impl Into<String>) -> Self {
        let given = given.into();
        let family = family.into();
        Self {
            formatted: Some(format!("{} {}", given, family)),
            given_name: Some(given),
            family_name: Some(family),
            ..Self::default()
        }
    }
}

/// Email address with type and primary flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimEmail {
    /// Email address value
    pub value: String,

    /// Email type (e.g. "work", "home")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,

    /// Whether this is the primary email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
}

impl ScimEmail {
    /// Create a primary work email
    pub fn work_primary(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            email_type: Some("work".to_string()),
            primary: Some(true),
        }
    }

    /// Create a non-primary email of the given type
    pub fn other(value: impl Into<String>, email_type: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            email_type: Some(email_type.into()),
            primary: None,
        }
    }
}

/// Phone number with type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimPhoneNumber {
    /// Phone number value
    pub value: String,

    /// Phone type (e.g. "work", "mobile")
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub phone_type: Option<String>,
}

/// SCIM User resource.
///
/// The identity attributes a client sends to (and reads from) a provisioning
/// server, plus any attached schema extensions keyed by URN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimUser {
    /// SCIM schema URIs for this resource
    pub schemas: Vec<String>,

    /// Server-assigned unique identifier
    pub id: String,

    /// Client-assigned identifier for correlation with the IdP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Unique identifier for the user (typically email)
    pub user_name: String,

    /// Name components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<ScimName>,

    /// Display name shown in UI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Email addresses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emails: Vec<ScimEmail>,

    /// Phone numbers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub phone_numbers: Vec<ScimPhoneNumber>,

    /// Whether the user is active
    #[serde(default = "default_true")]
    pub active: bool,

    /// Attached schema extensions, keyed by URN
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extensions: BTreeMap<String, Extension>,

    /// Resource metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
}

fn default_true() -> bool {
    true
}

impl ScimUser {
    /// Create a user with the minimal required fields
    pub fn new(id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            schemas: vec![SCHEMA_USER.to_string()],
            id: id.into(),
            external_id: None,
            user_name: user_name.into(),
            name: None,
            display_name: None,
            emails: Vec::new(),
            phone_numbers: Vec::new(),
            active: true,
            extensions: BTreeMap::new(),
            meta: None,
        }
    }

    /// The primary email address, falling back to the first one
    pub fn primary_email(&self) -> Option<&str> {
        self.emails
            .iter()
            .find(|e| e.primary.unwrap_or(false))
            .or_else(|| self.emails.first())
            .map(|e| e.value.as_str())
    }

    /// Attach an extension, recording its URN in `schemas`.
    ///
    /// Replaces any previously attached extension with the same URN.
    pub fn add_extension(&mut self, extension: Extension) {
        let urn = extension.urn().to_string();
        if !self.schemas.contains(&urn) {
            self.schemas.push(urn.clone());
        }
        self.extensions.insert(urn, extension);
    }

    /// The attached extension with the given URN, if any
    pub fn extension(&self, urn: &str) -> Option<&Extension> {
        self.extensions.get(urn)
    }
}

/// Member entry of a Group resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroupMember {
    /// ID of the member resource
    pub value: String,

    /// Display name of the member
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// SCIM Group resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScimGroup {
    /// SCIM schema URIs for this resource
    pub schemas: Vec<String>,

    /// Server-assigned unique identifier
    pub id: String,

    /// Client-assigned identifier for correlation with the IdP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    /// Human-readable group name
    pub display_name: String,

    /// Group members
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<ScimGroupMember>,

    /// Resource metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ScimMeta>,
}

impl ScimGroup {
    /// Create a group with the minimal required fields
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            schemas: vec![SCHEMA_GROUP.to_string()],
            id: id.into(),
            external_id: None,
            display_name: display_name.into(),
            members: Vec::new(),
            meta: None,
        }
    }
}
