//! Client-side SCIM 2.0 data model and query construction.
//!
//! SCIM (System for Cross-domain Identity Management) is the standard
//! protocol identity providers like Okta, Azure AD and Keycloak use to
//! provision users and groups. This crate models the client half: resource
//! types, URN-keyed schema extensions, and a fluent [`QueryBuilder`] that
//! renders filter/sort/pagination parameters into the query string a SCIM
//! server consumes. HTTP transport and authentication are the embedding
//! application's concern.
//!
//! ## RFC References
//!
//! - RFC 7643: SCIM Core Schema
//! - RFC 7644: SCIM Protocol
//!
//! ## Module Structure
//!
//! - [`schema`]: per-resource attribute tables and attribute validation
//! - [`query`]: query-string builder with schema-validated filter clauses
//! - [`extension`]: typed, URN-keyed custom field store
//! - [`types`]: core resource types (User, Group)
//! - [`error`]: error taxonomy shared across the crate
//!
//! ## Example
//!
//! ```
//! use scim_client::{QueryBuilder, ScimResourceType};
//!
//! let mut builder = QueryBuilder::new(ScimResourceType::User);
//! builder
//!     .query("emails.value")?
//!     .contains("@example.com")?
//!     .sort_order_ascending()
//!     .count_per_page(100);
//! assert_eq!(
//!     builder.build(),
//!     "emails.value co \"@example.com\"&sortOrder=ascending&count=100"
//! );
//! # Ok::<(), scim_client::Error>(())
//! ```

pub mod error;
pub mod extension;
pub mod query;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use extension::{Extension, ExtensionFieldType, Field, FieldValue};
pub use query::{QueryBuilder, SortOrder};
pub use schema::{AttributeDef, ScimResourceType, is_valid_attribute};
pub use types::*;
