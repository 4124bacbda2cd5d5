//! SCIM schema extensions (RFC 7643 Section 3.3).
//!
//! An [`Extension`] is a URN-identified set of custom fields attached to a
//! resource, e.g. the Enterprise User extension. Field values are stored in
//! their canonical SCIM string form together with their declared type, and
//! converted back to native values lazily on read.
//!
//! ## Canonical string forms
//!
//! | Type        | Native value              | Canonical form           |
//! |-------------|---------------------------|--------------------------|
//! | `string`    | `String`                  | as-is                    |
//! | `boolean`   | `bool`                    | `true` / `false`         |
//! | `binary`    | `Vec<u8>`                 | standard base64          |
//! | `integer`   | `i64`                     | decimal digits           |
//! | `decimal`   | `rust_decimal::Decimal`   | decimal text             |
//! | `dateTime`  | `chrono::DateTime<Utc>`   | RFC 3339                 |
//! | `reference` | `url::Url`                | the URI text             |

use std::{collections::BTreeMap, fmt};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// SCIM data type of an extension field (RFC 7643 Section 2.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtensionFieldType {
    String,
    Boolean,
    Binary,
    Integer,
    Decimal,
    DateTime,
    Reference,
}

impl ExtensionFieldType {
    /// Parse a canonical string into a typed value, `None` when the text is
    /// not valid for this type.
    fn parse(self, raw: &str) -> Option<FieldValue> {
        match self {
            ExtensionFieldType::String => Some(FieldValue::String(raw.to_string())),
            ExtensionFieldType::Boolean => raw.parse().ok().map(FieldValue::Boolean),
            ExtensionFieldType::Binary => BASE64.decode(raw).ok().map(FieldValue::Binary),
            ExtensionFieldType::Integer => raw.parse().ok().map(FieldValue::Integer),
            ExtensionFieldType::Decimal => raw.parse().ok().map(FieldValue::Decimal),
            ExtensionFieldType::DateTime => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| FieldValue::DateTime(dt.with_timezone(&Utc))),
            ExtensionFieldType::Reference => Url::parse(raw).ok().map(FieldValue::Reference),
        }
    }
}

impl fmt::Display for ExtensionFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtensionFieldType::String => "string",
            ExtensionFieldType::Boolean => "boolean",
            ExtensionFieldType::Binary => "binary",
            ExtensionFieldType::Integer => "integer",
            ExtensionFieldType::Decimal => "decimal",
            ExtensionFieldType::DateTime => "dateTime",
            ExtensionFieldType::Reference => "reference",
        };
        write!(f, "{}", s)
    }
}

/// A typed extension field value in its native representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    Boolean(bool),
    Binary(Vec<u8>),
    Integer(i64),
    Decimal(Decimal),
    DateTime(DateTime<Utc>),
    Reference(Url),
}

impl FieldValue {
    /// The SCIM type tag of this value.
    pub fn field_type(&self) -> ExtensionFieldType {
        match self {
            FieldValue::String(_) => ExtensionFieldType::String,
            FieldValue::Boolean(_) => ExtensionFieldType::Boolean,
            FieldValue::Binary(_) => ExtensionFieldType::Binary,
            FieldValue::Integer(_) => ExtensionFieldType::Integer,
            FieldValue::Decimal(_) => ExtensionFieldType::Decimal,
            FieldValue::DateTime(_) => ExtensionFieldType::DateTime,
            FieldValue::Reference(_) => ExtensionFieldType::Reference,
        }
    }

    /// Serialize to the canonical SCIM string form.
    fn to_canonical(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Binary(bytes) => BASE64.encode(bytes),
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Decimal(d) => d.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339(),
            FieldValue::Reference(url) => url.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Binary(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        FieldValue::Binary(value.to_vec())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Url> for FieldValue {
    fn from(value: Url) -> Self {
        FieldValue::Reference(value)
    }
}

/// A stored extension field: declared type plus canonical string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    field_type: ExtensionFieldType,
    value: String,
}

impl Field {
    /// The declared SCIM type of the field.
    pub fn field_type(&self) -> ExtensionFieldType {
        self.field_type
    }

    /// The canonical string form of the value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A URN-identified set of custom fields attached to a SCIM resource.
///
/// Equality and hashing are structural over the URN and the field map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    urn: String,
    #[serde(default)]
    fields: BTreeMap<String, Field>,
}

impl Extension {
    /// Create an empty extension identified by `urn`.
    pub fn new(urn: impl Into<String>) -> Self {
        Self {
            urn: urn.into(),
            fields: BTreeMap::new(),
        }
    }

    /// The URN identifying this extension schema.
    pub fn urn(&self) -> &str {
        &self.urn
    }

    /// Store `value` under `name`, replacing any prior entry.
    ///
    /// The value is serialized to its canonical string form and stored with
    /// its type tag. Accepts anything convertible into [`FieldValue`]
    /// (`&str`, `bool`, `i64`, `Vec<u8>`, `Decimal`, `DateTime<Utc>`, `Url`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `name` is empty.
    pub fn add_or_update_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("extension field name is empty"));
        }
        let value = value.into();
        self.fields.insert(
            name.to_string(),
            Field {
                field_type: value.field_type(),
                value: value.to_canonical(),
            },
        );
        Ok(())
    }

    /// Read the field `name` as `field_type`.
    ///
    /// The stored canonical string is parsed as the *requested* type, which
    /// may differ from the declared one (reading an `integer` field as
    /// `string` yields its digit text).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `name` is empty,
    /// [`Error::FieldNotFound`] if no field of that name exists,
    /// [`Error::InvalidFieldValue`] if the stored text does not parse as
    /// `field_type`.
    pub fn get_field(&self, name: &str, field_type: ExtensionFieldType) -> Result<FieldValue> {
        if name.is_empty() {
            return Err(Error::InvalidArgument("extension field name is empty"));
        }
        let field = self.fields.get(name).ok_or_else(|| Error::FieldNotFound {
            field: name.to_string(),
        })?;
        field_type
            .parse(&field.value)
            .ok_or_else(|| Error::InvalidFieldValue {
                field: name.to_string(),
                expected: field_type,
                value: field.value.clone(),
            })
    }

    /// Whether a field of the given name is present.
    pub fn is_field_present(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Read-only view of all stored fields.
    pub fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const URN: &str = "urn:ietf:params:scim:schemas:extension:enterprise:2.0:User";

    #[test]
    fn test_integer_round_trip() {
        let mut ext = Extension::new(URN);
        ext.add_or_update_field("age", 42i64).unwrap();

        assert_eq!(
            ext.get_field("age", ExtensionFieldType::Integer).unwrap(),
            FieldValue::Integer(42)
        );
        assert_eq!(ext.fields()["age"].value(), "42");
    }

    #[test]
    fn test_boolean_and_string_round_trip() {
        let mut ext = Extension::new(URN);
        ext.add_or_update_field("employed", true).unwrap();
        ext.add_or_update_field("department", "Engineering").unwrap();

        assert_eq!(
            ext.get_field("employed", ExtensionFieldType::Boolean)
                .unwrap(),
            FieldValue::Boolean(true)
        );
        assert_eq!(
            ext.get_field("department", ExtensionFieldType::String)
                .unwrap(),
            FieldValue::String("Engineering".to_string())
        );
    }

    #[test]
    fn test_binary_is_stored_as_base64() {
        let mut ext = Extension::new(URN);
        ext.add_or_update_field("certificate", vec![1u8, 2, 3])
            .unwrap();

        assert_eq!(ext.fields()["certificate"].value(), "AQID");
        assert_eq!(
            ext.get_field("certificate", ExtensionFieldType::Binary)
                .unwrap(),
            FieldValue::Binary(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_date_time_round_trip() {
        let when = Utc.with_ymd_and_hms(2024, 5, 17, 10, 30, 0).unwrap();
        let mut ext = Extension::new(URN);
        ext.add_or_update_field("hireDate", when).unwrap();

        assert_eq!(ext.fields()["hireDate"].value(), "2024-05-17T10:30:00+00:00");
        assert_eq!(
            ext.get_field("hireDate", ExtensionFieldType::DateTime)
                .unwrap(),
            FieldValue::DateTime(when)
        );
    }

    #[test]
    fn test_decimal_and_reference_round_trip() {
        let salary = Decimal::new(1999, 2); // 19.99
        let manager = Url::parse("https://example.com/scim/v2/Users/2819c223").unwrap();

        let mut ext = Extension::new(URN);
        ext.add_or_update_field("bonusFactor", salary).unwrap();
        ext.add_or_update_field("manager", manager.clone()).unwrap();

        assert_eq!(ext.fields()["bonusFactor"].value(), "19.99");
        assert_eq!(
            ext.get_field("bonusFactor", ExtensionFieldType::Decimal)
                .unwrap(),
            FieldValue::Decimal(salary)
        );
        assert_eq!(
            ext.get_field("manager", ExtensionFieldType::Reference)
                .unwrap(),
            FieldValue::Reference(manager)
        );
    }

    #[test]
    fn test_get_field_reads_as_requested_type() {
        // A stored integer read back as string yields its digit text.
        let mut ext = Extension::new(URN);
        ext.add_or_update_field("age", 42i64).unwrap();

        assert_eq!(
            ext.get_field("age", ExtensionFieldType::String).unwrap(),
            FieldValue::String("42".to_string())
        );
    }

    #[test]
    fn test_get_field_type_mismatch() {
        let mut ext = Extension::new(URN);
        ext.add_or_update_field("department", "Engineering").unwrap();

        let err = ext
            .get_field("department", ExtensionFieldType::Integer)
            .unwrap_err();
        assert_eq!(
            err,
            Error::InvalidFieldValue {
                field: "department".to_string(),
                expected: ExtensionFieldType::Integer,
                value: "Engineering".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_field_is_not_found() {
        let ext = Extension::new(URN);
        let err = ext.get_field("age", ExtensionFieldType::Integer).unwrap_err();
        assert_eq!(
            err,
            Error::FieldNotFound {
                field: "age".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_field_name_is_invalid_argument() {
        let mut ext = Extension::new(URN);
        assert!(matches!(
            ext.add_or_update_field("", 1i64).unwrap_err(),
            Error::InvalidArgument(_)
        ));
        assert!(matches!(
            ext.get_field("", ExtensionFieldType::Integer).unwrap_err(),
            Error::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_add_or_update_overwrites() {
        let mut ext = Extension::new(URN);
        ext.add_or_update_field("age", 30i64).unwrap();
        ext.add_or_update_field("age", "unknown").unwrap();

        let field = &ext.fields()["age"];
        assert_eq!(field.field_type(), ExtensionFieldType::String);
        assert_eq!(field.value(), "unknown");
    }

    #[test]
    fn test_field_presence() {
        let mut ext = Extension::new(URN);
        assert!(!ext.is_field_present("age"));
        ext.add_or_update_field("age", 42i64).unwrap();
        assert!(ext.is_field_present("age"));
    }

    #[test]
    fn test_structural_equality() {
        let mut a = Extension::new(URN);
        a.add_or_update_field("age", 42i64).unwrap();

        let mut b = Extension::new(URN);
        b.add_or_update_field("age", 42i64).unwrap();
        assert_eq!(a, b);

        b.add_or_update_field("age", 43i64).unwrap();
        assert_ne!(a, b);

        let c = Extension::new("urn:example:other");
        assert_ne!(Extension::new(URN), c);
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(format!("{}", ExtensionFieldType::DateTime), "dateTime");
        assert_eq!(format!("{}", ExtensionFieldType::Reference), "reference");
    }
}
