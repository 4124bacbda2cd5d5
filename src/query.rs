//! SCIM query construction.
//!
//! [`QueryBuilder`] assembles the `filter`, `sortOrder`, `count` and
//! `startIndex` parameters a SCIM server accepts on list requests
//! (RFC 7644 Section 3.4.2) into a single query string. Attributes are
//! validated against the target resource schema at the point of use, so the
//! builder never emits a filter the server's schema would reject.
//!
//! ## Rendered form
//!
//! ```text
//! filterClause   = attrPath SP compareOp SP %x22 value %x22
//!                | attrPath SP "pr" SP
//! filter         = filterClause { (" and " | " or ") filterClause }
//! query          = filter ["&sortOrder=" order] ["&count=" n] ["&startIndex=" n]
//! ```
//!
//! ## Example
//!
//! ```
//! use scim_client::{QueryBuilder, ScimResourceType};
//!
//! let mut builder = QueryBuilder::new(ScimResourceType::User);
//! builder
//!     .query("userName")?
//!     .starts_with("j")?
//!     .and("active")?
//!     .equal_to("true")?
//!     .sort_order_ascending()
//!     .count_per_page(50);
//! assert_eq!(
//!     builder.build(),
//!     "userName sw \"j\" and active eq \"true\"&sortOrder=ascending&count=50"
//! );
//! # Ok::<(), scim_client::Error>(())
//! ```

use std::fmt;

use crate::{
    error::{Error, Result},
    schema::{ScimResourceType, is_valid_attribute},
};

/// Comparison operators and their two-letter SCIM codes (RFC 7644).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterOp {
    /// Equal
    Eq,
    /// Contains
    Co,
    /// Starts with
    Sw,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterOp::Eq => "eq",
            FilterOp::Co => "co",
            FilterOp::Sw => "sw",
            FilterOp::Gt => "gt",
            FilterOp::Ge => "ge",
            FilterOp::Lt => "lt",
            FilterOp::Le => "le",
        };
        write!(f, "{}", s)
    }
}

/// Sort direction for the `sortOrder` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => write!(f, "ascending"),
            SortOrder::Descending => write!(f, "descending"),
        }
    }
}

/// Fluent builder for SCIM list-request query strings.
///
/// Filter clauses accumulate in call order; sort and pagination parameters
/// are last-write-wins. Fallible calls return the builder again on success
/// and leave its state untouched on error, so a rejected attribute does not
/// poison an otherwise valid chain.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    resource_type: ScimResourceType,
    filter: String,
    /// An attribute has been appended and awaits its comparison operator
    pending_attribute: bool,
    sort_order: Option<SortOrder>,
    count: Option<i64>,
    start_index: Option<i64>,
}

impl QueryBuilder {
    /// Create a builder targeting the given resource type.
    pub fn new(resource_type: ScimResourceType) -> Self {
        Self {
            resource_type,
            filter: String::new(),
            pending_attribute: false,
            sort_order: None,
            count: None,
            start_index: None,
        }
    }

    /// The resource type this builder validates attributes against.
    pub fn resource_type(&self) -> ScimResourceType {
        self.resource_type
    }

    /// Start the filter with `attribute`.
    ///
    /// The attribute is validated against the resource schema and appended to
    /// the filter text; the next call must be a comparison operator. Use
    /// [`and`](Self::and) or [`or`](Self::or) for every clause after the
    /// first.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAttribute`] if the attribute is empty or not in the
    /// schema, [`Error::InvalidUsage`] if the filter has already been
    /// started.
    pub fn query(&mut self, attribute: &str) -> Result<&mut Self> {
        if self.pending_attribute || !self.filter.is_empty() {
            return Err(Error::InvalidUsage(
                "query() starts a filter; use and() or or() to add further clauses",
            ));
        }
        self.push_attribute(attribute)
    }

    /// Append `" and "` and start a new clause with `attribute`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUsage`] unless at least one complete clause exists,
    /// [`Error::InvalidAttribute`] if the attribute fails validation.
    pub fn and(&mut self, attribute: &str) -> Result<&mut Self> {
        self.join(" and ", attribute)
    }

    /// Append `" or "` and start a new clause with `attribute`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUsage`] unless at least one complete clause exists,
    /// [`Error::InvalidAttribute`] if the attribute fails validation.
    pub fn or(&mut self, attribute: &str) -> Result<&mut Self> {
        self.join(" or ", attribute)
    }

    /// Append a `co` (contains) clause for the pending attribute.
    pub fn contains(&mut self, value: &str) -> Result<&mut Self> {
        self.compare(FilterOp::Co, value)
    }

    /// Append an `eq` (equal) clause for the pending attribute.
    pub fn equal_to(&mut self, value: &str) -> Result<&mut Self> {
        self.compare(FilterOp::Eq, value)
    }

    /// Append an `sw` (starts with) clause for the pending attribute.
    pub fn starts_with(&mut self, value: &str) -> Result<&mut Self> {
        self.compare(FilterOp::Sw, value)
    }

    /// Append a `gt` (greater than) clause for the pending attribute.
    pub fn greater_than(&mut self, value: &str) -> Result<&mut Self> {
        self.compare(FilterOp::Gt, value)
    }

    /// Append a `ge` (greater or equal) clause for the pending attribute.
    pub fn greater_equals(&mut self, value: &str) -> Result<&mut Self> {
        self.compare(FilterOp::Ge, value)
    }

    /// Append an `lt` (less than) clause for the pending attribute.
    pub fn less_than(&mut self, value: &str) -> Result<&mut Self> {
        self.compare(FilterOp::Lt, value)
    }

    /// Append an `le` (less or equal) clause for the pending attribute.
    pub fn less_equals(&mut self, value: &str) -> Result<&mut Self> {
        self.compare(FilterOp::Le, value)
    }

    /// Append a `pr` (present) clause for the pending attribute.
    ///
    /// Renders as `<attribute> pr ` with a trailing space and no value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidUsage`] if no attribute is pending.
    pub fn present(&mut self) -> Result<&mut Self> {
        self.take_pending()?;
        self.filter.push_str(" pr ");
        Ok(self)
    }

    /// Sort results ascending. Overwrites any previously set sort order.
    pub fn sort_order_ascending(&mut self) -> &mut Self {
        self.sort_order = Some(SortOrder::Ascending);
        self
    }

    /// Sort results descending. Overwrites any previously set sort order.
    pub fn sort_order_descending(&mut self) -> &mut Self {
        self.sort_order = Some(SortOrder::Descending);
        self
    }

    /// Set the 1-based index of the first result to return.
    ///
    /// The value is passed through opaquely; range checking is the server's
    /// concern.
    pub fn start_index(&mut self, start_index: i64) -> &mut Self {
        self.start_index = Some(start_index);
        self
    }

    /// Set the number of results per page. Passed through opaquely.
    pub fn count_per_page(&mut self, count: i64) -> &mut Self {
        self.count = Some(count);
        self
    }

    /// Render the query string.
    ///
    /// Filter text first, then `&sortOrder=`, `&count=` and `&startIndex=`
    /// for whichever parameters are set — always in that literal order, no
    /// matter the order the setters were called in. Returns the empty string
    /// when nothing was set. Repeated calls without intervening mutation
    /// return identical strings.
    pub fn build(&self) -> String {
        let mut query = self.filter.clone();
        if let Some(sort_order) = self.sort_order {
            query.push_str(&format!("&sortOrder={}", sort_order));
        }
        if let Some(count) = self.count {
            query.push_str(&format!("&count={}", count));
        }
        if let Some(start_index) = self.start_index {
            query.push_str(&format!("&startIndex={}", start_index));
        }
        tracing::debug!(
            resource_type = %self.resource_type,
            query = %query,
            "built SCIM query"
        );
        query
    }

    /// Validate and append an attribute, arming the pending-attribute state.
    fn push_attribute(&mut self, attribute: &str) -> Result<&mut Self> {
        if !is_valid_attribute(self.resource_type, attribute) {
            return Err(Error::InvalidAttribute {
                resource_type: self.resource_type,
                attribute: attribute.to_string(),
            });
        }
        self.filter.push_str(attribute);
        self.pending_attribute = true;
        Ok(self)
    }

    fn join(&mut self, separator: &str, attribute: &str) -> Result<&mut Self> {
        if self.pending_attribute || self.filter.is_empty() {
            return Err(Error::InvalidUsage(
                "and()/or() require a preceding complete filter clause",
            ));
        }
        // Validate before touching the filter so a rejected attribute leaves
        // the builder unchanged.
        if !is_valid_attribute(self.resource_type, attribute) {
            return Err(Error::InvalidAttribute {
                resource_type: self.resource_type,
                attribute: attribute.to_string(),
            });
        }
        self.filter.push_str(separator);
        self.filter.push_str(attribute);
        self.pending_attribute = true;
        Ok(self)
    }

    fn compare(&mut self, op: FilterOp, value: &str) -> Result<&mut Self> {
        self.take_pending()?;
        self.filter.push_str(&format!(" {} \"{}\"", op, value));
        Ok(self)
    }

    fn take_pending(&mut self) -> Result<()> {
        if !self.pending_attribute {
            return Err(Error::InvalidUsage(
                "comparison operators require a preceding query(), and() or or() call",
            ));
        }
        self.pending_attribute = false;
        Ok(())
    }
}
