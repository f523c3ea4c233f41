//! Record Module
//!
//! The contract a persistent record type offers to its cache bindings.

use chrono::{DateTime, Utc};

// == Record ==
/// Attribute access and soft-deletion state of a persistent record.
///
/// Template placeholders and named resolvers are looked up through
/// [`Record::attribute`]. Returning `None` means the record has no accessor
/// of that name, which surfaces as `ResolverNotFound`; an accessor whose
/// value happens to be empty should return `Some(String::new())`.
///
/// Record types with a "deleted-at" column set `SOFT_DELETE` to true and
/// override [`Record::deleted_at`]. Hash bindings of such types keep
/// soft-deleted records out of their hash.
///
/// ```ignore
/// struct Membership {
///     team_id: u64,
///     user: String,
///     role: String,
///     deleted_at: Option<DateTime<Utc>>,
/// }
///
/// impl Record for Membership {
///     const SOFT_DELETE: bool = true;
///
///     fn attribute(&self, name: &str) -> Option<String> {
///         match name {
///             "team_id" => Some(self.team_id.to_string()),
///             "user" => Some(self.user.clone()),
///             "role" => Some(self.role.clone()),
///             _ => None,
///         }
///     }
///
///     fn deleted_at(&self) -> Option<DateTime<Utc>> {
///         self.deleted_at
///     }
/// }
/// ```
pub trait Record {
    /// Whether the record type exposes a "deleted-at" attribute.
    const SOFT_DELETE: bool = false;

    /// Returns the string form of the named zero-argument accessor.
    fn attribute(&self, name: &str) -> Option<String>;

    /// When the record was soft-deleted, if it was.
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// True when the type is soft-deletion-aware and this record is soft-deleted.
    fn is_soft_deleted(&self) -> bool {
        Self::SOFT_DELETE && self.deleted_at().is_some()
    }
}
