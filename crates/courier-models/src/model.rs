//! Model identity contract.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Contract for wire-facing data records.
///
/// Every model carries an optional identifier, assigned by the server
/// once the record is persisted. Two records refer to the same entity
/// iff both identifiers are present and equal; a record without an
/// identifier matches nothing, itself included. The relation is not
/// reflexive, so it is a named method rather than a `PartialEq` impl.
pub trait Model: Serialize + DeserializeOwned {
    /// Server-assigned identifier, absent until the record is persisted.
    fn id(&self) -> Option<&str>;

    /// Whether `self` and `other` refer to the same persisted entity.
    fn identity_eq(&self, other: &Self) -> bool {
        match (self.id(), other.id()) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}
