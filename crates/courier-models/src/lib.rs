//! Data-model layer for Courier.
//!
//! Records that cross the wire implement [`Model`]: serde in both
//! directions plus an optional server-assigned identifier. Identity
//! comparison goes through [`Model::identity_eq`], never `PartialEq`.

pub mod dates;
pub mod model;
pub mod user;

pub use model::Model;
pub use user::{User, UserType};
