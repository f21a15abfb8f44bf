//! Example user records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::mongo_date;
use crate::model::Model;

/// Account tier for a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Free,
    Premium,
}

/// A user record as the API returns it.
///
/// Every field is optional so partial server responses still decode.
/// Nested records work like any other field as long as they implement
/// serde's traits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friends: Option<Vec<User>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(
        default,
        with = "mongo_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Model for User {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
