//! Users, groups, organizations and API clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user of the CI platform
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// User can sign in
    #[serde(default)]
    pub active: bool,
    /// Identities in external systems, in order of preference
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<UserIdentity>,
    /// Groups the user belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    /// Organizations the user belongs to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<Organization>,
    /// Roles granted to the user
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// First sign in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_visit: Option<DateTime<Utc>>,
    /// Most recent sign in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<DateTime<Utc>>,
}

impl User {
    /// First non-empty email across the user's identities
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.identities
            .iter()
            .map(|identity| identity.email.as_str())
            .find(|email| !email.is_empty())
    }

    /// Returns true if the user has `role`
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// An identity of a user in an external system
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Identity provider, e.g. `google`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// User name at the provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    /// Email at the provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

/// A group of users as configured in an external system
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    /// Group provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    /// Group name at the provider
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// A group owning pipelines
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Group name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Identities of the group in external systems
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identities: Vec<UserGroup>,
}

/// An organization owning pipelines
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Organization name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

/// An application registered to call the CI API
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Public client id
    #[serde(rename = "clientID", default, skip_serializing_if = "String::is_empty")]
    pub client_id: String,
    /// Client secret
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_secret: String,
    /// Roles granted to the client
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Moment the client was registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Client can call the API
    #[serde(default)]
    pub active: bool,
}
