// SPDX-License-Identifier: MIT

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User profile, upserted on each OIDC login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// OIDC subject claim (also used as the storage key)
    pub id: String,
    /// Email address (may be None if not shared by the provider)
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    /// When the user first logged in
    pub created_at: DateTime<Utc>,
    /// Last login timestamp
    pub updated_at: DateTime<Utc>,
}
