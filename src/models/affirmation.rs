// SPDX-License-Identifier: MIT

//! Daily affirmation history record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An affirmation shown to a user on a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffirmationEntry {
    pub id: i64,
    pub user_id: String,
    pub affirmation: String,
    pub date: NaiveDate,
}
