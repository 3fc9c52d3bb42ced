use serde::{Deserialize, Serialize};

use crate::models::appointment::DEFAULT_FREQUENCY_DAYS;

/// Fallback recurrence used when no prior appointment exists to derive a
/// default from.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub frequency_days: i64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            frequency_days: DEFAULT_FREQUENCY_DAYS,
        }
    }
}
