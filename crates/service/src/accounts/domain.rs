use models::errors::ModelError;
use models::streaming_account;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Partial update of an account; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountChanges {
    pub service_id: Option<Uuid>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub price_per_screen: Option<i32>,
    pub total_screens: Option<i32>,
    pub verified: Option<bool>,
}

impl AccountChanges {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(u) = &self.username { streaming_account::validate_credential("username", u)?; }
        if let Some(p) = &self.password { streaming_account::validate_credential("password", p)?; }
        if let Some(c) = self.price_per_screen { streaming_account::validate_price(c)?; }
        if let Some(t) = self.total_screens { streaming_account::validate_total_screens(t)?; }
        Ok(())
    }
}
