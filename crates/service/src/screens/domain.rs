use models::screen_subscription::PaymentStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Partial update requested by a caller.
///
/// `user` distinguishes "leave as is" (`None`) from "release the screen"
/// (`Some(None)`) and "assign" (`Some(Some(id))`, applied as a claim).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenPatch {
    pub user: Option<Option<Uuid>>,
    pub is_active: Option<bool>,
    pub payment_status: Option<PaymentStatus>,
}

/// How a patch touches the assigned user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Assign only while the screen is active and unassigned.
    Claim(Uuid),
    Release,
}

/// Column updates the repository applies in a single write once a patch is
/// authorized. With `Assignment::Claim` nothing is written unless the claim wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenChanges {
    pub assign: Option<Assignment>,
    pub is_active: Option<bool>,
    pub payment_status: Option<PaymentStatus>,
}

impl ScreenChanges {
    pub fn is_empty(&self) -> bool {
        self.assign.is_none() && self.is_active.is_none() && self.payment_status.is_none()
    }
}

impl From<&ScreenPatch> for ScreenChanges {
    fn from(p: &ScreenPatch) -> Self {
        let assign = p.user.map(|target| match target {
            Some(uid) => Assignment::Claim(uid),
            None => Assignment::Release,
        });
        Self { assign, is_active: p.is_active, payment_status: p.payment_status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_user_maps_to_assignment() {
        let uid = Uuid::new_v4();
        let claim = ScreenPatch { user: Some(Some(uid)), ..Default::default() };
        assert_eq!(ScreenChanges::from(&claim).assign, Some(Assignment::Claim(uid)));

        let release = ScreenPatch { user: Some(None), ..Default::default() };
        assert_eq!(ScreenChanges::from(&release).assign, Some(Assignment::Release));

        let untouched = ScreenChanges::from(&ScreenPatch::default());
        assert!(untouched.is_empty());
    }
}
