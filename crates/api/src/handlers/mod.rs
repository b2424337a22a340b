//! HTTP handlers, one module per resource.

pub mod activity;
pub mod admin;
pub mod assignments;
pub mod auth;
pub mod calendar;
pub mod meetings;
pub mod profile;
pub mod submissions;

use bimbingan_core::error::CoreError;
use bimbingan_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Allow admins and the two people a meeting or submission belongs to.
pub(crate) fn ensure_participant(
    user: &AuthUser,
    student_id: DbId,
    advisor_id: DbId,
) -> AppResult<()> {
    if user.is_admin() || user.user_id == student_id || user.user_id == advisor_id {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "You are not a participant of this record".into(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn user(id: DbId, role: &str) -> AuthUser {
        AuthUser {
            user_id: id,
            role: role.to_string(),
        }
    }

    #[test]
    fn participants_and_admins_pass() {
        assert!(ensure_participant(&user(1, "student"), 1, 2).is_ok());
        assert!(ensure_participant(&user(2, "advisor"), 1, 2).is_ok());
        assert!(ensure_participant(&user(9, "admin"), 1, 2).is_ok());
    }

    #[test]
    fn outsiders_are_forbidden() {
        assert_matches!(
            ensure_participant(&user(3, "advisor"), 1, 2),
            Err(AppError::Core(CoreError::Forbidden(_)))
        );
    }
}
