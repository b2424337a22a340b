//! Role-gated extractors.
//!
//! Each one authenticates through [`AuthUser`] and answers 403 when the
//! caller's role is not in its allowed set.
//!
//! ```ignore
//! async fn list_users(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
//!     Ok(Json(()))
//! }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bimbingan_core::error::CoreError;
use bimbingan_core::roles::{ROLE_ADMIN, ROLE_ADVISOR, ROLE_STUDENT};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then check the role against `allowed`.
async fn require_role(
    parts: &mut Parts,
    state: &AppState,
    allowed: &[&str],
    denial: &str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if allowed.contains(&user.role.as_str()) {
        Ok(user)
    } else {
        tracing::debug!(user_id = user.user_id, role = %user.role, "Role check failed");
        Err(AppError::Core(CoreError::Forbidden(denial.to_string())))
    }
}

macro_rules! role_extractor {
    ($(#[$doc:meta])* $name:ident, [$($role:expr),+], $denial:literal) => {
        $(#[$doc])*
        pub struct $name(pub AuthUser);

        impl FromRequestParts<AppState> for $name {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                require_role(parts, state, &[$($role),+], $denial).await.map($name)
            }
        }
    };
}

role_extractor!(
    /// Administrators only.
    RequireAdmin,
    [ROLE_ADMIN],
    "Admin role required"
);

role_extractor!(
    /// Lecturers acting as advisors.
    RequireAdvisor,
    [ROLE_ADVISOR],
    "Advisor role required"
);

role_extractor!(
    /// Students only.
    RequireStudent,
    [ROLE_STUDENT],
    "Student role required"
);

role_extractor!(
    /// Advisors, or an administrator acting on their behalf.
    RequireAdvisorOrAdmin,
    [ROLE_ADVISOR, ROLE_ADMIN],
    "Advisor or admin role required"
);
