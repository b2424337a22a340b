//! Well-known role name constants.
//!
//! These must match the seed data in `20240101000002_create_roles_table.sql`.

use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ADVISOR: &str = "advisor";
pub const ROLE_STUDENT: &str = "student";

/// Seeded role ids, in the order the migration inserts them.
pub const ROLE_ID_ADMIN: DbId = 1;
pub const ROLE_ID_ADVISOR: DbId = 2;
pub const ROLE_ID_STUDENT: DbId = 3;

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_ADVISOR, ROLE_STUDENT];

/// Returns `true` if `role` is one of the two roles that take part in
/// advising (i.e. can own meetings and submissions).
pub fn is_participant_role(role: &str) -> bool {
    role == ROLE_ADVISOR || role == ROLE_STUDENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn participant_roles() {
        assert!(is_participant_role(ROLE_STUDENT));
        assert!(is_participant_role(ROLE_ADVISOR));
        assert!(!is_participant_role(ROLE_ADMIN));
        assert!(!is_participant_role("lecturer"));
    }

    #[test]
    fn valid_roles_contains_all_three() {
        assert_eq!(VALID_ROLES.len(), 3);
    }
}
