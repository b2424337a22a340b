//! Advisor assignment (pairing) rules.

use crate::error::CoreError;
use crate::roles::{ROLE_ADVISOR, ROLE_STUDENT};

/// A student has at most a primary advisor and one co-advisor.
pub const MAX_ADVISORS_PER_STUDENT: i16 = 2;

/// Validate an advisor's position in a pairing (1 = primary, 2 = co-advisor).
pub fn validate_advisor_order(order: i16) -> Result<(), CoreError> {
    if (1..=MAX_ADVISORS_PER_STUDENT).contains(&order) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Advisor order must be between 1 and {MAX_ADVISORS_PER_STUDENT}, got {order}"
        )))
    }
}

/// Validate that the two users of a pairing hold the right roles.
pub fn validate_pair_roles(student_role: &str, advisor_role: &str) -> Result<(), CoreError> {
    if student_role != ROLE_STUDENT {
        return Err(CoreError::Validation(format!(
            "Assigned student must have the '{ROLE_STUDENT}' role (found '{student_role}')"
        )));
    }
    if advisor_role != ROLE_ADVISOR {
        return Err(CoreError::Validation(format!(
            "Assigned advisor must have the '{ROLE_ADVISOR}' role (found '{advisor_role}')"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisor_order_bounds() {
        assert!(validate_advisor_order(1).is_ok());
        assert!(validate_advisor_order(2).is_ok());
        assert!(validate_advisor_order(0).is_err());
        assert!(validate_advisor_order(3).is_err());
    }

    #[test]
    fn pair_roles_must_match() {
        assert!(validate_pair_roles("student", "advisor").is_ok());
        assert!(validate_pair_roles("advisor", "advisor").is_err());
        assert!(validate_pair_roles("student", "admin").is_err());
    }
}
