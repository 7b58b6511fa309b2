//! Authentication and ownership checks.

mod extractor;

pub use extractor::AuthUser;

use crate::error::{AppError, AppResult};

/// Ownership check gating every mutation: the record's owning user id must
/// equal the caller's id. Callers resolve existence (404) before this point,
/// so a mismatch is always 403.
pub fn ensure_owner(owner_id: &str, caller_id: &str) -> AppResult<()> {
    if owner_id == caller_id {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_match_passes() {
        assert!(ensure_owner("user_1", "user_1").is_ok());
    }

    #[test]
    fn test_owner_mismatch_is_forbidden() {
        let err = ensure_owner("user_1", "user_2").unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }
}
