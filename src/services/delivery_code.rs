use sea_orm::{DatabaseConnection, EntityTrait};

use crate::entities::trip_request;
use crate::error::{AppError, AppResult};
use crate::utils::code::is_well_formed_code;

/// The strict hand-off rule: the supplied code must match the stored one
/// and must not already have been retired into `invalid_code`.
pub fn code_is_valid(stored: Option<&str>, invalid: Option<&str>, supplied: &str) -> bool {
    match stored {
        Some(stored) => stored == supplied && invalid != Some(supplied),
        None => false,
    }
}

/// Loose check used mid-trip: does the supplied code match the stored
/// one? Deliberately ignores retirement; see [`validate`] for the
/// hand-off variant.
pub async fn verify(db: &DatabaseConnection, id: i64, supplied: &str) -> AppResult<bool> {
    let request = trip_request::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip request not found".to_string()))?;

    let code = request.code.as_deref().ok_or_else(|| {
        AppError::BadRequest("This trip request has no delivery code".to_string())
    })?;

    Ok(code == supplied)
}

/// Strict check at the hand-off moment: also rejects a code retired by a
/// previous finish transition. Malformed input never touches the store.
pub async fn validate(db: &DatabaseConnection, id: i64, supplied: &str) -> AppResult<bool> {
    if !is_well_formed_code(supplied) {
        return Ok(false);
    }

    let request = trip_request::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Trip request not found".to_string()))?;

    Ok(code_is_valid(
        request.code.as_deref(),
        request.invalid_code.as_deref(),
        supplied,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_code_is_valid() {
        assert!(code_is_valid(Some("A1B2C3"), None, "A1B2C3"));
    }

    #[test]
    fn wrong_code_is_invalid() {
        assert!(!code_is_valid(Some("A1B2C3"), None, "ZZZZZZ"));
        assert!(!code_is_valid(None, None, "A1B2C3"));
    }

    #[test]
    fn retired_code_fails_validate_but_still_verifies() {
        // After the finish transition copies code into invalid_code the
        // strict check must fail even though equality still holds
        let stored = Some("A1B2C3");
        let retired = Some("A1B2C3");

        assert!(!code_is_valid(stored, retired, "A1B2C3"));
        assert_eq!(stored, Some("A1B2C3")); // verify's equality view is unchanged
    }
}
