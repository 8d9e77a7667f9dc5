use super::ApiError;
use crate::constants::limits::MAX_BULK_STATUS_IDS;

pub fn validate_card_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid card ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_username(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if name.len() > 50 {
        return Err(ApiError::validation(
            "Username must be 50 characters or less",
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(name)
}

pub fn validate_bulk_ids(ids: &[i32]) -> Result<&[i32], ApiError> {
    if ids.is_empty() {
        return Err(ApiError::validation("At least one card ID is required"));
    }

    if ids.len() > MAX_BULK_STATUS_IDS {
        return Err(ApiError::validation(format!(
            "At most {} card IDs can be updated at once",
            MAX_BULK_STATUS_IDS
        )));
    }

    if let Some(id) = ids.iter().find(|id| **id <= 0) {
        return Err(ApiError::validation(format!("Invalid card ID: {}", id)));
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_card_id() {
        assert!(validate_card_id(1).is_ok());
        assert!(validate_card_id(0).is_err());
        assert!(validate_card_id(-1).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  alice ").unwrap(), "alice");
        assert!(validate_username("bob_the-builder.2").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_bulk_ids() {
        assert!(validate_bulk_ids(&[1, 2, 3]).is_ok());
        assert!(validate_bulk_ids(&[]).is_err());
        assert!(validate_bulk_ids(&[1, 0]).is_err());
        assert!(validate_bulk_ids(&vec![1; 1001]).is_err());
    }
}
