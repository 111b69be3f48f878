//! Length limits applied by the HTTP layer before anything reaches the store.

use thiserror::Error;

pub const MAX_CREATOR_LEN: usize = 30;
pub const MAX_TEXT_LEN: usize = 50;

/// The `Display` text is shown to the poster as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("creator name too long")]
    CreatorTooLong,
    #[error("board name too long")]
    BoardTextTooLong,
    #[error("comment too long")]
    CommentTooLong,
}

fn too_long(s: &str, max: usize) -> bool {
    s.chars().count() > max
}

pub fn validate_board(creator: &str, text: &str) -> Result<(), ValidationError> {
    if too_long(creator, MAX_CREATOR_LEN) {
        return Err(ValidationError::CreatorTooLong);
    }
    if too_long(text, MAX_TEXT_LEN) {
        return Err(ValidationError::BoardTextTooLong);
    }
    Ok(())
}

pub fn validate_comment(creator: &str, text: &str) -> Result<(), ValidationError> {
    if too_long(creator, MAX_CREATOR_LEN) {
        return Err(ValidationError::CreatorTooLong);
    }
    if too_long(text, MAX_TEXT_LEN) {
        return Err(ValidationError::CommentTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_inclusive() {
        let name = "n".repeat(MAX_CREATOR_LEN);
        let text = "t".repeat(MAX_TEXT_LEN);
        assert!(validate_board(&name, &text).is_ok());
        assert!(validate_comment(&name, &text).is_ok());
    }

    #[test]
    fn creator_is_checked_first() {
        let name = "n".repeat(MAX_CREATOR_LEN + 1);
        let text = "t".repeat(MAX_TEXT_LEN + 1);
        assert_eq!(validate_board(&name, &text), Err(ValidationError::CreatorTooLong));
        assert_eq!(validate_board("bob", &text), Err(ValidationError::BoardTextTooLong));
        assert_eq!(validate_comment("bob", &text), Err(ValidationError::CommentTooLong));
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 30 two-byte characters
        let name = "é".repeat(MAX_CREATOR_LEN);
        assert!(validate_board(&name, "ok").is_ok());
    }
}
