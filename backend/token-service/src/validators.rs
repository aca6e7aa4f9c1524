use once_cell::sync::Lazy;
use regex::Regex;

/// Input validation utilities for token service

// Compile regex patterns once at startup
static GUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    // This regex is hardcoded and validated - it is a compile-time constant in practice
    Regex::new(r"^[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}$")
        .expect("hardcoded GUID regex is invalid - fix source code")
});

/// Validate that a client-supplied user id is a well-formed GUID.
///
/// Format check only; existence against a user directory is out of scope.
pub fn validate_user_id(user_id: &str) -> bool {
    GUID_REGEX.is_match(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_guid() {
        assert!(validate_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
        assert!(validate_user_id("00000000-0000-0000-0000-000000000000"));
        assert!(validate_user_id("ABCDEF01-2345-6789-abcd-ef0123456789"));
    }

    #[test]
    fn test_invalid_guid() {
        assert!(!validate_user_id("not-a-guid"));
        assert!(!validate_user_id(""));
        assert!(!validate_user_id("3fa85f64-5717-4562-b3fc-2c963f66afa")); // Too short
        assert!(!validate_user_id("3fa85f6457174562b3fc2c963f66afa6")); // No dashes
        assert!(!validate_user_id("3fa85f64-5717-4562-b3fc-2c963f66afag")); // Non-hex
        assert!(!validate_user_id(" 3fa85f64-5717-4562-b3fc-2c963f66afa6")); // Leading space
    }
}
