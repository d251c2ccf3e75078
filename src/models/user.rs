use serde::{Deserialize, Serialize};

use crate::constants::{PASSWORD_MIN_LEN, USERNAME_MAX_LEN, USERNAME_MIN_LEN};

/// User record stored in the credential store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Sequential, 1-based identifier
    pub id: u64,
    /// Unique username
    pub username: String,
    /// bcrypt hash of the password
    /// Older stores named this field `password`
    #[serde(rename = "passwordHash", alias = "password")]
    pub password_hash: String,
}

impl User {
    /// Username is ASCII alphanumeric, 3-30 characters
    pub fn validate_username(username: &str) -> bool {
        (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len())
            && username.chars().all(|c| c.is_ascii_alphanumeric())
    }

    /// Password is at least 6 characters
    pub fn validate_password(password: &str) -> bool {
        password.chars().count() >= PASSWORD_MIN_LEN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(User::validate_username("alice"));
        assert!(User::validate_username("abc"));
        assert!(User::validate_username(&"a".repeat(30)));
        assert!(User::validate_username("User42"));

        // Too short / too long
        assert!(!User::validate_username("ab"));
        assert!(!User::validate_username(&"a".repeat(31)));

        // Non-alphanumeric
        assert!(!User::validate_username("alice_b"));
        assert!(!User::validate_username("alice b"));
        assert!(!User::validate_username("élise"));
    }

    #[test]
    fn test_validate_password() {
        assert!(User::validate_password("secret1"));
        assert!(User::validate_password("123456"));
        assert!(!User::validate_password("12345"));
        assert!(!User::validate_password(""));
    }

    #[test]
    fn test_serializes_password_hash_field() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            password_hash: "$2b$10$hash".to_string(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["passwordHash"], "$2b$10$hash");
        assert!(value.get("password").is_none());
    }

    #[test]
    fn test_reads_legacy_password_field() {
        let raw = r#"{"id": 3, "username": "bob", "password": "$2a$10$legacy"}"#;
        let user: User = serde_json::from_str(raw).unwrap();

        assert_eq!(user.id, 3);
        assert_eq!(user.password_hash, "$2a$10$legacy");
    }
}
