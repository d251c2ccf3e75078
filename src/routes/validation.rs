use axum::extract::FromRequest;

use crate::constants::{
    ERR_INVALID_IMAGE_DATA, ERR_INVALID_IMAGE_FORMAT, ERR_PASSWORD_LENGTH, ERR_PASSWORD_REQUIRED,
    ERR_USERNAME_ALPHANUMERIC, ERR_USERNAME_LENGTH, ERR_USERNAME_REQUIRED, IMAGE_PREVIEW_CHARS,
};
use crate::error::AppError;
use crate::models::User;

/// JSON body extractor whose rejections become `AppError::Validation` (400)
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);

/// Check the shape of signup credentials
pub fn validate_signup(username: &str, password: &str) -> Result<(), AppError> {
    if username.is_empty() {
        return Err(AppError::Validation(ERR_USERNAME_REQUIRED.to_string()));
    }
    if !User::validate_username(username) {
        let message = if username.chars().all(|c| c.is_ascii_alphanumeric()) {
            ERR_USERNAME_LENGTH
        } else {
            ERR_USERNAME_ALPHANUMERIC
        };
        return Err(AppError::Validation(message.to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation(ERR_PASSWORD_REQUIRED.to_string()));
    }
    if !User::validate_password(password) {
        return Err(AppError::Validation(ERR_PASSWORD_LENGTH.to_string()));
    }
    Ok(())
}

/// Login only requires both fields to be present
pub fn validate_login(username: &str, password: &str) -> Result<(), AppError> {
    if username.is_empty() {
        return Err(AppError::Validation(ERR_USERNAME_REQUIRED.to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation(ERR_PASSWORD_REQUIRED.to_string()));
    }
    Ok(())
}

/// A `data:image/<format>;base64,<data>` URL split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataUrl<'a> {
    pub format: &'a str,
    pub data: &'a str,
}

/// Require an image data URL
pub fn require_image_data(image: Option<&str>) -> Result<&str, AppError> {
    image
        .filter(|s| s.starts_with("data:image/"))
        .ok_or_else(|| AppError::Validation(ERR_INVALID_IMAGE_DATA.to_string()))
}

/// Split an image data URL into format and base64 payload
pub fn parse_image_data_url(image: &str) -> Result<ImageDataUrl<'_>, AppError> {
    let invalid = || AppError::Validation(ERR_INVALID_IMAGE_FORMAT.to_string());

    let rest = image.strip_prefix("data:image/").ok_or_else(invalid)?;
    let (format, data) = rest.split_once(";base64,").ok_or_else(invalid)?;

    if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(invalid());
    }

    Ok(ImageDataUrl { format, data })
}

/// First characters of an image payload, as embedded into analysis prompts
///
/// This is only a textual hint; no real image understanding happens.
pub fn image_preview(data: &str) -> String {
    data.chars().take(IMAGE_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(result: Result<(), AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_signup_accepts_valid() {
        assert!(validate_signup("alice", "secret1").is_ok());
    }

    #[test]
    fn test_validate_signup_rejects() {
        assert_eq!(validation_message(validate_signup("", "secret1")), ERR_USERNAME_REQUIRED);
        assert_eq!(validation_message(validate_signup("ab", "secret1")), ERR_USERNAME_LENGTH);
        assert_eq!(
            validation_message(validate_signup("al!ce", "secret1")),
            ERR_USERNAME_ALPHANUMERIC
        );
        assert_eq!(validation_message(validate_signup("alice", "")), ERR_PASSWORD_REQUIRED);
        assert_eq!(validation_message(validate_signup("alice", "123")), ERR_PASSWORD_LENGTH);
    }

    #[test]
    fn test_validate_login() {
        assert!(validate_login("x", "y").is_ok());
        assert!(validate_login("", "y").is_err());
        assert!(validate_login("x", "").is_err());
    }

    #[test]
    fn test_require_image_data() {
        assert!(require_image_data(Some("data:image/png;base64,AAAA")).is_ok());
        assert!(require_image_data(Some("hello")).is_err());
        assert!(require_image_data(None).is_err());
    }

    #[test]
    fn test_parse_image_data_url() {
        let parsed = parse_image_data_url("data:image/jpeg;base64,/9j/4AAQ").unwrap();
        assert_eq!(parsed.format, "jpeg");
        assert_eq!(parsed.data, "/9j/4AAQ");

        assert!(parse_image_data_url("data:image/png,AAAA").is_err());
        assert!(parse_image_data_url("data:image/;base64,AAAA").is_err());
        assert!(parse_image_data_url("data:image/svg+xml;base64,AAAA").is_err());
    }

    #[test]
    fn test_image_preview_truncates() {
        let data = "A".repeat(500);
        assert_eq!(image_preview(&data).len(), IMAGE_PREVIEW_CHARS);
        assert_eq!(image_preview("short"), "short");
    }
}
