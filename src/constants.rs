/// Name of the cookie carrying the session token
pub const TOKEN_COOKIE: &str = "token";

/// Session token lifetime in seconds (1 hour)
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "primergpt_server=info,tower_http=debug";

/// Default bcrypt cost factor
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Maximum request body size in bytes (10MB)
/// Image uploads arrive as base64 data URLs inside JSON
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Username length bounds (inclusive)
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;

/// Minimum password length
pub const PASSWORD_MIN_LEN: usize = 6;

/// Number of characters of an image payload embedded into the analysis prompt
pub const IMAGE_PREVIEW_CHARS: usize = 100;

// =============================================================================
// Response Messages
// =============================================================================

pub const MSG_USER_CREATED: &str = "User created successfully";
pub const MSG_PASSWORD_RESET: &str = "Password reset successfully";
pub const MSG_LOGIN_OK: &str = "Login successful";
pub const MSG_LOGGED_OUT: &str = "Logged out successfully";
pub const MSG_IMAGE_ANALYZED: &str = "Image analyzed successfully";

/// Fixed reply to `analyze-image` socket events
pub const MSG_SOCKET_IMAGE_REPLY: &str = "I can see an image in the data. It appears to be a digital file that I could analyze if I had image processing capabilities. For now, I'm a mock service, but I'm happy to discuss what you'd like to know about the image!";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_USERNAME_REQUIRED: &str = "Username is required";
pub const ERR_USERNAME_LENGTH: &str = "Username must be between 3 and 30 characters long";
pub const ERR_USERNAME_ALPHANUMERIC: &str = "Username must only contain alpha-numeric characters";
pub const ERR_PASSWORD_REQUIRED: &str = "Password is required";
pub const ERR_PASSWORD_LENGTH: &str = "Password must be at least 6 characters long";
pub const ERR_PROMPT_REQUIRED: &str = "Prompt is required";
pub const ERR_INVALID_IMAGE_DATA: &str = "Invalid or missing image data";
pub const ERR_INVALID_IMAGE_FORMAT: &str = "Invalid image format";
pub const ERR_RATE_LIMITED: &str = "Too many requests from this IP, please try again later.";
