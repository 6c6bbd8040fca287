//! Error codes for the bookstore backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code maps 1:1 to the SCREAMING_SNAKE_CASE string that appears in
//! the `code` field of HTTP error bodies.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No bearer token, or not in `Bearer <token>` shape
    MissingToken,
    /// Token failed verification (bad signature, malformed, or expired)
    InvalidToken,
    /// Token subject no longer exists in the credential store
    UserNotFound,
    /// Caller is authenticated but does not own the resource
    Forbidden,
    /// Login with unknown email or wrong password
    InvalidCredentials,

    // Request Validation
    /// Required fields missing or empty
    MissingFields,
    /// Password below the minimum length
    PasswordTooShort,
    /// Username below the minimum length
    UsernameTooShort,
    /// Rating outside the accepted range
    InvalidRating,
    /// Pagination parameters out of range
    InvalidPagination,
    /// Username or email already registered
    UsernameOrEmailTaken,
    /// General validation error
    ValidationError,
    /// Malformed request body or parameters
    BadRequest,

    // Resource Not Found
    /// Book not found
    BookNotFound,
    /// General not found error
    NotFound,

    // Conflicts
    /// Unique constraint hit while writing
    UniqueViolation,
    /// Generic conflict
    Conflict,

    // System Errors
    /// Credential store / database unreachable
    StoreUnavailable,
    /// Database error
    DbError,
    /// Media host rejected the request or could not be reached
    MediaUpstream,
    /// Media host credentials are not configured
    MediaNotConfigured,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// The canonical string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",

            Self::MissingFields => "MISSING_FIELDS",
            Self::PasswordTooShort => "PASSWORD_TOO_SHORT",
            Self::UsernameTooShort => "USERNAME_TOO_SHORT",
            Self::InvalidRating => "INVALID_RATING",
            Self::InvalidPagination => "INVALID_PAGINATION",
            Self::UsernameOrEmailTaken => "USERNAME_OR_EMAIL_TAKEN",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::BookNotFound => "BOOK_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::Conflict => "CONFLICT",

            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::DbError => "DB_ERROR",
            Self::MediaUpstream => "MEDIA_UPSTREAM",
            Self::MediaNotConfigured => "MEDIA_NOT_CONFIGURED",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::MissingToken,
        ErrorCode::InvalidToken,
        ErrorCode::UserNotFound,
        ErrorCode::Forbidden,
        ErrorCode::InvalidCredentials,
        ErrorCode::MissingFields,
        ErrorCode::PasswordTooShort,
        ErrorCode::UsernameTooShort,
        ErrorCode::InvalidRating,
        ErrorCode::InvalidPagination,
        ErrorCode::UsernameOrEmailTaken,
        ErrorCode::ValidationError,
        ErrorCode::BadRequest,
        ErrorCode::BookNotFound,
        ErrorCode::NotFound,
        ErrorCode::UniqueViolation,
        ErrorCode::Conflict,
        ErrorCode::StoreUnavailable,
        ErrorCode::DbError,
        ErrorCode::MediaUpstream,
        ErrorCode::MediaNotConfigured,
        ErrorCode::Internal,
        ErrorCode::ConfigError,
    ];

    #[test]
    fn test_codes_are_unique_screaming_snake_case() {
        let mut seen = HashSet::new();
        for code in ALL {
            let s = code.as_str();
            assert!(seen.insert(s), "duplicate error code string: {s}");
            assert!(
                s.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "not SCREAMING_SNAKE_CASE: {s}"
            );
        }
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", ErrorCode::MissingToken), "MISSING_TOKEN");
        assert_eq!(format!("{}", ErrorCode::InvalidToken), "INVALID_TOKEN");
        assert_eq!(format!("{}", ErrorCode::StoreUnavailable), "STORE_UNAVAILABLE");
    }
}
