//! Input rules shared by the domain models and the HTTP layer, and password hashing.

use crate::db::{Column, ALLOWED_COLUMNS};
use crate::error::AppError;
use regex::Regex;
use validator::ValidationError;

/// bcrypt work factor for stored passwords.
pub const PASSWORD_HASH_COST: u32 = 12;

lazy_static::lazy_static! {
    /// Loose `local@domain.tld` shape used by the domain model.
    pub static ref EMAIL_SHAPE_REGEX: Regex = Regex::new(r"\S+@\S+\.\S+").unwrap();
    /// Letters and spaces only, for names submitted over HTTP.
    pub static ref NAME_REGEX: Regex = Regex::new(r"^[a-zA-Z\s]+$").unwrap();
    /// Hyphenated UUID, any case.
    pub static ref UUID_REGEX: Regex = Regex::new(
        r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$"
    )
    .unwrap();
    /// `col` or `col1, col2` as written in a URL path segment.
    static ref COLUMNS_PATH_REGEX: Regex = Regex::new(r"^([a-z_]+, ?)*[a-z_]+$").unwrap();
}

const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub fn calendar_date(value: &str) -> Result<(), ValidationError> {
    crate::db::value::parse_calendar_date(value)
        .map(|_| ())
        .ok_or_else(|| ValidationError::new("date"))
}

/// At least one upper, one lower, one digit and one of `@$!%*?&`, drawn
/// only from those classes.
pub fn strong_password(value: &str) -> Result<(), ValidationError> {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c));
    let has_upper = value.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = value.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    let has_special = value.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if allowed && has_upper && has_lower && has_digit && has_special {
        Ok(())
    } else {
        Err(ValidationError::new("weak_password"))
    }
}

/// Checks a `{columns}` path segment before it reaches the engine.
pub fn validate_columns_path(raw: &str) -> Result<(), AppError> {
    if !COLUMNS_PATH_REGEX.is_match(raw) {
        return Err(AppError::ValidationError(format!(
            "Columns must be written as 'column1, column2', got '{}'",
            raw
        )));
    }
    Column::parse_list(raw).map(|_| ()).map_err(|_| {
        AppError::ValidationError(format!(
            "Invalid columns '{}': allowed columns are {}",
            raw,
            ALLOWED_COLUMNS.join(", ")
        ))
    })
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, PASSWORD_HASH_COST)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_ne;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Ana").is_ok());
        assert!(not_blank("").is_err());
        assert!(not_blank("   ").is_err());
    }

    #[test]
    fn test_strong_password() {
        assert!(strong_password("Secret123!").is_ok());
        assert!(strong_password("secret123!").is_err());
        assert!(strong_password("SECRET123!").is_err());
        assert!(strong_password("Secret!!!!").is_err());
        assert!(strong_password("Secret1234").is_err());
        assert!(strong_password("Secret 123!").is_err());
    }

    #[test]
    fn test_validate_columns_path() {
        assert!(validate_columns_path("nome, email").is_ok());
        assert!(validate_columns_path("id,title").is_ok());
        assert!(validate_columns_path("nome,  email").is_err());
        assert!(validate_columns_path("nome; DROP TABLE users").is_err());
        assert!(validate_columns_path("secret").is_err());
        assert!(validate_columns_path("").is_err());
    }

    #[test]
    fn test_email_shape() {
        assert!(EMAIL_SHAPE_REGEX.is_match("ana@mail.com"));
        assert!(!EMAIL_SHAPE_REGEX.is_match("ana@mail"));
        assert!(!EMAIL_SHAPE_REGEX.is_match("ana.mail.com"));
    }

    #[test]
    fn test_hash_password_is_not_plaintext() {
        let hashed = hash_password("Secret123!").unwrap();
        assert_ne!(hashed, "Secret123!");
        assert!(bcrypt::verify("Secret123!", &hashed).unwrap());
    }
}
