use chrono::NaiveDate;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("invalid email address: {0}")]
    Email(String),

    #[error("blockout ends before it starts ({start} > {end})")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid color: {0}")]
    Color(String),

    #[error("new passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    #[error("current password is incorrect")]
    WrongPassword,

    #[error("invalid announcement target: {0}")]
    Target(String),
}

/// Trims `value` and fails when nothing is left.
pub fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed.to_string())
}

/// Empty strings become `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn email(value: &str) -> Result<String, ValidationError> {
    let value = required("email", value)?.to_lowercase();
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(value),
        _ => Err(ValidationError::Email(value)),
    }
}

/// `#rgb` or `#rrggbb`.
pub fn color(value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| ValidationError::Color(value.to_string()))?;
    if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(value.to_lowercase())
    } else {
        Err(ValidationError::Color(value.to_string()))
    }
}

pub fn new_password(new: &str, confirm: &str) -> Result<(), ValidationError> {
    if new != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if new.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Splits a comma separated list, dropping blanks.
pub fn comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", "  Ana ").unwrap(), "Ana");
        assert_eq!(
            required("name", "   ").unwrap_err(),
            ValidationError::Required("name")
        );
    }

    #[test]
    fn email_is_lowercased_and_checked() {
        assert_eq!(email("Ana@Iglesia.org").unwrap(), "ana@iglesia.org");
        assert!(email("ana.iglesia.org").is_err());
        assert!(email("@iglesia.org").is_err());
        assert!(email("ana@localhost").is_err());
    }

    #[test]
    fn colors() {
        assert_eq!(color("#3B82F6").unwrap(), "#3b82f6");
        assert!(color("#fff").is_ok());
        assert!(color("3b82f6").is_err());
        assert!(color("#3b82f").is_err());
        assert!(color("#zzzzzz").is_err());
    }

    #[test]
    fn passwords() {
        assert_eq!(
            new_password("secret1", "secret2"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(
            new_password("abc", "abc"),
            Err(ValidationError::PasswordTooShort)
        );
        assert!(new_password("abcdef", "abcdef").is_ok());
    }

    #[test]
    fn comma_list_drops_blanks() {
        assert_eq!(
            comma_list("Guitarra, Bajo,, Batería ,"),
            vec!["Guitarra", "Bajo", "Batería"]
        );
    }
}
