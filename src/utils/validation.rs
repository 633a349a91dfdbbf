use crate::utils::error::{BasketError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(BasketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BasketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BasketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(BasketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Allowed values: {}", allowed.join(", ")),
        });
    }
    Ok(())
}

/// Session ids become directory names in the file store.
pub fn validate_session_id(value: &str) -> Result<()> {
    validate_non_empty_string("session_id", value)?;

    if value.contains(['/', '\\', '\0']) || value == "." || value == ".." {
        return Err(BasketError::InvalidConfigValueError {
            field: "session_id".to_string(),
            value: value.to_string(),
            reason: "Session id cannot contain path separators".to_string(),
        });
    }
    Ok(())
}

/// Session keys may contain `/` (namespacing) but no parent references.
pub fn validate_session_key(value: &str) -> Result<()> {
    validate_path("basket.session_key", value)?;

    if value.starts_with('/') || value.split(['/', '\\']).any(|part| part == ".." || part.is_empty())
    {
        return Err(BasketError::InvalidConfigValueError {
            field: "basket.session_key".to_string(),
            value: value.to_string(),
            reason: "Session key must be a relative name without empty or parent segments"
                .to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("basket.class", "default").is_ok());
        assert!(validate_non_empty_string("basket.class", "   ").is_err());
    }

    #[test]
    fn test_validate_session_id() {
        assert!(validate_session_id("a1b2c3").is_ok());
        assert!(validate_session_id("").is_err());
        assert!(validate_session_id("../etc").is_err());
        assert!(validate_session_id("..").is_err());
    }

    #[test]
    fn test_validate_session_key() {
        assert!(validate_session_key("sonata/basket").is_ok());
        assert!(validate_session_key("/sonata/basket").is_err());
        assert!(validate_session_key("sonata/../basket").is_err());
        assert!(validate_session_key("sonata//basket").is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("logging.level", "info", &["info", "debug"]).is_ok());
        assert!(validate_one_of("logging.level", "loud", &["info", "debug"]).is_err());
    }
}
