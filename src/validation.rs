use crate::error::AppError;

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Attribute ids become JSON object keys in the credential subject.
pub fn require_attribute_id(value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation("attribute id cannot be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty_rejects_whitespace() {
        let err = require_non_empty("schema_type", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: schema_type cannot be empty");
        assert!(require_non_empty("schema_type", "KYCAgeCredential").is_ok());
    }

    #[test]
    fn test_require_attribute_id() {
        assert!(require_attribute_id("").is_err());
        assert!(require_attribute_id("birthday").is_ok());
    }
}
