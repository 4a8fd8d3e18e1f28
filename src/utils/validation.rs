//! Validation utilities for configuration values

use crate::types::*;

/// Validate that a currency code is non-empty and alphabetic
pub fn validate_currency_code(code: &str) -> PipelineResult<()> {
    if code.trim().is_empty() {
        return Err(PipelineError::Config(
            "Currency code cannot be empty".to_string(),
        ));
    }

    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(PipelineError::Config(format!(
            "Currency code '{}' can only contain ASCII letters",
            code
        )));
    }

    Ok(())
}

/// Validate that a company name is usable as a filter key
pub fn validate_company_name(name: &str) -> PipelineResult<()> {
    if name.trim().is_empty() {
        return Err(PipelineError::Config(
            "Company name cannot be empty".to_string(),
        ));
    }

    if name.len() > 200 {
        return Err(PipelineError::Config(
            "Company name cannot exceed 200 characters".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_codes() {
        assert!(validate_currency_code("SEK").is_ok());
        assert!(validate_currency_code("usd").is_ok());
        assert!(validate_currency_code("").is_err());
        assert!(validate_currency_code("SE1").is_err());
        assert!(validate_currency_code("S K").is_err());
    }

    #[test]
    fn test_company_names() {
        assert!(validate_company_name("Nexara Technologies").is_ok());
        assert!(validate_company_name("   ").is_err());
        assert!(validate_company_name(&"x".repeat(201)).is_err());
    }
}
