use crate::utils::error::{ExplainError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ExplainError::RulesMalformed {
            detail: format!("{field_name}: path cannot be empty"),
        });
    }

    if path.contains('\0') {
        return Err(ExplainError::RulesMalformed {
            detail: format!("{field_name}: path contains null bytes"),
        });
    }

    Ok(())
}
