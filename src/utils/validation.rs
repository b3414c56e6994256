use validator::Validate;
use crate::errors::AppResult;

pub fn validate_payload<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate()?;
    Ok(())
}

/// Rejects strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}
