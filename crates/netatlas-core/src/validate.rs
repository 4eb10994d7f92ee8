// ── Client-side input validation ──
//
// Rejects incomplete device input before any network call is made, per
// the dashboard contract: the backend also validates, but the round trip
// is wasted and the error text less specific.

use crate::error::CoreError;

/// Validate input for an add-device request: ip, location, and name are
/// all required.
pub fn validate_add(ip: &str, location: &str, name: &str) -> Result<(), CoreError> {
    require("ip", ip)?;
    require("location", location)?;
    require("name", name)?;
    Ok(())
}

/// Validate input for a delete-device request.
pub fn validate_delete(ip: &str) -> Result<(), CoreError> {
    require("ip", ip)
}

fn require(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::ValidationFailed {
            message: format!("{field} is required"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_requires_all_fields() {
        assert!(validate_add("10.0.0.1", "PGCIL", "Switch A").is_ok());
        assert!(validate_add("", "PGCIL", "Switch A").is_err());
        assert!(validate_add("10.0.0.1", "", "Switch A").is_err());
        assert!(validate_add("10.0.0.1", "PGCIL", "   ").is_err());
    }

    #[test]
    fn delete_requires_ip() {
        assert!(validate_delete("10.0.0.1").is_ok());
        assert!(validate_delete("").is_err());
    }

    #[test]
    fn message_names_the_field() {
        let err = validate_add("", "PGCIL", "Switch A").expect_err("must fail");
        assert!(err.to_string().contains("ip is required"));
    }
}
