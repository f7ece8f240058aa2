//! Password policy enforcement for new passwords.

use yardstock_core::config::AuthConfig;

use crate::error::{AuthError, AuthResult};

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
    /// Whether the zxcvbn entropy check applies.
    require_strength: bool,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            require_strength: config.password_require_strength,
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns the first violation found.
    pub fn validate(&self, password: &str) -> AuthResult<()> {
        if password.chars().count() < self.min_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AuthError::Validation(
                "Password must contain at least one uppercase letter".into(),
            ));
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AuthError::Validation(
                "Password must contain at least one lowercase letter".into(),
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AuthError::Validation(
                "Password must contain at least one digit".into(),
            ));
        }

        if !password.chars().any(|c| !c.is_alphanumeric()) {
            return Err(AuthError::Validation(
                "Password must contain at least one special character".into(),
            ));
        }

        if self.require_strength {
            let estimate = zxcvbn::zxcvbn(password, &[]);
            if estimate.score() < zxcvbn::Score::Three {
                return Err(AuthError::Validation(
                    "Password is too weak. Please use a stronger password with more entropy."
                        .into(),
                ));
            }
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(&self, old_password: &str, new_password: &str) -> AuthResult<()> {
        if old_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from the current password".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(require_strength: bool) -> PasswordValidator {
        PasswordValidator::new(&AuthConfig {
            password_require_strength: require_strength,
            ..AuthConfig::default()
        })
    }

    #[test]
    fn test_character_classes() {
        let v = validator(false);
        assert!(v.validate("Sh0rt!").is_err());
        assert!(v.validate("alllowercase1!").is_err());
        assert!(v.validate("ALLUPPERCASE1!").is_err());
        assert!(v.validate("NoDigitsHere!").is_err());
        assert!(v.validate("NoSpecial123").is_err());
        assert!(v.validate("Forklift#42").is_ok());
    }

    #[test]
    fn test_strength_check() {
        let v = validator(true);
        assert!(v.validate("Password1!").is_err());
        assert!(v.validate("Gravel-Tundra-Oxbow-73").is_ok());
    }

    #[test]
    fn test_not_same() {
        let v = validator(false);
        assert!(v.validate_not_same("Forklift#42", "Forklift#42").is_err());
        assert!(v.validate_not_same("Forklift#42", "Forklift#43").is_ok());
    }
}
