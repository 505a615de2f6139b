use std::sync::Arc;

use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

/// Declarative description of one setting: its variable, default and constraints
///
/// ```text
/// ConfigSpec::new(env, "PAGINATION_SIZE").default_value("20").integer_in(1, 1000)?
/// ```
pub struct ConfigSpec {
    env_provider: Arc<dyn EnvironmentProvider>,
    name: String,
    default_value: Option<String>,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    validator: Option<fn(&str) -> Result<(), String>>,
}

impl ConfigSpec {
    pub fn new(env_provider: Arc<dyn EnvironmentProvider>, name: &str) -> Self {
        Self {
            env_provider,
            name: name.to_string(),
            default_value: None,
            required: false,
            min_length: None,
            max_length: None,
            validator: None,
        }
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    /// The variable's value, else the default, validated either way
    pub fn string(self) -> Result<String, ApplicationError> {
        let value = match self.env_provider.non_blank_var(&self.name) {
            Some(value) => value,
            None => match &self.default_value {
                Some(default) => default.clone(),
                None if self.required => {
                    return Err(ApplicationError::MissingRequiredSetting {
                        setting_name: self.name.clone(),
                    })
                }
                None => String::new(),
            },
        };

        self.check(&value)?;
        Ok(value)
    }

    /// Accepts true/false, 1/0, yes/no, on/off in any case
    pub fn boolean(self) -> Result<bool, ApplicationError> {
        let name = self.name.clone();
        let value = self.string()?;
        match value.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ApplicationError::ParseError {
                setting_name: name,
                error: format!("expected a boolean, got '{}'", value),
            }),
        }
    }

    pub fn port(self) -> Result<u16, ApplicationError> {
        let port = self.integer_in(1, u16::MAX as u64)?;
        Ok(port as u16)
    }

    /// An unsigned integer within `min..=max`
    pub fn integer_in(self, min: u64, max: u64) -> Result<u64, ApplicationError> {
        let name = self.name.clone();
        let value = self.string()?;
        let parsed = value.parse::<u64>().map_err(|e| ApplicationError::ParseError {
            setting_name: name.clone(),
            error: format!("expected an integer, got '{}': {}", value, e),
        })?;

        if !(min..=max).contains(&parsed) {
            return Err(ApplicationError::InvalidSetting {
                setting_name: name,
                reason: format!("{} is outside {}..={}", parsed, min, max),
            });
        }
        Ok(parsed)
    }

    fn check(&self, value: &str) -> Result<(), ApplicationError> {
        let invalid = |reason: String| ApplicationError::InvalidSetting {
            setting_name: self.name.clone(),
            reason,
        };

        let length = value.chars().count();
        if let Some(min) = self.min_length {
            if length < min {
                return Err(invalid(format!("must be at least {} characters long", min)));
            }
        }
        if let Some(max) = self.max_length {
            if length > max {
                return Err(invalid(format!("must be at most {} characters long", max)));
            }
        }
        if let Some(validator) = self.validator {
            validator(value).map_err(invalid)?;
        }
        Ok(())
    }

    /// Rejects whitespace inside a host name or address; does not resolve it
    pub fn validate_host_address(value: &str) -> Result<(), String> {
        if value.chars().any(char::is_whitespace) {
            return Err("host address cannot contain whitespace".to_string());
        }
        Ok(())
    }
}
