use std::collections::HashMap;

/// Source of configuration variables
///
/// Settings never read `std::env` directly, so tests can run in parallel with
/// their own variables. Blank values count as unset: `PORT=` in a `.env` file
/// falls back to the default instead of failing to parse.
pub trait EnvironmentProvider: Send + Sync {
    fn get_var(&self, key: &str) -> Option<String>;

    /// The trimmed value of `key`, or `None` when unset or blank
    fn non_blank_var(&self, key: &str) -> Option<String> {
        self.get_var(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Reads the process environment (after `.env` has been loaded by main)
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables held in memory
#[derive(Debug, Clone, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    /// Later pairs override earlier ones with the same key
    pub fn with_vars(self, vars: &[(&str, &str)]) -> Self {
        vars.iter().fold(self, |env, (key, value)| env.with_var(key, value))
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_earlier_values() {
        let env = MockEnvironment::empty()
            .with_var("SITE_NAME", "Membership")
            .with_vars(&[("SITE_NAME", "CaG"), ("PORT", "8080")]);

        assert_eq!(env.get_var("SITE_NAME").as_deref(), Some("CaG"));
        assert_eq!(env.get_var("PORT").as_deref(), Some("8080"));
        assert_eq!(env.get_var("HOST"), None);
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let env = MockEnvironment::empty().with_vars(&[("PORT", "   "), ("HOST", " 127.0.0.1 ")]);

        assert_eq!(env.non_blank_var("PORT"), None);
        assert_eq!(env.non_blank_var("HOST").as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_system_environment_missing_var() {
        assert_eq!(SystemEnvironment.get_var("MEMBERSHIP_NON_EXISTENT_VAR_98765"), None);
    }
}
