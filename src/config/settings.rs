use std::fmt;
use std::sync::Arc;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::EnvironmentProvider;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://membership.db?mode=rwc";
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Settings read once at startup from the environment
#[derive(Clone)]
pub struct Settings {
    database_url: String,
    server_host: String,
    server_port: u16,
    jwt_secret: String,
    site_name: String,
    pagination_size: u64,
    recompute_on_membership_change: bool,
}

impl Settings {
    pub fn from_env_provider(env_provider: Arc<dyn EnvironmentProvider>) -> Result<Self, ApplicationError> {
        let spec = |name: &str| ConfigSpec::new(env_provider.clone(), name);

        Ok(Self {
            database_url: spec("DATABASE_URL").default_value(DEFAULT_DATABASE_URL).string()?,
            server_host: spec("HOST")
                .default_value("0.0.0.0")
                .validator(ConfigSpec::validate_host_address)
                .string()?,
            server_port: spec("PORT").default_value("3000").port()?,
            jwt_secret: spec("JWT_SECRET").required().min_length(32).string()?,
            site_name: spec("SITE_NAME").default_value("Membership").max_length(100).string()?,
            pagination_size: spec("PAGINATION_SIZE").default_value("20").integer_in(1, MAX_PAGE_SIZE)?,
            recompute_on_membership_change: spec("RECOMPUTE_ON_MEMBERSHIP_CHANGE")
                .default_value("false")
                .boolean()?,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        use crate::config::SystemEnvironment;
        Self::from_env_provider(Arc::new(SystemEnvironment))
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn pagination_size(&self) -> u64 {
        self.pagination_size
    }

    /// Whether adding or removing a member recomputes that member's access flags
    pub fn recompute_on_membership_change(&self) -> bool {
        self.recompute_on_membership_change
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("jwt_secret", &"<redacted>")
            .field("site_name", &self.site_name)
            .field("pagination_size", &self.pagination_size)
            .field("recompute_on_membership_change", &self.recompute_on_membership_change)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockEnvironment;

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ApplicationError> {
        let env = MockEnvironment::empty().with_var("JWT_SECRET", SECRET).with_vars(vars);
        Settings::from_env_provider(Arc::new(env))
    }

    #[test]
    fn test_settings_with_defaults() {
        let settings = settings(&[]).unwrap();

        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(settings.server_address(), "0.0.0.0:3000");
        assert_eq!(settings.site_name(), "Membership");
        assert_eq!(settings.pagination_size(), 20);
        assert!(!settings.recompute_on_membership_change());
    }

    #[test]
    fn test_settings_with_overrides() {
        let settings = settings(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SITE_NAME", "CaG Events"),
            ("PAGINATION_SIZE", "50"),
            ("RECOMPUTE_ON_MEMBERSHIP_CHANGE", "true"),
        ])
        .unwrap();

        assert_eq!(settings.database_url(), "sqlite::memory:");
        assert_eq!(settings.server_address(), "127.0.0.1:8080");
        assert_eq!(settings.site_name(), "CaG Events");
        assert_eq!(settings.pagination_size(), 50);
        assert!(settings.recompute_on_membership_change());
    }

    #[test]
    fn test_missing_jwt_secret_fails() {
        let result = Settings::from_env_provider(Arc::new(MockEnvironment::empty()));
        assert_eq!(
            result.unwrap_err(),
            ApplicationError::MissingRequiredSetting { setting_name: "JWT_SECRET".to_string() }
        );
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(settings(&[("PORT", "0")]).is_err());
        assert!(settings(&[("PORT", "not_a_number")]).is_err());
        assert!(settings(&[("HOST", "local host")]).is_err());
        assert!(settings(&[("JWT_SECRET", "too-short")]).is_err());
        assert!(settings(&[("PAGINATION_SIZE", "5000")]).is_err());
        assert!(settings(&[("RECOMPUTE_ON_MEMBERSHIP_CHANGE", "sometimes")]).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let settings = settings(&[("PORT", ""), ("DATABASE_URL", " ")]).unwrap();

        assert_eq!(settings.server_port(), 3000);
        assert_eq!(settings.database_url(), DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let settings = settings(&[]).unwrap();
        let debug = format!("{:?}", settings);
        assert!(!debug.contains(SECRET));
        assert!(debug.contains("<redacted>"));
    }
}
