use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    /// Divisor for the daily rate used by no-pay leave deductions
    pub working_days_per_month: u32,
    pub seed_demo: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let profile = env::var("PROFILE").unwrap_or_else(|_| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| default_database_url(&profile));

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            working_days_per_month: env::var("WORKING_DAYS_PER_MONTH")
                .ok()
                .and_then(|d| d.parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(30),
            seed_demo: env::var("SEED_DEMO").is_ok(),
            profile,
        }
    }

    /// Switch to another profile. The database follows the profile unless
    /// `DATABASE_URL` was set explicitly.
    pub fn with_profile(mut self, profile: String) -> Self {
        if env::var("DATABASE_URL").is_err() {
            self.database_url = default_database_url(&profile);
        }
        self.profile = profile;
        self
    }
}

fn default_database_url(profile: &str) -> String {
    if profile == "default" {
        "sqlite://medidesk.db?mode=rwc".to_string()
    } else {
        format!("sqlite://medidesk_{}.db?mode=rwc", profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear() {
        for key in [
            "PROFILE",
            "DATABASE_URL",
            "PORT",
            "CORS_ALLOWED_ORIGINS",
            "WORKING_DAYS_PER_MONTH",
            "SEED_DEMO",
        ] {
            unsafe { env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn defaults() {
        clear();
        let config = Config::from_env();
        assert_eq!(config.profile, "default");
        assert_eq!(config.database_url, "sqlite://medidesk.db?mode=rwc");
        assert_eq!(config.port, 8000);
        assert_eq!(config.working_days_per_month, 30);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(!config.seed_demo);
    }

    #[test]
    #[serial]
    fn reads_environment() {
        clear();
        unsafe {
            env::set_var("PROFILE", "clinic2");
            env::set_var("PORT", "9100");
            env::set_var("WORKING_DAYS_PER_MONTH", "26");
            env::set_var("CORS_ALLOWED_ORIGINS", "http://a.test, http://b.test,");
        }
        let config = Config::from_env();
        assert_eq!(config.database_url, "sqlite://medidesk_clinic2.db?mode=rwc");
        assert_eq!(config.port, 9100);
        assert_eq!(config.working_days_per_month, 26);
        assert_eq!(config.cors_allowed_origins, vec!["http://a.test", "http://b.test"]);
        clear();
    }

    #[test]
    #[serial]
    fn profile_override_moves_the_database() {
        clear();
        let config = Config::from_env().with_profile("demo".into());
        assert_eq!(config.database_url, "sqlite://medidesk_demo.db?mode=rwc");
    }
}
