use std::env;

/// Deployment environment. Controls the cookie `secure` flag and the
/// fallback CORS origins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Credentials and endpoints of the external media host.
#[derive(Debug, Clone)]
pub struct MediaHostConfig {
    pub public_key: String,
    pub private_key: String,
    pub upload_url: String,
    pub api_url: String,
}

impl Default for MediaHostConfig {
    fn default() -> Self {
        Self {
            public_key: String::new(),
            private_key: String::new(),
            upload_url: "https://upload.imagekit.io/api/v1/files/upload".to_string(),
            api_url: "https://api.imagekit.io/v1".to_string(),
        }
    }
}

impl MediaHostConfig {
    fn from_env(default: Self) -> Self {
        Self {
            public_key: env::var("MEDIA_HOST_PUBLIC_KEY").unwrap_or(default.public_key),
            private_key: env::var("MEDIA_HOST_PRIVATE_KEY").unwrap_or(default.private_key),
            upload_url: env::var("MEDIA_HOST_UPLOAD_URL").unwrap_or(default.upload_url),
            api_url: env::var("MEDIA_HOST_API_URL").unwrap_or(default.api_url),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.public_key.is_empty() && !self.private_key.is_empty()
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,

    /// JWT signing secret (required in production)
    pub jwt_secret: String,

    /// Allowed CORS origins (comma separated in `ALLOWED_ORIGINS`)
    pub allowed_origins: Vec<String>,

    /// Request body limit in bytes (default: 50 MB, sized for base64 media)
    pub max_body_size: usize,

    pub media: MediaHostConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            jwt_secret: "secret".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:3000".to_string(),
            ],
            max_body_size: 50 * 1024 * 1024,
            media: MediaHostConfig::default(),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            environment: env::var("APP_ENV")
                .map(|v| Environment::parse(&v))
                .unwrap_or(default.environment),

            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| split_list(&v))
                .unwrap_or(default.allowed_origins),

            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_body_size),

            media: MediaHostConfig::from_env(default.media),
        }
    }

    /// Config for local development and tests
    pub fn development() -> Self {
        Self::default()
    }

    /// Config for production. `JWT_SECRET` must be set.
    pub fn production() -> anyhow::Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("CRITICAL: JWT_SECRET must be set"))?;

        Ok(Self {
            environment: Environment::Production,
            jwt_secret,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| split_list(&v))
                .unwrap_or_else(|| vec!["https://snaploop.app".to_string()]),
            ..Self::from_env()
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.max_body_size, 50 * 1024 * 1024);
        assert_eq!(config.environment, Environment::Development);
        assert!(!config.is_production());
        assert!(!config.media.is_configured());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse("production"), Environment::Production);
        assert_eq!(Environment::parse(" PROD "), Environment::Production);
        assert_eq!(Environment::parse("staging"), Environment::Development);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_lists() {
        unsafe {
            env::set_var("ALLOWED_ORIGINS", "https://a.test, https://b.test,");
            env::set_var("APP_ENV", "production");
        }
        let config = AppConfig::from_env();
        unsafe {
            env::remove_var("ALLOWED_ORIGINS");
            env::remove_var("APP_ENV");
        }
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.test".to_string(), "https://b.test".to_string()]
        );
        assert!(config.is_production());
    }

    #[test]
    #[serial]
    fn test_production_requires_jwt_secret() {
        unsafe { env::remove_var("JWT_SECRET") };
        assert!(AppConfig::production().is_err());

        unsafe { env::set_var("JWT_SECRET", "test_secret") };
        let config = AppConfig::production().unwrap();
        unsafe { env::remove_var("JWT_SECRET") };
        assert_eq!(config.jwt_secret, "test_secret");
        assert!(config.is_production());
    }
}
