use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub content_api: ContentApiConfig,
    pub site: SiteConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

/// Connection settings for the remote content API that owns categories,
/// posts and uploaded media.
#[derive(Debug, Clone)]
pub struct ContentApiConfig {
    /// Base URL including the `/api` prefix, without trailing slash
    pub base_url: String,
    /// Bearer token attached to every request, if configured
    pub token: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Public origin of the website, used for sitemap locations
    pub base_url: String,
    /// Rewrite backend-absolute media URLs into site-relative paths
    pub rewrite_media_urls: bool,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    /// Reads the process environment. `.env` is loaded once by `main` beforehand.
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            content_api: ContentApiConfig::from_env()?,
            site: SiteConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ContentApiConfig {
    const DEFAULT_BASE_URL: &'static str = "http://localhost:8080/api";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("CONTENT_API_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(format!(
                "CONTENT_API_URL must be an http(s) URL, got '{}'",
                base_url
            ));
        }

        let token = env::var("CONTENT_API_TOKEN").ok().filter(|s| !s.is_empty());

        let timeout_secs = env::var("CONTENT_API_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "CONTENT_API_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl SiteConfig {
    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:4200".to_string())
            .trim_end_matches('/')
            .to_string();

        let rewrite_media_urls = env::var("MEDIA_REWRITE")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| "MEDIA_REWRITE must be true or false".to_string())?;

        Ok(Self {
            base_url,
            rewrite_media_urls,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Atelier Admin Gateway".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Category management API for the site admin console".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
