use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub amap: AmapConfig,
    pub llm: LlmConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Directory served as the static page (index.html, scripts, styles),
    /// provided by the deployment
    pub static_dir: String,
}

/// AMap (Gaode) web service credentials. The key never leaves the server.
#[derive(Debug, Clone)]
pub struct AmapConfig {
    pub key: String,
    pub base_url: String,
}

/// Chat/image provider (DeepSeek-compatible API)
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Where the interaction controllers send geocode/district/chat requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoSource {
    /// Through the same-origin backend proxy
    Proxy,
    /// Straight to the providers, using server-held credentials
    Direct,
}

impl FromStr for GeoSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "proxy" => Ok(GeoSource::Proxy),
            "direct" => Ok(GeoSource::Direct),
            other => Err(format!(
                "GEO_SOURCE must be 'proxy' or 'direct', got '{}'",
                other
            )),
        }
    }
}

/// Settings for the map/info-panel controllers.
///
/// Not part of [`Config`]: the proxy server has no use for them, so only code
/// that builds an `Explorer` loads them.
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub geo_source: GeoSource,
    /// Base URL of the backend proxy, used when `geo_source` is `Proxy`
    pub proxy_base_url: String,
    pub polygon_stroke_color: String,
    pub polygon_fill_color: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            amap: AmapConfig::from_env()?,
            llm: LlmConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string());

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            static_dir,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AmapConfig {
    const DEFAULT_BASE_URL: &'static str = "https://restapi.amap.com";

    pub fn from_env() -> Result<Self, String> {
        let key = env::var("AMAP_KEY")
            .map_err(|_| "AMAP_KEY environment variable is required".to_string())?;

        let base_url = env::var("AMAP_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self { key, base_url })
    }
}

impl LlmConfig {
    const DEFAULT_ENDPOINT: &'static str = "https://api.deepseek.com/v1";
    const DEFAULT_MODEL: &'static str = "deepseek-chat";

    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("DEEPSEEK_API_KEY")
            .map_err(|_| "DEEPSEEK_API_KEY environment variable is required".to_string())?;

        let endpoint = env::var("DEEPSEEK_API_ENDPOINT")
            .unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();

        let model = env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            endpoint,
            model,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "District Explorer API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION").unwrap_or_else(|_| {
            "Geocoding, district boundary and geography tutor proxy".to_string()
        });

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

impl ExplorerConfig {
    const DEFAULT_POLYGON_COLOR: &'static str = "#09c8eaea";

    pub fn from_env(app: &AppConfig) -> Result<Self, String> {
        let geo_source = env::var("GEO_SOURCE")
            .unwrap_or_else(|_| "proxy".to_string())
            .parse::<GeoSource>()?;

        // Defaults to this very server
        let proxy_base_url = env::var("PROXY_BASE_URL")
            .unwrap_or_else(|_| format!("http://{}", app.server_address()))
            .trim_end_matches('/')
            .to_string();

        let polygon_stroke_color = env::var("POLYGON_STROKE_COLOR")
            .unwrap_or_else(|_| Self::DEFAULT_POLYGON_COLOR.to_string());
        let polygon_fill_color = env::var("POLYGON_FILL_COLOR")
            .unwrap_or_else(|_| Self::DEFAULT_POLYGON_COLOR.to_string());

        Ok(Self {
            geo_source,
            proxy_base_url,
            polygon_stroke_color,
            polygon_fill_color,
        })
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            geo_source: GeoSource::Proxy,
            proxy_base_url: "http://127.0.0.1:5000".to_string(),
            polygon_stroke_color: Self::DEFAULT_POLYGON_COLOR.to_string(),
            polygon_fill_color: Self::DEFAULT_POLYGON_COLOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_source_parse() {
        assert_eq!("proxy".parse::<GeoSource>(), Ok(GeoSource::Proxy));
        assert_eq!(" Direct ".parse::<GeoSource>(), Ok(GeoSource::Direct));
        assert!("sdk".parse::<GeoSource>().is_err());
    }

    #[test]
    fn test_server_config_ignores_explorer_settings() {
        std::env::set_var("AMAP_KEY", "amap-key");
        std::env::set_var("DEEPSEEK_API_KEY", "sk-test");
        std::env::set_var("GEO_SOURCE", "sdk");

        let config = Config::from_env();

        assert!(config.is_ok(), "{:?}", config.err());
        let app = config.unwrap().app;
        assert!(ExplorerConfig::from_env(&app).is_err());

        std::env::remove_var("GEO_SOURCE");
    }

    #[test]
    fn test_swagger_credentials() {
        let mut swagger = SwaggerConfig {
            username: Some("admin".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("secret".to_string());
        assert_eq!(swagger.credentials().as_deref(), Some("admin:secret"));
    }

    #[test]
    fn test_server_address() {
        let app = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_allowed_origins: vec!["*".to_string()],
            static_dir: "static".to_string(),
        };
        assert_eq!(app.server_address(), "0.0.0.0:5000");
    }
}
