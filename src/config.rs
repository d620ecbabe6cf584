/*
 * Responsibility
 * - 環境変数の読み込み (DATABASE_URL, identity provider, CORS, timeouts)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - identity provider の issuer / JWKS URL を domain から導出する
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Identity provider settings (Auth0-style tenant).
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Bare host, e.g. `grammarhive.eu.auth0.com`.
    pub domain: String,
    pub audience: String,
    pub issuer: String,
    pub jwks_url: String,
    pub client_id: Option<String>,
    pub redirect_uri: Option<String>,
    pub leeway_seconds: u64,
    pub jwks_fetch_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub cors_allowed_origins: Vec<String>,

    pub auth: AuthSettings,
    pub http: HttpSettings,

    pub bootstrap_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. `from_env` is the
    /// production entry point; tests feed a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let database_url = required(&lookup, "DATABASE_URL")?;
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;
        if database_max_connections == 0 {
            return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS"));
        }

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let domain = normalize_domain(&required(&lookup, "AUTH_DOMAIN")?);
        if domain.is_empty() {
            return Err(ConfigError::Invalid("AUTH_DOMAIN"));
        }
        let audience = required(&lookup, "AUTH_AUDIENCE")?;

        let issuer = optional(&lookup, "AUTH_ISSUER").unwrap_or_else(|| format!("https://{domain}/"));
        let jwks_url = optional(&lookup, "AUTH_JWKS_URL")
            .unwrap_or_else(|| format!("https://{domain}/.well-known/jwks.json"));
        url::Url::parse(&jwks_url).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?;

        let auth = AuthSettings {
            domain,
            audience,
            issuer,
            jwks_url,
            client_id: optional(&lookup, "AUTH_CLIENT_ID"),
            redirect_uri: optional(&lookup, "AUTH_REDIRECT_URI"),
            leeway_seconds: parse_or(&lookup, "ACCESS_TOKEN_LEEWAY_SECONDS", 60)?,
            jwks_fetch_timeout: Duration::from_secs(parse_or(
                &lookup,
                "JWKS_FETCH_TIMEOUT_SECONDS",
                5,
            )?),
        };

        let http = HttpSettings {
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 30)?),
            body_limit_bytes: parse_or(&lookup, "REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?,
        };

        let bootstrap_timeout =
            Duration::from_secs(parse_or(&lookup, "BOOTSTRAP_TIMEOUT_SECONDS", 10)?);
        if bootstrap_timeout.is_zero() {
            return Err(ConfigError::Invalid("BOOTSTRAP_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            auth,
            http,
            bootstrap_timeout,
        })
    }
}

fn optional<F>(lookup: &F, key: &'static str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or(ConfigError::Missing(key))
}

// Unset falls back to the default; set-but-unparseable is an error rather than
// a silent default.
fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match optional(lookup, key) {
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn normalize_domain(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}
