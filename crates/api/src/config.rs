use std::time::Duration;

use ironquest_coach::gemini::{GeminiConfig, DEFAULT_API_BASE_URL, DEFAULT_MODEL};

use crate::auth::jwt::{JwtConfig, DEFAULT_ACCESS_EXPIRY_MINS};

/// Persona sent as the system instruction with every coach request.
pub const DEFAULT_COACH_SYSTEM_PROMPT: &str = "You are the System, a stern but fair \
    strength coach inside a training game. Answer questions about exercise form, \
    programming, recovery and nutrition. Keep replies short and direct, address the \
    user as a hunter, and tell them to see a professional for injuries or medical issues.";

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// SQLite connection URL (default: `sqlite://ironquest.db`).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Admin account to create at startup, if configured.
    pub admin: Option<AdminBootstrap>,
    /// Coach (LLM) settings.
    pub coach: CoachConfig,
}

/// Credentials for the startup admin account.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CoachConfig {
    pub gemini: GeminiConfig,
    pub system_prompt: String,
    /// Conversations untouched this long are dropped from memory.
    pub idle_timeout: Duration,
}

/// Default coach conversation idle timeout in minutes.
const DEFAULT_COACH_IDLE_MINS: u64 = 60;

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            system_prompt: DEFAULT_COACH_SYSTEM_PROMPT.to_string(),
            idle_timeout: Duration::from_secs(DEFAULT_COACH_IDLE_MINS * 60),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `DATABASE_URL`         | `sqlite://ironquest.db`    |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `ADMIN_USERNAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD` | unset (no bootstrap) |
    /// | `GEMINI_API_KEY`       | unset (coach disabled)     |
    /// | `COACH_MODEL`          | `gemini-2.5-flash`         |
    /// | `COACH_API_BASE_URL`   | Generative Language v1beta |
    /// | `COACH_TIMEOUT_SECS`   | `30`                       |
    /// | `COACH_SYSTEM_PROMPT`  | built-in persona           |
    /// | `COACH_IDLE_MINS`      | `60`                       |
    ///
    /// `JWT_SECRET` is required. `JWT_ACCESS_EXPIRY_MINS` defaults to `60`.
    ///
    /// # Panics
    ///
    /// Panics on unparseable numbers, a partial admin bootstrap, or a
    /// missing `JWT_SECRET`.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let database_url = env_or("DATABASE_URL", "sqlite://ironquest.db");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig {
            secret: non_empty_env("JWT_SECRET").expect("JWT_SECRET must be set and non-empty"),
            access_token_expiry_mins: env_or(
                "JWT_ACCESS_EXPIRY_MINS",
                &DEFAULT_ACCESS_EXPIRY_MINS.to_string(),
            )
            .parse()
            .expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"),
        };

        let admin = match (
            non_empty_env("ADMIN_USERNAME"),
            non_empty_env("ADMIN_EMAIL"),
            non_empty_env("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(AdminBootstrap {
                username,
                email,
                password,
            }),
            (None, None, None) => None,
            _ => panic!("ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together"),
        };

        let coach_timeout_secs: u64 = env_or("COACH_TIMEOUT_SECS", "30")
            .parse()
            .expect("COACH_TIMEOUT_SECS must be a valid u64");

        let coach_idle_mins: u64 = env_or("COACH_IDLE_MINS", &DEFAULT_COACH_IDLE_MINS.to_string())
            .parse()
            .expect("COACH_IDLE_MINS must be a valid u64");

        let coach = CoachConfig {
            gemini: GeminiConfig {
                api_key: non_empty_env("GEMINI_API_KEY"),
                model: env_or("COACH_MODEL", DEFAULT_MODEL),
                base_url: env_or("COACH_API_BASE_URL", DEFAULT_API_BASE_URL),
                timeout: Duration::from_secs(coach_timeout_secs),
            },
            system_prompt: non_empty_env("COACH_SYSTEM_PROMPT")
                .unwrap_or_else(|| DEFAULT_COACH_SYSTEM_PROMPT.to_string()),
            idle_timeout: Duration::from_secs(coach_idle_mins * 60),
        };

        Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            jwt,
            admin,
            coach,
        }
    }
}
