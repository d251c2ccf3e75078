use std::env;
use std::str::FromStr;

use crate::constants::DEFAULT_BCRYPT_COST;

/// Origins allowed by CORS when `ALLOWED_ORIGINS` is unset
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:3001,http://localhost:3002,\
http://127.0.0.1:3000,http://127.0.0.1:3001,http://127.0.0.1:3002,\
https://primergpt-app.netlify.app,https://primergpt-app.windsurf.build";

/// Which text generation backend answers `/api/generate` and the image endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Mock,
    Ollama,
    OpenAi,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(BackendKind::Mock),
            "ollama" => Ok(BackendKind::Ollama),
            "openai" => Ok(BackendKind::OpenAi),
            other => Err(format!("Unknown GENERATION_BACKEND: {}", other)),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub jwt_secret: String,
    pub users_path: String,
    pub static_dir: String,
    pub allowed_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    pub bcrypt_cost: u32,
    pub signup_resets_password: bool,
    pub generation_backend: BackendKind,
    pub ollama_url: String,
    pub ollama_model: String,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_api_key: Option<String>,
    pub mock_min_delay_ms: u64,
    pub mock_max_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| "Missing environment variable: JWT_SECRET")?;
        if jwt_secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }

        let server_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = parse_var("PORT", 3000)?;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let users_path = env::var("USERS_FILE").unwrap_or_else(|_| "./data/users.json".to_string());
        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "./public".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let rate_limit_requests = parse_var("RATE_LIMIT_REQUESTS", 100)?;
        let rate_limit_window_secs = parse_var("RATE_LIMIT_WINDOW_SECS", 900)?;

        let bcrypt_cost = parse_var("BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err("BCRYPT_COST must be between 4 and 31".to_string());
        }

        let signup_resets_password = parse_var("SIGNUP_RESETS_PASSWORD", true)?;

        let generation_backend: BackendKind = env::var("GENERATION_BACKEND")
            .unwrap_or_else(|_| "ollama".to_string())
            .parse()?;

        let ollama_url =
            env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string());
        let ollama_model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| "mistral".to_string());

        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());

        if generation_backend == BackendKind::OpenAi && openai_api_key.is_none() {
            return Err("OPENAI_API_KEY must be set when GENERATION_BACKEND=openai".to_string());
        }

        let mock_min_delay_ms = parse_var("MOCK_MIN_DELAY_MS", 500)?;
        let mock_max_delay_ms = parse_var("MOCK_MAX_DELAY_MS", 1500)?;
        if mock_min_delay_ms > mock_max_delay_ms {
            return Err("MOCK_MIN_DELAY_MS must not exceed MOCK_MAX_DELAY_MS".to_string());
        }

        Ok(Config {
            server_host,
            server_port,
            environment,
            jwt_secret,
            users_path,
            static_dir,
            allowed_origins,
            rate_limit_requests,
            rate_limit_window_secs,
            bcrypt_cost,
            signup_resets_password,
            generation_backend,
            ollama_url,
            ollama_model,
            openai_base_url,
            openai_model,
            openai_api_key,
            mock_min_delay_ms,
            mock_max_delay_ms,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Production mode enables secure cookies and hides error details
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| format!("Invalid {}", name)),
        Err(_) => Ok(default),
    }
}
