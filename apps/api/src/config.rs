use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only numeric parse failures abort startup; a missing API key leaves the
/// completion-backed endpoints disabled.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub port: u16,
    pub rust_log: String,
    pub max_resume_chars: usize,
    pub max_job_description_chars: usize,
    pub analysis_concurrency: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            max_resume_chars: 12_000,
            max_job_description_chars: 4_000,
            analysis_concurrency: 4,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_model: optional_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: optional_env("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            max_resume_chars: parse_env("MAX_RESUME_CHARS", defaults.max_resume_chars)?,
            max_job_description_chars: parse_env(
                "MAX_JOB_DESCRIPTION_CHARS",
                defaults.max_job_description_chars,
            )?,
            analysis_concurrency: parse_env("ANALYSIS_CONCURRENCY", defaults.analysis_concurrency)?
                .max(1),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
        })
    }
}

/// Returns the variable's value, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.port, 8080);
        assert_eq!(config.analysis_concurrency, 4);
        assert_eq!(config.max_resume_chars, 12_000);
    }

    #[test]
    fn test_parse_env_falls_back_when_unset() {
        let value: usize = parse_env("SCREENER_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCREENER_TEST_BAD_PORT", "not-a-port");
        let result: Result<u16> = parse_env("SCREENER_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("SCREENER_TEST_BAD_PORT");
    }

    #[test]
    fn test_optional_env_treats_blank_as_missing() {
        std::env::set_var("SCREENER_TEST_BLANK_KEY", "   ");
        assert!(optional_env("SCREENER_TEST_BLANK_KEY").is_none());
        std::env::remove_var("SCREENER_TEST_BLANK_KEY");
    }
}
