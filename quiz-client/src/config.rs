use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub timer_warnings: Vec<u32>,
    pub allow_timer_pause: bool,
    pub timer_auto_start: bool,
    pub submit_answers: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; missing keys fall back to `Config::default()`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            api_url: lookup("QUIZ_API_URL").unwrap_or(defaults.api_url),
            request_timeout: Duration::from_secs(parse_var(
                &lookup,
                "QUIZ_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout.as_secs(),
            )?),
            timer_warnings: parse_list(&lookup, "QUIZ_TIMER_WARNINGS", &defaults.timer_warnings)?,
            allow_timer_pause: parse_var(
                &lookup,
                "QUIZ_ALLOW_TIMER_PAUSE",
                defaults.allow_timer_pause,
            )?,
            timer_auto_start: parse_var(
                &lookup,
                "QUIZ_TIMER_AUTO_START",
                defaults.timer_auto_start,
            )?,
            submit_answers: parse_var(&lookup, "QUIZ_SUBMIT_ANSWERS", defaults.submit_answers)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000/api".to_string(),
            request_timeout: Duration::from_secs(10),
            timer_warnings: vec![60, 30, 10],
            allow_timer_pause: true,
            timer_auto_start: true,
            submit_answers: false,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn parse_list(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &[u32],
) -> Result<Vec<u32>, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(default.to_vec());
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse().map_err(|_| ConfigError::Invalid {
                name,
                value: value.clone(),
            })
        })
        .collect()
}
