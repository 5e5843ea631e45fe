use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub base_url: String,
    pub smtp_host: String,
    pub smtp_username: String,
    pub smtp_password: String,
    pub email_from: String,
    pub summarizer_url: String,
    pub summarizer_model: String,
    pub summarizer_key: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "1111"),
            database_url: try_load("DATABASE_URL", "postgres://localhost/wikimasters"),
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1/"),
            base_url: try_load("BASE_URL", "http://localhost:3000"),
            smtp_host: try_load("SMTP_HOST", "localhost"),
            smtp_username: try_load("SMTP_USERNAME", "wikimasters"),
            smtp_password: read_secret("SMTP_PASSWORD"),
            email_from: try_load("EMAIL_FROM", "Wikimasters <noreply@localhost>"),
            summarizer_url: try_load(
                "SUMMARIZER_URL",
                "https://api.openai.com/v1/chat/completions",
            ),
            summarizer_model: try_load("SUMMARIZER_MODEL", "gpt-5-nano"),
            summarizer_key: optional_var("SUMMARIZER_API_KEY", "article summarization"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

/// Keys with no default; absence turns the named feature off.
fn optional_var(key: &str, feature: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) => Some(value),
        Err(_) => {
            info!("{key} not set, {feature} disabled");
            None
        }
    }
}

fn read_secret(secret_name: &str) -> String {
    let path = format!("/run/secrets/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from file: {e}");
        })
        .expect("Secrets misconfigured!")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn absent_optional_var_disables_the_feature() {
        assert_eq!(
            optional_var("WIKIMASTERS_TEST_UNSET_KEY", "article summarization"),
            None
        );
    }
}
