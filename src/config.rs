//! Runtime configuration for the polling binary.
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file. Variables already present in the environment take precedence
//! over the file.

use crate::api::DEFAULT_BASE_URL;
use crate::session::Credentials;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CLIENT_ID: &str = "hive-client";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Fallback for `HIVE_PASSWORD`, read from the working directory.
pub const PASSWORD_FILE: &str = "password.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    /// Base URL of the Omnia API, with trailing slash.
    pub api_base: String,
    /// Sent as `X-Omnia-Client` and as the login `caller`.
    pub client_id: String,
    pub poll_interval: Duration,
    /// Whole-request timeout applied by the HTTP transport.
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Config::from_lookup(|key| std::env::var(key).ok(), Path::new(PASSWORD_FILE))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>, password_file: &Path) -> Result<Self, String> {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let username = non_empty("HIVE_USERNAME").ok_or_else(|| "Missing username: set HIVE_USERNAME".to_string())?;

        // Prefer env var; fallback to password.txt
        let password = match non_empty("HIVE_PASSWORD") {
            Some(v) => v,
            None => match fs::read_to_string(password_file) {
                Ok(s) if !s.trim().is_empty() => s.trim().to_string(),
                _ => {
                    return Err(format!(
                        "Missing password: set HIVE_PASSWORD or provide {} in working directory",
                        password_file.display()
                    ));
                }
            },
        };

        let seconds = |key: &str, default: u64| -> Result<Duration, String> {
            match non_empty(key) {
                None => Ok(Duration::from_secs(default)),
                Some(raw) => match raw.parse::<u64>() {
                    Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
                    _ => Err(format!("{key} must be a positive number of seconds, got {raw:?}")),
                },
            }
        };

        Ok(Config {
            credentials: Credentials::new(username, password),
            api_base: non_empty("HIVE_API_BASE").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client_id: non_empty("HIVE_CLIENT_ID").unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
            poll_interval: seconds("HIVE_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?,
            http_timeout: seconds("HIVE_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?,
        })
    }
}

// =====================
// .env files
// =====================

/// Reads `KEY=value` lines from `path` into the process environment,
/// skipping keys that are already set.
pub fn load_env_file(path: &Path) -> Result<(), String> {
    let contents = fs::read_to_string(path).map_err(|e| format!("failed to read {}: {}", path.display(), e))?;

    for (index, line) in contents.lines().enumerate() {
        let Some((key, value)) = parse_env_line(line).map_err(|e| format!("{}:{}: {}", path.display(), index + 1, e))?
        else {
            continue;
        };
        if std::env::var_os(&key).is_none() {
            // Updating process-level environment variables is unsafe on some targets.
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }

    Ok(())
}

/// Parses one `.env` line. Blank lines and `#` comments yield `None`.
///
/// Supports an optional `export ` prefix, single quotes (literal) and double
/// quotes (with `\n`, `\t`, `\\` and `\"` escapes). Unquoted values end at `#`.
fn parse_env_line(line: &str) -> Result<Option<(String, String)>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);

    let (key, raw) = line.split_once('=').ok_or_else(|| "missing '=' in assignment".to_string())?;
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return Err(format!("invalid variable name {key:?}"));
    }

    let raw = raw.trim();
    let value = if let Some(rest) = raw.strip_prefix('"') {
        unquote(rest, '"', true)?
    } else if let Some(rest) = raw.strip_prefix('\'') {
        unquote(rest, '\'', false)?
    } else {
        raw.split('#').next().unwrap_or_default().trim_end().to_string()
    };

    Ok(Some((key.to_string(), value)))
}

fn unquote(input: &str, quote: char, escapes: bool) -> Result<String, String> {
    let mut value = String::new();
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if escapes => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some(other) => value.push(other),
                None => return Err("unterminated escape sequence".to_string()),
            },
            c if c == quote => {
                let rest = chars.as_str().trim();
                return if rest.is_empty() || rest.starts_with('#') {
                    Ok(value)
                } else {
                    Err(format!("unexpected characters after closing {quote}"))
                };
            }
            c => value.push(c),
        }
    }

    Err(format!("unterminated {quote}-quoted value"))
}
