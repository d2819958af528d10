//! Typed environment variables
//!
//! Every variable is a unit struct implementing [`EnvVar`], carrying its name,
//! default and description. Command-line flags take precedence; these only
//! fill in what was not given on the command line.

use std::env;
use std::fmt;

/// A variable holding a value that cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    /// Parsed value, `Ok(None)` when the variable is unset and has no default
    fn get() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(Self::DEFAULT),
        }
    }
}

pub struct LogLevel;
impl EnvVar<&'static str> for LogLevel {
    const NAME: &'static str = "MHTML_TO_HTML_LOG_LEVEL";
    const DEFAULT: Option<&'static str> = Some("warn");
    const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

    fn parse(value: &str) -> EnvResult<&'static str> {
        match value.trim().to_lowercase().as_str() {
            "trace" => Ok("trace"),
            "debug" => Ok("debug"),
            "info" => Ok("info"),
            "warn" => Ok("warn"),
            "error" => Ok("error"),
            _ => Err(EnvError {
                variable: Self::NAME.to_string(),
                message: format!(
                    "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                    value
                ),
            }),
        }
    }
}

pub struct EnableScripts;
impl EnvVar<bool> for EnableScripts {
    const NAME: &'static str = "MHTML_TO_HTML_ENABLE_SCRIPTS";
    const DEFAULT: Option<bool> = Some(false);
    const DESCRIPTION: &'static str = "Keep scripts and event handlers in the output";

    fn parse(value: &str) -> EnvResult<bool> {
        parse_bool(value, Self::NAME)
    }
}

pub struct FetchMissing;
impl EnvVar<bool> for FetchMissing {
    const NAME: &'static str = "MHTML_TO_HTML_FETCH_MISSING";
    const DEFAULT: Option<bool> = Some(false);
    const DESCRIPTION: &'static str = "Download resources the archive references but lacks";

    fn parse(value: &str) -> EnvResult<bool> {
        parse_bool(value, Self::NAME)
    }
}

pub struct Timeout;
impl EnvVar<u64> for Timeout {
    const NAME: &'static str = "MHTML_TO_HTML_TIMEOUT";
    const DEFAULT: Option<u64> = Some(crate::core::DEFAULT_TIMEOUT);
    const DESCRIPTION: &'static str = "Network timeout in seconds, 0 disables it";

    fn parse(value: &str) -> EnvResult<u64> {
        value.trim().parse().map_err(|_| EnvError {
            variable: Self::NAME.to_string(),
            message: format!("Invalid timeout '{}'. Must be a number of seconds", value),
        })
    }
}

/// Unset means the crate's own name and version
pub struct UserAgent;
impl EnvVar<String> for UserAgent {
    const NAME: &'static str = "MHTML_TO_HTML_USER_AGENT";
    const DEFAULT: Option<String> = None;
    const DESCRIPTION: &'static str = "User-Agent header sent when fetching";

    fn parse(value: &str) -> EnvResult<String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(EnvError {
                variable: Self::NAME.to_string(),
                message: "User agent cannot be empty".to_string(),
            });
        }
        Ok(value.to_string())
    }
}

pub struct NoColor;
impl EnvVar<bool> for NoColor {
    const NAME: &'static str = "NO_COLOR";
    const DEFAULT: Option<bool> = Some(false);
    const DESCRIPTION: &'static str = "Disable colored output when set to any value";

    fn parse(value: &str) -> EnvResult<bool> {
        // https://no-color.org: any non-empty value
        Ok(!value.is_empty())
    }
}

fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off",
                value
            ),
        }),
    }
}

/// Settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub log_level: &'static str,
    pub enable_scripts: bool,
    pub fetch_missing: bool,
    pub timeout: u64,
    pub user_agent: Option<String>,
    pub no_color: bool,
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            log_level: "warn",
            enable_scripts: false,
            fetch_missing: false,
            timeout: crate::core::DEFAULT_TIMEOUT,
            user_agent: None,
            no_color: false,
        }
    }
}

impl EnvConfig {
    /// Loads every variable; invalid values are returned alongside and replaced by defaults
    pub fn from_env() -> (Self, Vec<EnvError>) {
        let mut errors = Vec::new();
        let defaults = EnvConfig::default();

        let config = EnvConfig {
            log_level: read::<LogLevel, _>(&mut errors).unwrap_or(defaults.log_level),
            enable_scripts: read::<EnableScripts, _>(&mut errors)
                .unwrap_or(defaults.enable_scripts),
            fetch_missing: read::<FetchMissing, _>(&mut errors).unwrap_or(defaults.fetch_missing),
            timeout: read::<Timeout, _>(&mut errors).unwrap_or(defaults.timeout),
            user_agent: read::<UserAgent, _>(&mut errors),
            no_color: read::<NoColor, _>(&mut errors).unwrap_or(defaults.no_color),
        };

        (config, errors)
    }
}

fn read<V: EnvVar<T>, T>(errors: &mut Vec<EnvError>) -> Option<T> {
    V::get().unwrap_or_else(|err| {
        errors.push(err);
        None
    })
}

/// Markdown listing of the supported variables
pub fn generate_env_docs() -> String {
    let entries = [
        (LogLevel::NAME, LogLevel::DESCRIPTION, "warn".to_string()),
        (
            EnableScripts::NAME,
            EnableScripts::DESCRIPTION,
            "false".to_string(),
        ),
        (FetchMissing::NAME, FetchMissing::DESCRIPTION, "false".to_string()),
        (
            Timeout::NAME,
            Timeout::DESCRIPTION,
            crate::core::DEFAULT_TIMEOUT.to_string(),
        ),
        (UserAgent::NAME, UserAgent::DESCRIPTION, "<name>/<version>".to_string()),
        (NoColor::NAME, NoColor::DESCRIPTION, "unset".to_string()),
    ];

    let mut docs = String::from("# Environment Variables\n\n");
    for (name, description, default) in entries {
        docs.push_str(&format!("- `{}`: {} (default: {})\n", name, description, default));
    }
    docs
}
