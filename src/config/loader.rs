//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use crate::domain::errors::ChargebackError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix shared by every environment override
pub const ENV_PREFIX: &str = "CHARGEBACK";

/// Loads configuration, from a TOML file when one is given
///
/// This function:
/// 1. Reads the TOML file (or starts from defaults when `path` is `None`)
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides (CHARGEBACK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly named file does not exist or cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use chargeback_export::config::loader::load_config;
///
/// let config = load_config(Some("chargeback.toml")).expect("Failed to load config");
/// ```
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<ExporterConfig> {
    let mut config = match path {
        Some(path) => parse_file(path.as_ref())?,
        None => ExporterConfig::default(),
    };

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ChargebackError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn parse_file(path: &Path) -> Result<ExporterConfig> {
    if !path.exists() {
        return Err(ChargebackError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ChargebackError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    toml::from_str(&contents)
        .map_err(|e| ChargebackError::Configuration(format!("Failed to parse TOML: {}", e)))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ChargebackError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ChargebackError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}"))
        .ok()
        .filter(|v| !v.is_empty())
}

/// Applies environment variable overrides using the CHARGEBACK_* prefix
///
/// Variables follow the pattern CHARGEBACK_<SECTION>_<KEY>, for example
/// CHARGEBACK_OUTPUT_DIRECTORY. Unparseable numeric values are ignored.
fn apply_env_overrides(config: &mut ExporterConfig) {
    if let Some(val) = env_override("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Some(val) = env_override("OUTPUT", "DIRECTORY") {
        config.output.directory = val.into();
    }

    if let Some(val) = env_override("POSTGRESQL", "CONNECTION_STRING") {
        config.postgresql.connection_string = super::secret_string(val);
    }
    if let Some(val) = env_override("POSTGRESQL", "TABLE") {
        config.postgresql.table = val;
    }
    if let Some(val) = env_override("POSTGRESQL", "MAX_CONNECTIONS") {
        if let Ok(size) = val.parse() {
            config.postgresql.max_connections = size;
        }
    }
    if let Some(val) = env_override("POSTGRESQL", "CONNECTION_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.postgresql.connection_timeout_seconds = secs;
        }
    }
    if let Some(val) = env_override("POSTGRESQL", "STATEMENT_TIMEOUT_SECONDS") {
        if let Ok(secs) = val.parse() {
            config.postgresql.statement_timeout_seconds = secs;
        }
    }
    if let Some(val) = env_override("POSTGRESQL", "SSL_MODE") {
        config.postgresql.ssl_mode = val;
    }

    if let Some(val) = env_override("LOGGING", "LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
