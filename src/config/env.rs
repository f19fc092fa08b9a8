//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "CASEVIEW";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Config file from CASEVIEW_CONFIG
    pub config_file: Option<String>,
    /// Redraw interval from CASEVIEW_TICK_MS
    pub tick_ms: Option<u64>,
    /// Concurrency cap from CASEVIEW_MAX_CONCURRENT
    pub max_concurrent: Option<usize>,
    /// Start view from CASEVIEW_VIEW
    pub view: Option<String>,
    /// Log level from CASEVIEW_LOG
    pub log_level: Option<String>,
    /// Log file from CASEVIEW_LOG_FILE
    pub log_file: Option<String>,
    /// Output format from CASEVIEW_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            config_file: get_env("CONFIG"),
            tick_ms: get_env_parse("TICK_MS"),
            max_concurrent: get_env_parse("MAX_CONCURRENT"),
            view: get_env("VIEW"),
            log_level: get_env("LOG"),
            log_file: get_env("LOG_FILE"),
            format: get_env("FORMAT"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.config_file.is_some()
            || self.tick_ms.is_some()
            || self.max_concurrent.is_some()
            || self.view.is_some()
            || self.log_level.is_some()
            || self.log_file.is_some()
            || self.format.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_CONFIG:          {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_TICK_MS:         {:?}", ENV_PREFIX, self.tick_ms);
        println!("  {}_MAX_CONCURRENT:  {:?}", ENV_PREFIX, self.max_concurrent);
        println!("  {}_VIEW:            {:?}", ENV_PREFIX, self.view);
        println!("  {}_LOG:             {:?}", ENV_PREFIX, self.log_level);
        println!("  {}_LOG_FILE:        {:?}", ENV_PREFIX, self.log_file);
        println!("  {}_FORMAT:          {:?}", ENV_PREFIX, self.format);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Print all CASEVIEW environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_CONFIG          Path to configuration file");
    println!("  {ENV_PREFIX}_TICK_MS         Explorer redraw interval in milliseconds");
    println!("  {ENV_PREFIX}_MAX_CONCURRENT  Maximum cases running at once");
    println!("  {ENV_PREFIX}_VIEW            Start view (code, category)");
    println!("  {ENV_PREFIX}_LOG             Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_LOG_FILE        Log file of the interactive explorer");
    println!("  {ENV_PREFIX}_FORMAT          Report format (table, json, json-pretty, csv, summary)");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_VIEW=category");
    println!("  export {ENV_PREFIX}_MAX_CONCURRENT=4");
    println!("  caseview explore");
}
