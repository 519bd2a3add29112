//! Runtime settings, read from the environment (and `.env` via dotenv).
//!
//! | variable                              | default          |
//! |---------------------------------------|------------------|
//! | `ASN_SUMMARY_ISPS`                    | `alibaba,oracle,it7` |
//! | `ASN_SUMMARY_CACHE_DIR`               | `cache`          |
//! | `ASN_SUMMARY_OUTPUT_IPV4`             | `VPS_CIDR_4.txt` |
//! | `ASN_SUMMARY_OUTPUT_IPV6`             | `VPS_CIDR_6.txt` |
//! | `ASN_SUMMARY_OUTPUT_JSON`             | unset            |
//! | `ASN_SUMMARY_CACHE_MAX_AGE_HOURS`     | `24`             |
//! | `ASN_SUMMARY_MAX_CONCURRENT_FETCHES`  | `4`              |
//! | `ASN_SUMMARY_FETCH_RETRIES`           | `3`              |
//! | `ASN_SUMMARY_CLEAR_CACHE`             | `true`           |

use std::error::Error;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Base delay between remote requests, in milliseconds.
pub const SLEEP_MSEC: u64 = 200;

/// Organisations searched when nothing else is configured.
pub const DEFAULT_ISPS: [&str; 3] = ["alibaba", "oracle", "it7"];

const ENV_PREFIX: &str = "ASN_SUMMARY_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub isps: Vec<String>,
    pub cache_dir: PathBuf,
    pub output_ipv4: PathBuf,
    pub output_ipv6: PathBuf,
    pub output_json: Option<PathBuf>,
    pub cache_max_age: Duration,
    pub max_concurrent_fetches: usize,
    pub fetch_retries: u32,
    pub clear_cache_on_exit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            isps: DEFAULT_ISPS.iter().map(|s| s.to_string()).collect(),
            cache_dir: PathBuf::from("cache"),
            output_ipv4: PathBuf::from("VPS_CIDR_4.txt"),
            output_ipv6: PathBuf::from("VPS_CIDR_6.txt"),
            output_json: None,
            cache_max_age: Duration::from_secs(24 * 60 * 60),
            max_concurrent_fetches: 4,
            fetch_retries: 3,
            clear_cache_on_exit: true,
        }
    }
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Settings, Box<dyn Error>> {
        Settings::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any `name -> value` lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Settings, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut settings = Settings::default();

        if let Some(isps) = var("ISPS") {
            settings.isps = split_list(&isps);
        }
        if let Some(dir) = var("CACHE_DIR") {
            settings.cache_dir = PathBuf::from(dir);
        }
        if let Some(path) = var("OUTPUT_IPV4") {
            settings.output_ipv4 = PathBuf::from(path);
        }
        if let Some(path) = var("OUTPUT_IPV6") {
            settings.output_ipv6 = PathBuf::from(path);
        }
        settings.output_json = var("OUTPUT_JSON")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        if let Some(hours) = parse_var::<u64>(&var, "CACHE_MAX_AGE_HOURS")? {
            settings.cache_max_age = Duration::from_secs(hours * 60 * 60);
        }
        if let Some(n) = parse_var::<usize>(&var, "MAX_CONCURRENT_FETCHES")? {
            settings.max_concurrent_fetches = n.max(1);
        }
        if let Some(n) = parse_var(&var, "FETCH_RETRIES")? {
            settings.fetch_retries = n;
        }
        if let Some(clear) = parse_var(&var, "CLEAR_CACHE")? {
            settings.clear_cache_on_exit = clear;
        }

        if settings.isps.is_empty() {
            return Err(format!("{ENV_PREFIX}ISPS must name at least one organisation").into());
        }
        Ok(settings)
    }

    /// Replace the organisation list with command line arguments, if any.
    pub fn with_isps<I: IntoIterator<Item = String>>(mut self, args: I) -> Settings {
        let isps: Vec<String> = args
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if !isps.is_empty() {
            self.isps = isps;
        }
        self
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<T>(
    var: &dyn Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, Box<dyn Error>>
where
    T: FromStr,
    T::Err: Display,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("Invalid {ENV_PREFIX}{name}='{value}': {e}").into()),
        None => Ok(None),
    }
}
