use once_cell::sync::Lazy;

/// Process configuration read from the environment. A `.env` file in the
/// working directory is honoured when the binary loads it before first use.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Populate the store with the seed tutorials.
    pub seed: bool,
    /// Give created tutorials sequential ids instead of zero.
    pub sequential_ids: bool,
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            seed: true,
            sequential_ids: false,
            pretty: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_filter: lookup("TUTORIALS_LOG")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            seed: flag(lookup("TUTORIALS_SEED"), defaults.seed),
            sequential_ids: flag(lookup("TUTORIALS_SEQUENTIAL_IDS"), defaults.sequential_ids),
            pretty: flag(lookup("TUTORIALS_PRETTY"), defaults.pretty),
        }
    }
}

fn flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
