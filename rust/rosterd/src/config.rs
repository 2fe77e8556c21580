use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "ROSTERD_LOG";
pub const WORKSPACE_ENV: &str = "ROSTERD_WORKSPACE";
pub const DEFAULT_LOG_FILTER: &str = "rosterd=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_filter: String,
    /// Workspace opened before the first request, as if by `workspace.select`.
    pub workspace: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |k: &str| get(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            log_filter: non_empty(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            workspace: non_empty(WORKSPACE_ENV).map(PathBuf::from),
        }
    }
}

/// Logs go to stderr; stdout carries the protocol.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset_or_blank() {
        let env = HashMap::from([(WORKSPACE_ENV, "  ")]);
        let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.log_filter, DEFAULT_LOG_FILTER);
        assert!(cfg.workspace.is_none());
    }

    #[test]
    fn reads_overrides() {
        let env = HashMap::from([(LOG_ENV, "rosterd=debug"), (WORKSPACE_ENV, "/tmp/roster")]);
        let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.log_filter, "rosterd=debug");
        assert_eq!(cfg.workspace, Some(PathBuf::from("/tmp/roster")));
    }
}
