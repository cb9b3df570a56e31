use std::path::PathBuf;

/// Spreadsheet read at startup when nothing else is configured.
pub const DEFAULT_DATA_PATH: &str = "data/combined_position_4cond.xlsx";

/// Environment variable overriding [`DEFAULT_DATA_PATH`].
pub const DATA_PATH_ENV: &str = "POSITION_DASHBOARD_DATA";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
}

impl Config {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Self {
        Self::resolve(std::env::args().skip(1), std::env::var(DATA_PATH_ENV).ok())
    }

    /// First positional argument wins, then the environment value, then the
    /// built-in default. Blank values are ignored.
    pub fn resolve<I>(args: I, env_value: Option<String>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let data_path = args
            .into_iter()
            .find(|a| !a.trim().is_empty() && !a.starts_with('-'))
            .or(env_value.filter(|v| !v.trim().is_empty()))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        Config { data_path }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(std::iter::empty(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_path() {
        assert_eq!(Config::default().data_path, PathBuf::from(DEFAULT_DATA_PATH));
        assert_eq!(
            Config::resolve(Vec::new(), Some("  ".into())).data_path,
            PathBuf::from(DEFAULT_DATA_PATH)
        );
    }

    #[test]
    fn environment_overrides_default() {
        let cfg = Config::resolve(Vec::new(), Some("/tmp/metrics.csv".into()));
        assert_eq!(cfg.data_path, PathBuf::from("/tmp/metrics.csv"));
    }

    #[test]
    fn argument_overrides_environment() {
        let cfg = Config::resolve(
            vec!["--verbose".to_string(), "sheet.xlsx".to_string()],
            Some("/tmp/metrics.csv".into()),
        );
        assert_eq!(cfg.data_path, PathBuf::from("sheet.xlsx"));
    }
}
