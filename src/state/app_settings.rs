use copa_bracket::LayoutParams;
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SNAPSHOT_PATH: &str = "bracket.json";
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub snapshot_path: PathBuf,
    pub refresh_interval: Duration,
    pub export_dir: PathBuf,
    pub layout: LayoutParams,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            refresh_interval: DEFAULT_REFRESH,
            export_dir: PathBuf::from("."),
            // The terminal canvas is scaled to fit, so keep it tight.
            layout: LayoutParams { canvas_width: None, ..LayoutParams::default() },
        }
    }
}

impl AppSettings {
    /// Settings from `COPA_*` environment variables, falling back to defaults.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(path) = var("COPA_BRACKET_JSON") {
            settings.snapshot_path = PathBuf::from(path);
        }
        if let Some(secs) = var("COPA_REFRESH_SECS").and_then(|s| s.trim().parse::<u64>().ok())
            && secs > 0
        {
            settings.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(level) = var("COPA_LOG_LEVEL") {
            settings.log_level = LevelFilter::from_str(level.trim()).ok();
        }
        if let Some(dir) = var("COPA_EXPORT_DIR") {
            settings.export_dir = PathBuf::from(dir);
        }
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let s = settings_from(&[]);
        assert_eq!(s.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_PATH));
        assert_eq!(s.refresh_interval, DEFAULT_REFRESH);
        assert_eq!(s.log_level, None);
        assert_eq!(s.layout.canvas_width, None);
        assert!(s.layout.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let s = settings_from(&[
            ("COPA_BRACKET_JSON", "/tmp/copa.json"),
            ("COPA_REFRESH_SECS", "30"),
            ("COPA_LOG_LEVEL", "debug"),
            ("COPA_EXPORT_DIR", "/tmp/out"),
        ]);
        assert_eq!(s.snapshot_path, PathBuf::from("/tmp/copa.json"));
        assert_eq!(s.refresh_interval, Duration::from_secs(30));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
        assert_eq!(s.export_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_bad_values_are_ignored() {
        let s = settings_from(&[
            ("COPA_REFRESH_SECS", "soon"),
            ("COPA_LOG_LEVEL", "loud"),
            ("COPA_BRACKET_JSON", "   "),
        ]);
        assert_eq!(s.refresh_interval, DEFAULT_REFRESH);
        assert_eq!(s.log_level, None);
        assert_eq!(s.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_PATH));

        let zero = settings_from(&[("COPA_REFRESH_SECS", "0")]);
        assert_eq!(zero.refresh_interval, DEFAULT_REFRESH);
    }
}
