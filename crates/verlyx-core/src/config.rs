//! Runner configuration

use crate::error::{RunnerError, RunnerResult};
use crate::logging::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, Level};
use verlyx_viewhost::{Point, Size, ThemeDecoration};

/// Directory under the platform config dir that holds `runner.json`.
const CONFIG_DIR_NAME: &str = "verlyx-hub";

/// Runner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Application id registered with the desktop session (GTK)
    pub application_id: String,

    /// Main window placement
    pub window: WindowConfig,

    /// Title bar decoration
    pub theme: ThemeConfig,

    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text
    pub title: String,

    /// Logical x of the top-left corner (96 DPI units)
    pub x: f64,

    /// Logical y of the top-left corner (96 DPI units)
    pub y: f64,

    /// Logical width
    pub width: f64,

    /// Logical height
    pub height: f64,

    /// Terminate the event loop when the main window closes
    pub quit_on_close: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Request dark window chrome
    pub dark_mode: bool,

    /// Caption color as a COLORREF (0x00BBGGRR); 0xFFFFFFFF keeps the system default
    pub caption_color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level used when neither `RUST_LOG` nor `filter` is set
    pub level: String,

    /// Output format
    pub format: LogFormat,

    /// Custom filter directive (e.g. "verlyx_viewhost=trace")
    pub filter: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            application_id: "com.verlyx.verlyx_hub".to_string(),
            window: WindowConfig::default(),
            theme: ThemeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Verlyx Hub".to_string(),
            x: 10.0,
            y: 10.0,
            width: 1280.0,
            height: 720.0,
            quit_on_close: true,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let theme = ThemeDecoration::default();
        Self {
            dark_mode: theme.dark_mode,
            caption_color: theme.caption_color,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            filter: None,
        }
    }
}

impl RunnerConfig {
    /// File name of the on-disk configuration.
    pub const FILE_NAME: &'static str = "runner.json";

    /// Default location: `<config_dir>/verlyx-hub/runner.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(Self::FILE_NAME))
    }

    /// Load from the default location, falling back to defaults when the
    /// platform has no config directory or the file does not exist.
    pub fn load_or_default() -> RunnerResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No platform config directory, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a configuration file. A missing file yields defaults.
    pub fn load_from(path: &Path) -> RunnerResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Reject values the window layer cannot honor.
    pub fn validate(&self) -> RunnerResult<()> {
        if self.application_id.trim().is_empty() {
            return Err(RunnerError::config("application_id must not be empty"));
        }
        self.window.validate()?;
        self.logging.level()?;
        Ok(())
    }
}

impl WindowConfig {
    /// Logical origin handed to `PlatformWindow::create`.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Logical size handed to `PlatformWindow::create`.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn validate(&self) -> RunnerResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(RunnerError::config("window origin must be finite"));
        }
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(RunnerError::config(format!(
                "window width must be positive, got {}",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(RunnerError::config(format!(
                "window height must be positive, got {}",
                self.height
            )));
        }
        Ok(())
    }
}

impl From<ThemeConfig> for ThemeDecoration {
    fn from(theme: ThemeConfig) -> Self {
        ThemeDecoration {
            dark_mode: theme.dark_mode,
            caption_color: theme.caption_color,
        }
    }
}

impl LoggingConfig {
    /// Parsed fallback level.
    pub fn level(&self) -> RunnerResult<Level> {
        Level::from_str(self.level.trim())
            .map_err(|_| RunnerError::config(format!("unknown log level {:?}", self.level)))
    }

    /// Convert into the subscriber configuration.
    pub fn to_log_config(&self) -> RunnerResult<LogConfig> {
        let mut config = LogConfig {
            level: self.level()?,
            format: self.format,
            ..Default::default()
        };
        if let Some(filter) = &self.filter {
            config = config.with_filter(filter.clone());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_runner_window() {
        let config = RunnerConfig::default();
        assert_eq!(config.window.title, "Verlyx Hub");
        assert_eq!(config.window.origin(), Point::new(10.0, 10.0));
        assert_eq!(config.window.size(), Size::new(1280.0, 720.0));
        assert!(config.window.quit_on_close);
        assert_eq!(config.application_id, "com.verlyx.verlyx_hub");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, RunnerConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RunnerConfig::FILE_NAME);
        std::fs::write(
            &path,
            r#"{ "window": { "title": "Hub (dev)", "width": 800 }, "logging": { "level": "debug" } }"#,
        )
        .unwrap();

        let config = RunnerConfig::load_from(&path).unwrap();
        assert_eq!(config.window.title, "Hub (dev)");
        assert_eq!(config.window.width, 800.0);
        assert_eq!(config.window.height, 720.0);
        assert_eq!(config.logging.level().unwrap(), Level::DEBUG);
        assert!(config.theme.dark_mode);
    }

    #[test]
    fn test_rejects_non_positive_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RunnerConfig::FILE_NAME);
        std::fs::write(&path, r#"{ "window": { "height": 0 } }"#).unwrap();

        let err = RunnerConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, RunnerError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(RunnerConfig::FILE_NAME);
        std::fs::write(&path, "{ window: ").unwrap();

        let err = RunnerConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, RunnerError::Json(_)));
    }

    #[test]
    fn test_rejects_unknown_level() {
        let mut config = RunnerConfig::default();
        config.logging.level = "chatty".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_theme_conversion() {
        let theme = ThemeConfig {
            dark_mode: false,
            caption_color: 0x00FF_0000,
        };
        let decoration = ThemeDecoration::from(theme);
        assert!(!decoration.dark_mode);
        assert_eq!(decoration.caption_color, 0x00FF_0000);
    }

    #[test]
    fn test_log_config_carries_filter() {
        let logging = LoggingConfig {
            level: "warn".into(),
            format: LogFormat::Compact,
            filter: Some("verlyx_viewhost=trace".into()),
        };
        let config = logging.to_log_config().unwrap();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.filter.as_deref(), Some("verlyx_viewhost=trace"));
    }
}
