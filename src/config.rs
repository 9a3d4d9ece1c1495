use clap::{Args, Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Base URL of the classification API (overrides the stored settings)
    #[arg(long, env = "CLASSIFIER_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the persisted session and settings
    #[arg(long, env = "CLASSIFIER_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Which console surface to run as
    #[arg(long, env = "CLASSIFIER_SURFACE", value_enum, default_value_t = Surface::Admin, global = true)]
    pub surface: Surface,

    /// Location of the login page shown when the session is missing or rejected
    #[arg(long, env = "CLASSIFIER_LOGIN_URL", default_value = "/login.html", global = true)]
    pub login_url: String,

    #[command(flatten)]
    pub display: DisplayConfig,

    #[command(flatten)]
    pub upload: UploadConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct DisplayConfig {
    /// Language used for category labels
    #[arg(long, env = "CLASSIFIER_LABELS", value_enum, default_value_t = LabelLanguage::Chinese, global = true)]
    pub labels: LabelLanguage,

    /// Local `imagenet_classes.json`; fetched from the API host when absent
    #[arg(long, env = "CLASSIFIER_IMAGENET_CLASSES", global = true)]
    pub imagenet_classes: Option<PathBuf>,

    /// Width of the confidence bar in cells
    #[arg(long, env = "CLASSIFIER_BAR_WIDTH", default_value_t = 40, global = true)]
    pub bar_width: usize,

    /// Dashboard refresh interval in watch mode
    #[arg(long, env = "CLASSIFIER_REFRESH_INTERVAL_SECS", default_value_t = 30, global = true)]
    pub refresh_interval_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct UploadConfig {
    /// Max upload size in bytes (Default: 10MB)
    #[arg(long, env = "CLASSIFIER_MAX_UPLOAD_BYTES", default_value_t = 10_485_760, global = true)]
    pub max_upload_bytes: u64,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "CLASSIFIER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Capability flag selecting admin or public console behaviour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Surface {
    /// Session-guarded console with every section
    Admin,
    /// Open console: health, daily stats, classification and local settings
    Public,
}

impl Surface {
    #[must_use]
    pub const fn requires_auth(self) -> bool {
        matches!(self, Self::Admin)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Public => "public",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LabelLanguage {
    #[value(name = "zh")]
    Chinese,
    #[value(name = "en")]
    English,
}

impl Config {
    /// Resolves the state directory: explicit flag, then `$HOME/.classifier-console`,
    /// then the working directory.
    #[must_use]
    pub fn resolve_state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".classifier-console")
        })
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { labels: LabelLanguage::Chinese, imagenet_classes: None, bar_width: 40, refresh_interval_secs: 30 }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_upload_bytes: 10_485_760 }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { log_format: LogFormat::Text }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_capabilities() {
        assert!(Surface::Admin.requires_auth());
        assert!(!Surface::Public.requires_auth());
        assert_eq!(Surface::Public.as_str(), "public");
    }

    #[test]
    fn test_defaults_from_args() {
        let config = Config::parse_from(["classifier-console"]);
        assert_eq!(config.surface, Surface::Admin);
        assert_eq!(config.login_url, "/login.html");
        assert_eq!(config.upload.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.display.labels, LabelLanguage::Chinese);
    }

    #[test]
    fn test_explicit_state_dir_wins() {
        let config = Config::parse_from(["classifier-console", "--state-dir", "/tmp/console-state"]);
        assert_eq!(config.resolve_state_dir(), PathBuf::from("/tmp/console-state"));
    }
}
