use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "roi.toml";
pub const DEFAULT_REPORT_FILE_NAME: &str = "iAttend-ROI-Report.pdf";
pub const DEFAULT_MAIL_SUBJECT: &str = "Your ROI Report (PDF Attached)";
pub const DEFAULT_MAIL_FROM: &str = "no-reply@i-attend.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Deserialize, Debug, Clone)]
pub struct Environment {
    pub env_type: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self { env_type: "default".to_string() }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public origin of the service, used for absolute links in the print page.
    pub base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 3000, base_url: None }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_body_size_kb: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_body_size_kb: 64 }
    }
}

/// Which [`crate::pdf::ReportRenderer`] the service builds.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Document,
    Browser,
}

impl FromStr for RendererKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" => Ok(Self::Document),
            "browser" => Ok(Self::Browser),
            other => Err(ConfigError::Invalid(format!("unknown pdf renderer '{other}'"))),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PdfConfig {
    pub renderer: RendererKind,
    /// Explicit Chromium/Chrome executable for the browser renderer.
    pub browser_path: Option<PathBuf>,
    pub timeout_seconds: u64,
    pub file_name: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            renderer: RendererKind::Document,
            browser_path: None,
            timeout_seconds: 30,
            file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
        }
    }
}

impl PdfConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MailConfig {
    pub enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: Option<String>,
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,
    pub from: String,
    pub subject: String,
    pub send_delay_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            username: None,
            password: None,
            from: DEFAULT_MAIL_FROM.to_string(),
            subject: DEFAULT_MAIL_SUBJECT.to_string(),
            send_delay_seconds: 30,
        }
    }
}

impl MailConfig {
    pub fn send_delay(&self) -> Duration {
        Duration::from_secs(self.send_delay_seconds)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct RoiConfig {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

impl RoiConfig {
    /// Loads the file named by `ROI_CONFIG_PATH`, falling back to `roi.toml`.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ROI_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(config_path)
    }

    /// A missing file yields the built-in defaults; an unreadable or malformed
    /// one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(config_str) => Self::parse(&config_str),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(
                    "Configuration file '{}' not found. Using default configuration.",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
        }
    }

    pub fn parse(config_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(config_str)?)
    }

    /// Applies `ROI_*` environment overrides.
    pub fn apply_profile(self) -> Result<Self, ConfigError> {
        info!(
            "Applying configuration profile for '{}' environment.",
            self.environment.env_type
        );
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("ROI_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("ROI_PORT") {
            self.server.port = parse_number("ROI_PORT", &port)?;
        }
        if let Some(base_url) = lookup("ROI_BASE_URL") {
            self.server.base_url = Some(base_url);
        }

        if let Some(renderer) = lookup("ROI_PDF_RENDERER") {
            self.pdf.renderer = renderer.parse()?;
        }
        if let Some(browser_path) = lookup("ROI_BROWSER_PATH") {
            self.pdf.browser_path = Some(PathBuf::from(browser_path));
        }

        if let Some(smtp_host) = lookup("ROI_SMTP_HOST") {
            self.mail.smtp_host = smtp_host;
            self.mail.enabled = true;
        }
        if let Some(smtp_port) = lookup("ROI_SMTP_PORT") {
            self.mail.smtp_port = parse_number("ROI_SMTP_PORT", &smtp_port)?;
        }
        if let Some(username) = lookup("ROI_SMTP_USERNAME") {
            self.mail.username = Some(username);
        }
        if let Some(password) = lookup("ROI_SMTP_PASSWORD") {
            self.mail.password = Some(SecretString::from(password));
        }
        if let Some(from) = lookup("ROI_MAIL_FROM") {
            self.mail.from = from;
        }
        if let Some(delay) = lookup("ROI_EMAIL_DELAY_SECONDS") {
            self.mail.send_delay_seconds = parse_number("ROI_EMAIL_DELAY_SECONDS", &delay)?;
        }

        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key} must be a number, got '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = RoiConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.from, "no-reply@i-attend.com");
        assert_eq!(config.mail.subject, "Your ROI Report (PDF Attached)");
        assert_eq!(config.mail.send_delay(), Duration::from_secs(30));
        assert_eq!(config.pdf.file_name, "iAttend-ROI-Report.pdf");
        assert_eq!(config.pdf.renderer, RendererKind::Document);
        assert!(!config.mail.enabled);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let config = RoiConfig::parse(
            r#"
[environment]
env_type = "staging"

[server]
port = 8080

[pdf]
renderer = "browser"

[mail]
enabled = true
smtp_host = "smtp.example.com"
password = "hunter2"
"#,
        )
        .unwrap();
        assert_eq!(config.environment.env_type, "staging");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.pdf.renderer, RendererKind::Browser);
        assert_eq!(config.pdf.timeout_seconds, 30);
        assert_eq!(config.mail.smtp_port, 587);
        assert_eq!(config.mail.password.as_ref().map(|p| p.expose_secret()), Some("hunter2"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(matches!(RoiConfig::parse("[server]\nport = \"x\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = RoiConfig::load_from("/nonexistent/roi.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn environment_overrides_apply() {
        let env: HashMap<&str, &str> = [
            ("ROI_PORT", "9000"),
            ("ROI_PDF_RENDERER", "Browser"),
            ("ROI_BROWSER_PATH", "/usr/bin/chromium"),
            ("ROI_SMTP_HOST", "mail.example.com"),
            ("ROI_SMTP_PASSWORD", "secret"),
            ("ROI_EMAIL_DELAY_SECONDS", "5"),
        ]
        .into_iter()
        .collect();
        let config = RoiConfig::default()
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.pdf.renderer, RendererKind::Browser);
        assert_eq!(config.pdf.browser_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert!(config.mail.enabled);
        assert_eq!(config.mail.smtp_host, "mail.example.com");
        assert_eq!(config.mail.send_delay_seconds, 5);
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn bad_override_is_rejected() {
        let result = RoiConfig::default()
            .apply_overrides(|key| (key == "ROI_PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = RoiConfig::default()
            .apply_overrides(|key| (key == "ROI_PDF_RENDERER").then(|| "latex".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn password_debug_output_is_redacted() {
        let config = RoiConfig::default()
            .apply_overrides(|key| (key == "ROI_SMTP_PASSWORD").then(|| "hunter2".to_string()))
            .unwrap();
        assert!(!format!("{:?}", config.mail).contains("hunter2"));
    }
}
