//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::builder::TypedValueParser as _;

use crate::app::list::DEFAULT_PAGE_SIZE;

/// Terminal client for a users REST API.
#[derive(Debug, Clone, Parser)]
#[command(name = "userdesk", version, about)]
pub struct Cli {
    /// Base URL of the users collection.
    #[arg(
        long,
        env = "USERDESK_API_URL",
        default_value = "http://localhost:8080/api/users"
    )]
    pub api_url: String,

    /// Records shown per page.
    #[arg(long, env = "USERDESK_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    pub page_size: usize,

    /// HTTP request timeout, in seconds.
    #[arg(long, env = "USERDESK_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Settings file (theme). Defaults to `<config dir>/userdesk/settings.conf`.
    #[arg(long, env = "USERDESK_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Keybindings file. Defaults to `<config dir>/userdesk/keybinds.conf`.
    #[arg(long, env = "USERDESK_KEYBINDS")]
    pub keybinds: Option<PathBuf>,

    /// Log file. Defaults to `<data dir>/userdesk/userdesk.log`.
    #[arg(long, env = "USERDESK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| crate::app::config_path("settings.conf"))
    }

    pub fn keybinds_path(&self) -> PathBuf {
        self.keybinds
            .clone()
            .unwrap_or_else(|| crate::app::config_path("keybinds.conf"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("userdesk")
                .join("userdesk.log")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let cli = Cli::try_parse_from(["userdesk"]).expect("parse");
        assert_eq!(cli.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cli.timeout(), Duration::from_secs(10));
        assert!(cli.api_url.ends_with("/api/users"));
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "userdesk",
            "--api-url",
            "http://example.test/users",
            "--page-size",
            "12",
            "--settings",
            "/tmp/s.conf",
        ])
        .expect("parse");
        assert_eq!(cli.api_url, "http://example.test/users");
        assert_eq!(cli.page_size, 12);
        assert_eq!(cli.settings_path(), PathBuf::from("/tmp/s.conf"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["userdesk", "--page-size", "0"]).is_err());
    }
}
