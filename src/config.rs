use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Debug, Args)]
pub struct Config {
    /// Base URL of the FitTrack API server
    #[arg(long, env = "FITTRACK_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    #[command(flatten)]
    pub session: SessionConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

impl Config {
    /// Versioned API root all endpoint paths are joined onto.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api/v1", self.api_url.trim_end_matches('/'))
    }
}

#[derive(Clone, Debug, Default, Args)]
pub struct SessionConfig {
    /// File used to persist the refresh token between invocations
    #[arg(long, env = "FITTRACK_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Keep the session in memory only, even if a session file is configured
    #[arg(long, env = "FITTRACK_NO_PERSIST", default_value_t = false)]
    pub no_persist: bool,
}

impl SessionConfig {
    /// Where the refresh token lives between invocations, if anywhere.
    ///
    /// Falls back to `$XDG_RUNTIME_DIR/fittrack/session`, which the OS wipes
    /// at the end of the login session. Without a runtime directory there is
    /// no persistence and the session lasts one invocation.
    #[must_use]
    pub fn resolve_session_path(&self) -> Option<PathBuf> {
        if self.no_persist {
            return None;
        }
        if let Some(path) = &self.session_file {
            return Some(path.clone());
        }
        std::env::var_os("XDG_RUNTIME_DIR")
            .map(|dir| PathBuf::from(dir).join("fittrack").join("session"))
    }
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "FITTRACK_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
