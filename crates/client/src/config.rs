//! Client configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Settings the composition root needs before the runtime is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub session_id: String,
    pub save_dir: PathBuf,
    pub enable_persistence: bool,
    /// Write logs to `{log_dir}/{session_id}/client.log` instead of stderr.
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `TRACKER_SESSION_ID` - Session identifier for save files (default: auto-generated)
    /// - `TRACKER_SAVE_DIR` - Directory for save data (default: platform-specific)
    /// - `TRACKER_ENABLE_PERSISTENCE` - Snapshot every committed state (default: false)
    /// - `TRACKER_LOG_DIR` - Log to files under this directory (default: stderr)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let session_id = lookup("TRACKER_SESSION_ID")
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(generated_session_id);

        let save_dir = lookup("TRACKER_SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_save_dir);

        // A bare `TRACKER_ENABLE_PERSISTENCE=` also counts as enabled.
        let enable_persistence = match lookup("TRACKER_ENABLE_PERSISTENCE") {
            Some(raw) if raw.is_empty() => true,
            Some(raw) => parse(&raw).unwrap_or(false),
            None => false,
        };

        let log_dir = lookup("TRACKER_LOG_DIR").map(PathBuf::from);

        Self {
            session_id,
            save_dir,
            enable_persistence,
            log_dir,
        }
    }
}

fn generated_session_id() -> String {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("session_{}", timestamp)
}

/// Platform data directory, e.g. `~/.local/share/tracker/sessions` on Linux.
fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "tracker")
        .map(|dirs| dirs.data_dir().join("sessions"))
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

fn parse<T>(raw: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    raw.trim().parse().ok()
}
