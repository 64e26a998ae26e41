//! Serializable session settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Construction-time settings for a [`DeviceStream`](super::DeviceStream).
///
/// Everything here is plain data so it can live in a YAML/JSON/TOML
/// inventory; the transport and prompt setter are supplied in code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Literal strings that end a prompt, e.g. `[">", "#"]`.
    pub delimiters: Vec<String>,

    /// Command that disables output paging, sent once after connect.
    pub nopage_command: Option<String>,

    /// Upper bound on a single read-until, in seconds. Unbounded when unset.
    pub read_timeout_secs: Option<u64>,

    /// Remove ANSI escape sequences from received data.
    pub strip_ansi: bool,

    /// Only search the last N bytes of a response for terminators.
    pub search_depth: Option<usize>,
}

impl StreamConfig {
    /// Read timeout as a `Duration`.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial() {
        let config: StreamConfig =
            serde_json::from_str(r##"{"delimiters": [">", "#"], "nopage_command": "terminal length 0"}"##)
                .unwrap();

        assert_eq!(config.delimiters, vec![">", "#"]);
        assert_eq!(config.nopage_command.as_deref(), Some("terminal length 0"));
        assert_eq!(config.read_timeout(), None);
        assert!(!config.strip_ansi);
    }

    #[test]
    fn test_read_timeout() {
        let config = StreamConfig {
            read_timeout_secs: Some(15),
            ..Default::default()
        };
        assert_eq!(config.read_timeout(), Some(Duration::from_secs(15)));

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"read_timeout_secs\":15"));
    }
}
