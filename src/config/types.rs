use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_feed_ttl")]
    pub feed_ttl_secs: u64,
    #[serde(default = "default_min_body_len")]
    pub min_feed_body_len: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_timeout(),
            feed_ttl_secs: default_feed_ttl(),
            min_feed_body_len: default_min_body_len(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

fn default_user_agent() -> String {
    "staysync/0.2 calendar-sync (+https://github.com/staysync/staysync)".into()
}

fn default_timeout() -> u64 {
    15
}

fn default_feed_ttl() -> u64 {
    900 // 15 minutes
}

fn default_min_body_len() -> usize {
    15 // shortest plausible body is a bare "BEGIN:VCALENDAR"
}

fn default_max_entries() -> usize {
    500
}
