//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client starts with zero configuration.

use chrono::Duration;

const DEFAULT_EXPIRY_HOURS: i64 = 24;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Age at which an unextended room locks and the decision-maker is
    /// prompted to extend.
    /// Env: `ROOM_EXPIRY_HOURS`
    /// Default: `24`
    pub room_expiry: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            room_expiry: Duration::hours(DEFAULT_EXPIRY_HOURS),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("ROOM_EXPIRY_HOURS") {
            match val.parse::<i64>() {
                Ok(hours) if hours > 0 => config.room_expiry = Duration::hours(hours),
                _ => {
                    tracing::warn!(value = %val, "Invalid ROOM_EXPIRY_HOURS, using default");
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.room_expiry, Duration::hours(24));
    }
}
