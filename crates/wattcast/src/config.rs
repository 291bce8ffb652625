use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub listen_addr: String,
    pub default_horizon_days: u32,
    pub confidence_level: f64,
    pub preview_rows: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: std::env::var("WATTCAST_LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8094".to_string()),
            default_horizon_days: std::env::var("WATTCAST_DEFAULT_HORIZON_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(90),
            confidence_level: std::env::var("WATTCAST_CONFIDENCE_LEVEL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &f64| *v > 0.0 && *v < 1.0)
                .unwrap_or(0.95),
            preview_rows: std::env::var("WATTCAST_PREVIEW_ROWS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            max_upload_bytes: std::env::var("WATTCAST_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8094");
        assert_eq!(config.default_horizon_days, 90);
        assert_eq!(config.confidence_level, 0.95);
        assert_eq!(config.preview_rows, 5);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }
}
