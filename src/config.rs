use std::time::Duration;

use serde::Deserialize;

use crate::session::SlotLayout;

const ENV_PREFIX: &str = "SKIN_CAPTURE";

#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    pub layout: SlotLayout,
    /// Upper bound for one analysis request; 0 disables the timeout.
    pub analysis_timeout_ms: u64,
    pub mock_analysis_delay_ms: u64,
    pub log_level: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            layout: SlotLayout::ThreeAngle,
            analysis_timeout_ms: 10_000,
            mock_analysis_delay_ms: 1_400,
            log_level: "info".to_string(),
        }
    }
}

impl Configuration {
    /// Layers defaults, an optional config file and `SKIN_CAPTURE_*` environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let defaults = Configuration::default();
        let mut builder = config::Config::builder()
            .set_default("layout", defaults.layout.as_str())?
            .set_default("analysis_timeout_ms", defaults.analysis_timeout_ms)?
            .set_default("mock_analysis_delay_ms", defaults.mock_analysis_delay_ms)?
            .set_default("log_level", defaults.log_level)?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    pub fn analysis_timeout(&self) -> Option<Duration> {
        match self.analysis_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn mock_analysis_delay(&self) -> Duration {
        Duration::from_millis(self.mock_analysis_delay_ms)
    }

    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_three_angle_flow() {
        let configuration = Configuration::default();
        assert_eq!(configuration.layout, SlotLayout::ThreeAngle);
        assert_eq!(configuration.analysis_timeout(), Some(Duration::from_secs(10)));
        assert_eq!(configuration.mock_analysis_delay(), Duration::from_millis(1400));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let configuration = Configuration {
            analysis_timeout_ms: 0,
            ..Configuration::default()
        };
        assert_eq!(configuration.analysis_timeout(), None);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let configuration =
            Configuration::load(Some("does-not-exist/skin-capture")).expect("config should load");
        assert_eq!(configuration.mock_analysis_delay_ms, 1400);
        assert_eq!(configuration.tracing_level(), tracing::Level::INFO);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let configuration = Configuration {
            log_level: "chatty".to_string(),
            ..Configuration::default()
        };
        assert_eq!(configuration.tracing_level(), tracing::Level::INFO);
    }
}
