//! Configuration shared by the engine and its adapters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunables for the tiered response policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Minimum best score for answering directly.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
    /// A lone shortlisted candidate must score above this to be offered with its answer.
    #[serde(default = "default_clarify_threshold")]
    pub clarify_threshold: f64,
    /// How many ranked candidates are considered for "did you mean".
    #[serde(default = "default_shortlist_size")]
    pub shortlist_size: usize,
    /// How many declared questions the help message lists.
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: usize,
}

fn default_confidence_threshold() -> f64 {
    0.35
}

fn default_clarify_threshold() -> f64 {
    0.2
}

fn default_shortlist_size() -> usize {
    3
}

fn default_suggestion_count() -> usize {
    5
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            clarify_threshold: default_clarify_threshold(),
            shortlist_size: default_shortlist_size(),
            suggestion_count: default_suggestion_count(),
        }
    }
}

impl PolicyConfig {
    /// Rejects thresholds outside [0, 1] and an empty shortlist.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("confidence_threshold", self.confidence_threshold),
            ("clarify_threshold", self.clarify_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidPolicy(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.shortlist_size == 0 {
            return Err(Error::InvalidPolicy(
                "shortlist_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Deployment configuration. Load from TOML/JSON or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Name reported by the gateway status route.
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// JSON knowledge base on disk. When unset the bundled content is used.
    #[serde(default)]
    pub knowledge_path: Option<String>,
    /// Topic used when a page path names none of the known topics.
    #[serde(default)]
    pub default_topic: Option<String>,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            app_name: "pagebot".to_string(),
            port: 8010,
            knowledge_path: None,
            default_topic: None,
            policy: PolicyConfig::default(),
        }
    }
}

impl BotConfig {
    /// Load config from file and environment. Precedence: env `PAGEBOT_*` > file named by
    /// `PAGEBOT_CONFIG` (default `config/pagebot`, any supported extension) > defaults.
    pub fn load() -> Result<Self> {
        let config_path =
            std::env::var("PAGEBOT_CONFIG").unwrap_or_else(|_| "config/pagebot".to_string());
        Self::load_from(&config_path)
    }

    /// Same as [`BotConfig::load`] with an explicit file name. A missing file is not an error.
    pub fn load_from(config_path: &str) -> Result<Self> {
        Self::load_with_env(config_path, None)
    }

    /// Loads with `env` standing in for the process environment (`None` reads the real one).
    /// Keys use the same `PAGEBOT_` prefix and `__` nesting, e.g. `PAGEBOT_POLICY__CLARIFY_THRESHOLD`.
    pub fn load_with_env(
        config_path: &str,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let defaults = PolicyConfig::default();
        let built = config::Config::builder()
            .set_default("app_name", "pagebot")?
            .set_default("port", 8010_i64)?
            .set_default("policy.confidence_threshold", defaults.confidence_threshold)?
            .set_default("policy.clarify_threshold", defaults.clarify_threshold)?
            .set_default("policy.shortlist_size", defaults.shortlist_size as i64)?
            .set_default("policy.suggestion_count", defaults.suggestion_count as i64)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PAGEBOT")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()?;

        let loaded: Self = built.try_deserialize()?;
        loaded.policy.validate()?;
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> config::Map<String, String> {
        config::Map::new()
    }

    fn env_of(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn policy_defaults_match_documented_constants() {
        let policy = PolicyConfig::default();
        assert_eq!(policy.confidence_threshold, 0.35);
        assert_eq!(policy.clarify_threshold, 0.2);
        assert_eq!(policy.shortlist_size, 3);
        assert_eq!(policy.suggestion_count, 5);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn policy_rejects_out_of_range_threshold() {
        let policy = PolicyConfig {
            confidence_threshold: 1.5,
            ..PolicyConfig::default()
        };
        assert!(matches!(policy.validate(), Err(Error::InvalidPolicy(_))));

        let policy = PolicyConfig {
            clarify_threshold: -0.1,
            ..PolicyConfig::default()
        };
        assert!(matches!(policy.validate(), Err(Error::InvalidPolicy(_))));
    }

    #[test]
    fn policy_rejects_empty_shortlist() {
        let policy = PolicyConfig {
            shortlist_size: 0,
            ..PolicyConfig::default()
        };
        assert!(matches!(policy.validate(), Err(Error::InvalidPolicy(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config =
            BotConfig::load_with_env("./definitely/not/here/pagebot", Some(no_env())).unwrap();
        assert_eq!(config.policy, PolicyConfig::default());
        assert!(config.knowledge_path.is_none());
    }

    #[test]
    fn toml_file_overrides_policy() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "app_name = \"Renewables Helper\"\nport = 9100\ndefault_topic = \"activity2\"\n\n[policy]\nconfidence_threshold = 0.5\nsuggestion_count = 2\n"
        )
        .unwrap();

        let config =
            BotConfig::load_with_env(file.path().to_str().unwrap(), Some(no_env())).unwrap();
        assert_eq!(config.app_name, "Renewables Helper");
        assert_eq!(config.port, 9100);
        assert_eq!(config.default_topic.as_deref(), Some("activity2"));
        assert_eq!(config.policy.confidence_threshold, 0.5);
        assert_eq!(config.policy.suggestion_count, 2);
        assert_eq!(config.policy.clarify_threshold, 0.2);
        assert_eq!(config.policy.shortlist_size, 3);
    }

    #[test]
    fn invalid_policy_in_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[policy]\nshortlist_size = 0\n").unwrap();

        let err = BotConfig::load_with_env(file.path().to_str().unwrap(), Some(no_env()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPolicy(_)));
    }

    #[test]
    fn env_overrides_file_and_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "port = 9100\nknowledge_path = \"/srv/kb.json\"\n\n[policy]\nconfidence_threshold = 0.5\nsuggestion_count = 4\n"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let file_only = BotConfig::load_with_env(path, Some(no_env())).unwrap();
        assert_eq!(file_only.port, 9100);
        assert_eq!(file_only.knowledge_path.as_deref(), Some("/srv/kb.json"));
        assert_eq!(file_only.policy.confidence_threshold, 0.5);
        assert_eq!(file_only.app_name, "pagebot");

        let env = env_of(&[
            ("PAGEBOT_PORT", "9200"),
            ("PAGEBOT_KNOWLEDGE_PATH", "/x/kb.json"),
            ("PAGEBOT_POLICY__CONFIDENCE_THRESHOLD", "0.6"),
        ]);
        let layered = BotConfig::load_with_env(path, Some(env)).unwrap();
        assert_eq!(layered.port, 9200);
        assert_eq!(layered.knowledge_path.as_deref(), Some("/x/kb.json"));
        assert_eq!(layered.policy.confidence_threshold, 0.6);
        assert_eq!(layered.policy.suggestion_count, 4);
        assert_eq!(layered.policy.clarify_threshold, 0.2);
    }

    #[test]
    fn env_without_file_overrides_defaults() {
        let env = env_of(&[("PAGEBOT_POLICY__SHORTLIST_SIZE", "2"), ("OTHER_PORT", "1")]);
        let config =
            BotConfig::load_with_env("./definitely/not/here/pagebot", Some(env)).unwrap();
        assert_eq!(config.policy.shortlist_size, 2);
        assert_eq!(config.port, 8010);
    }

    #[test]
    fn invalid_policy_from_env_is_rejected() {
        let env = env_of(&[("PAGEBOT_POLICY__CLARIFY_THRESHOLD", "1.5")]);
        let err =
            BotConfig::load_with_env("./definitely/not/here/pagebot", Some(env)).unwrap_err();
        assert!(matches!(err, Error::InvalidPolicy(_)));
    }
}
