use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Backend {
    pub url: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Referral {
    pub bot_username: String,
}

/// Thresholds gating the withdrawal action.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Eligibility {
    pub min_referrals: usize,
    pub min_balance: f64,
}

impl Default for Eligibility {
    fn default() -> Self {
        Self {
            min_referrals: 15,
            min_balance: 100.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Spin {
    pub animation_ms: u64,
}

/// Host-provided user context. Absent `user_id` means unauthenticated.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Host {
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub backend: Backend,
    pub referral: Referral,
    pub eligibility: Eligibility,
    pub spin: Spin,
    #[serde(default)]
    pub host: Host,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("backend.url", "http://localhost:7070")?
            .set_default("referral.bot_username", "SpinAndWinBot")?
            .set_default("eligibility.min_referrals", 15)?
            .set_default("eligibility.min_balance", 100.0)?
            .set_default("spin.animation_ms", 2000)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("SPINWIN").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
