use crate::constants::default_values::DefaultValues;
use anyhow::bail;
use serde::{Deserialize, Serialize};

/// What the driver does when the chip does not acknowledge a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AckPolicy {
    /// Log the miss and finish the transaction anyway.
    Ignore,
    /// Send STOP and return [`TmError::Ack`](super::errors::TmError::Ack).
    Strict,
}

impl Default for AckPolicy {
    fn default() -> Self {
        Self::Ignore
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Tm1637Config {
    /// Length of one delay step between pin transitions.
    pub delay_us: u16,

    /// Busy-wait calibration used by [`SpinDelay`](super::delay::SpinDelay).
    pub spins_per_us: u32,

    pub ack_policy: AckPolicy,
}

impl Default for Tm1637Config {
    fn default() -> Self {
        Self {
            delay_us: DefaultValues::TM1637_DELAY_US,
            spins_per_us: DefaultValues::TM1637_SPINS_PER_US,
            ack_policy: AckPolicy::default(),
        }
    }
}

impl Tm1637Config {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.delay_us == 0 {
            bail!("[Tm1637Config] 'delay_us' must be greater than zero");
        }
        if self.spins_per_us == 0 {
            bail!("[Tm1637Config] 'spins_per_us' must be greater than zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = Tm1637Config::from_json("{}").unwrap();
        assert_eq!(config, Tm1637Config::default());
        assert_eq!(config.ack_policy, AckPolicy::Ignore);
    }

    #[test]
    fn test_partial_override() {
        let config = Tm1637Config::from_json(r#"{"delay_us": 5, "ack_policy": "strict"}"#).unwrap();
        assert_eq!(config.delay_us, 5);
        assert_eq!(config.ack_policy, AckPolicy::Strict);
        assert_eq!(config.spins_per_us, DefaultValues::TM1637_SPINS_PER_US);
    }

    #[test]
    fn test_rejects_zero_timing() {
        assert!(Tm1637Config::from_json(r#"{"delay_us": 0}"#).is_err());
        assert!(Tm1637Config::from_json(r#"{"spins_per_us": 0}"#).is_err());
        assert!(Tm1637Config::from_json("not json").is_err());
    }
}
