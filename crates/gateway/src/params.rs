//! Client gateway configuration.

use causeway_beacon_verification::BeaconFork;
use causeway_capsule::{CapsuleParams, CredentialMode};
use causeway_primitives::ChannelId;
use serde::{Deserialize, Serialize};

fn default_settlement_channel() -> ChannelId {
    ChannelId::new(1)
}

fn default_min_claim_interval() -> u64 {
    86_400
}

fn default_proof_freshness() -> u64 {
    14_400
}

fn default_max_restaked_balance() -> u64 {
    32_000_000_000
}

fn default_credential_mode() -> CredentialMode {
    CredentialMode::Legacy
}

fn default_beacon_fork() -> BeaconFork {
    BeaconFork::Deneb
}

/// Operating parameters of a client gateway.
///
/// Every field has a default, so a config file only needs to name what
/// it changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientParams {
    /// Channel the settlement gateway is reached over.
    #[serde(default = "default_settlement_channel")]
    pub settlement_channel: ChannelId,

    /// Minimum seconds between confirmed native stake claims.
    #[serde(default = "default_min_claim_interval")]
    pub min_claim_interval_secs: u64,

    /// Maximum age of a beacon proof's block root, in seconds.
    #[serde(default = "default_proof_freshness")]
    pub proof_freshness_secs: u64,

    /// Per-validator cap on restaked balance, in gwei.
    #[serde(default = "default_max_restaked_balance")]
    pub max_restaked_balance_gwei: u64,

    /// Withdrawal credential prefix accepted at registration.
    #[serde(default = "default_credential_mode")]
    pub credential_mode: CredentialMode,

    /// Fork whose proof shape verification expects.
    #[serde(default = "default_beacon_fork")]
    pub beacon_fork: BeaconFork,
}

impl ClientParams {
    /// The capsule-level view of these parameters.
    pub fn capsule_params(&self) -> CapsuleParams {
        CapsuleParams {
            min_claim_interval_secs: self.min_claim_interval_secs,
            proof_freshness_secs: self.proof_freshness_secs,
            max_restaked_balance_gwei: self.max_restaked_balance_gwei,
            credential_mode: self.credential_mode,
        }
    }
}

impl Default for ClientParams {
    fn default() -> Self {
        Self {
            settlement_channel: default_settlement_channel(),
            min_claim_interval_secs: default_min_claim_interval(),
            proof_freshness_secs: default_proof_freshness(),
            max_restaked_balance_gwei: default_max_restaked_balance(),
            credential_mode: default_credential_mode(),
            beacon_fork: default_beacon_fork(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_defaults() {
        let params: ClientParams = toml::from_str("").expect("empty config should parse");
        assert_eq!(params, ClientParams::default());
        assert_eq!(params.settlement_channel, ChannelId::new(1));
        assert_eq!(params.max_restaked_balance_gwei, 32_000_000_000);
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = r#"
            settlement_channel = 40161
            min_claim_interval_secs = 3600
            credential_mode = "compounding"
            beacon_fork = "electra"
        "#;
        let params: ClientParams = toml::from_str(config).expect("config should parse");
        assert_eq!(params.settlement_channel, ChannelId::new(40161));
        assert_eq!(params.min_claim_interval_secs, 3600);
        assert_eq!(params.credential_mode, CredentialMode::Compounding);
        assert_eq!(params.beacon_fork, BeaconFork::Electra);

        // Untouched fields keep their defaults.
        assert_eq!(params.proof_freshness_secs, 14_400);
        assert_eq!(params.max_restaked_balance_gwei, 32_000_000_000);
    }

    #[test]
    fn test_capsule_params_view() {
        let params = ClientParams {
            min_claim_interval_secs: 10,
            credential_mode: CredentialMode::Compounding,
            ..ClientParams::default()
        };
        let capsule = params.capsule_params();
        assert_eq!(capsule.min_claim_interval_secs, 10);
        assert_eq!(capsule.credential_mode, CredentialMode::Compounding);
        assert_eq!(capsule.proof_freshness_secs, 14_400);
    }
}
