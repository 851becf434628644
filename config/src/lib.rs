use std::time::Duration;

use anyhow::{Context, Result};
use harness_precompile::DispatchOptions;
use harness_tx::{EnvelopeType, InMemoryKeyStore, Nonce};
use harness_types::{Address, H160, U256};
use hex_literal::hex;
use url::Url;

/// Environment variables overriding the selected preset.
pub mod env_vars {
    use std::ffi::OsStr;

    /// JSON-RPC endpoint of the node.
    pub const HARNESS_NODE_URL: &str = "HARNESS_NODE_URL";

    /// Chain id used for signing, skips the `eth_chainId` lookup.
    pub const HARNESS_CHAIN_ID: &str = "HARNESS_CHAIN_ID";

    /// Load an environment variable and verify if it's not empty
    pub fn non_empty_var<K: AsRef<OsStr>>(key: K) -> Option<String> {
        let value = std::env::var(key).ok()?;
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Well known development account, funded at genesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DevAccount {
    pub name: &'static str,
    pub secret: [u8; 32],
    pub address: Address,
}

pub const DEV_ACCOUNTS: &[DevAccount] = &[
    DevAccount {
        name: "alith",
        secret: hex!("5fb92d6e98884f76de468fa3f6278f8807c48bebc13595d45af5bdc4da702133"),
        address: H160(hex!("f24ff3a9cf04c71dbc94d0b566f7a27b94566cac")),
    },
    DevAccount {
        name: "baltathar",
        secret: hex!("8075991ce870b93a8870eca0c0f91913d12f47948ca0fd25b49c6fa7cdbeee8b"),
        address: H160(hex!("3cd0a705a2dc65e5b1e1205896baa2be8a07c6e0")),
    },
    DevAccount {
        name: "charleth",
        secret: hex!("0b6e18cafb6ed99687ec547bd28139cafdd2bffe70e6b688025de6b445aa5c5b"),
        address: H160(hex!("798d4ba9baf0064ec19eb4f0a1a45785ae9d6dfc")),
    },
    DevAccount {
        name: "dorothy",
        secret: hex!("39539ab1876910bbf3a223d84a29e28f1cb4e2e456503e7e91ed39b2e7223d68"),
        address: H160(hex!("773539d4ac0e786233d90a233654ccee26a613d9")),
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub network: &'static str,
    pub node_url: Url,
    /// `None` queries `eth_chainId` on connect.
    pub chain_id: Option<u64>,
    pub envelope: EnvelopeType,
    pub gas_limit: u64,
    pub gas_price: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub poll_interval: Duration,
    pub accounts: &'static [DevAccount],
}

impl HarnessConfig {
    /// Settings for dispatched precompile calls, signed for `chain_id`.
    #[must_use]
    pub fn dispatch_options(&self, chain_id: u64) -> DispatchOptions {
        DispatchOptions {
            envelope: self.envelope,
            nonce: Nonce::Auto,
            gas_limit: self.gas_limit,
            gas_price: self.gas_price,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            chain_id: Some(chain_id),
            poll_interval: self.poll_interval,
        }
    }

    /// Key store with every configured account.
    ///
    /// # Errors
    /// Returns `Err` if a secret is not a valid secp256k1 key.
    pub fn keystore(&self) -> Result<InMemoryKeyStore> {
        let secrets = self.accounts.iter().map(|account| (account.name, account.secret));
        InMemoryKeyStore::from_secrets(secrets).context("invalid dev account secret")
    }

    #[must_use]
    pub fn account(&self, name: &str) -> Option<&DevAccount> {
        self.accounts.iter().find(|account| account.name == name)
    }

    fn apply_overrides<F>(mut self, var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(node_url) = var(env_vars::HARNESS_NODE_URL) {
            self.node_url = Url::parse(node_url.trim())
                .with_context(|| format!("invalid {}: {node_url}", env_vars::HARNESS_NODE_URL))?;
        }
        if let Some(chain_id) = var(env_vars::HARNESS_CHAIN_ID) {
            let chain_id = chain_id
                .trim()
                .parse()
                .with_context(|| format!("invalid {}: {chain_id}", env_vars::HARNESS_CHAIN_ID))?;
            self.chain_id = Some(chain_id);
        }
        Ok(self)
    }
}

/// Returns the preset of `network` with environment overrides applied.
///
/// # Errors
/// Returns `Err` for an unknown network or a malformed override.
pub fn config(network: &str) -> Result<HarnessConfig> {
    let preset = match network {
        "dev" => HarnessConfig {
            network: "dev",
            node_url: Url::parse("http://127.0.0.1:9944")?,
            chain_id: None,
            envelope: EnvelopeType::Legacy,
            gas_limit: 1_000_000,
            gas_price: U256::from(1_000_000_000_000u64),
            max_fee_per_gas: U256::from(2_000_000_000_000u64),
            max_priority_fee_per_gas: U256::from(1_000_000_000u64),
            poll_interval: Duration::from_millis(500),
            accounts: DEV_ACCOUNTS,
        },
        // multi-node local testnet, slower blocks
        "local" => HarnessConfig {
            network: "local",
            node_url: Url::parse("http://127.0.0.1:9934")?,
            chain_id: None,
            envelope: EnvelopeType::DynamicFee,
            gas_limit: 1_000_000,
            gas_price: U256::from(1_000_000_000_000u64),
            max_fee_per_gas: U256::from(2_000_000_000_000u64),
            max_priority_fee_per_gas: U256::from(1_000_000_000u64),
            poll_interval: Duration::from_secs(1),
            accounts: DEV_ACCOUNTS,
        },
        _ => anyhow::bail!("unsupported network: {network}"),
    };
    let config = preset.apply_overrides(|key| env_vars::non_empty_var(key))?;
    log::debug!("{} harness config, node {}", config.network, config.node_url);
    Ok(config)
}
