//! Runtime configuration shared by every subcommand (see the ambient
//! stack's configuration design: CLI-flag-driven, no config file, with
//! flag parsing, defaults, and validation living in one place rather than
//! copy-pasted per subcommand).

use thiserror::Error;

/// A successful run's RNG seed is fixed rather than flag-configurable (see
/// the external interfaces' "implicit constant for reproducibility"), so a
/// failing run can always be reproduced by rerunning the same command.
pub const DEFAULT_SEED: u64 = 0xC0FFEE_u64;

pub const READINESS_WINDOW: std::time::Duration = std::time::Duration::from_secs(10);
pub const READINESS_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(1);

#[derive(Clone, Debug)]
pub struct RunConfig {
    pub addr: String,
    pub clients: u32,
    pub requests_per_client: usize,
    pub seed: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("client count must be at least 1, got {0}")]
    ZeroClients(u32),
    #[error("requests-per-client must be at least 1, got {0}")]
    ZeroRequests(usize),
    #[error("address must not be empty")]
    EmptyAddress,
}

impl RunConfig {
    pub fn new(addr: String, clients: u32, requests_per_client: usize) -> Result<Self, ConfigError> {
        Self::validate(&addr, clients, requests_per_client)?;
        Ok(Self {
            addr,
            clients,
            requests_per_client,
            seed: DEFAULT_SEED,
        })
    }

    fn validate(addr: &str, clients: u32, requests_per_client: usize) -> Result<(), ConfigError> {
        if addr.trim().is_empty() {
            return Err(ConfigError::EmptyAddress);
        }
        if clients == 0 {
            return Err(ConfigError::ZeroClients(clients));
        }
        if requests_per_client == 0 {
            return Err(ConfigError::ZeroRequests(requests_per_client));
        }
        Ok(())
    }
}
