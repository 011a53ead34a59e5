//! # Program Configuration
//!
//! Typed view of the deployment descriptor: the program id and the record
//! account keypair. Built once at startup and shared read-only through an
//! `Arc`; never recomputed.

use std::str::FromStr;
use std::sync::Arc;

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};

use lib_core::config::{DeploymentDescriptor, NetworkConfig};
use lib_core::error::{AppError, Result};

/// Program id and the keypair of the record account it owns.
pub struct ProgramConfig {
    pub program_id: Pubkey,
    record_keypair: Keypair,
}

impl std::fmt::Debug for ProgramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramConfig")
            .field("program_id", &self.program_id)
            .field("record_address", &self.record_address())
            .finish()
    }
}

impl ProgramConfig {
    pub fn new(program_id: Pubkey, record_keypair: Keypair) -> Self {
        Self {
            program_id,
            record_keypair,
        }
    }

    /// Build from the descriptor.
    ///
    /// The first 32 bytes of the secret key are the ed25519 seed; the last 32 must be
    /// the public key derived from it.
    pub fn from_descriptor(descriptor: &DeploymentDescriptor) -> Result<Self> {
        let program_id = Pubkey::from_str(&descriptor.program_id).map_err(|e| {
            AppError::Config(format!("Invalid program id '{}': {}", descriptor.program_id, e))
        })?;

        let secret = &descriptor.record_secret_key;
        if secret.len() != 64 {
            return Err(AppError::Config(format!(
                "Expected 64 secret key bytes, got {}",
                secret.len()
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&secret[..32]);
        let record_keypair = Keypair::new_from_array(seed);

        if record_keypair.pubkey().to_bytes()[..] != secret[32..] {
            return Err(AppError::Config(
                "Record keypair public key does not match its seed".to_string(),
            ));
        }

        Ok(Self::new(program_id, record_keypair))
    }

    /// Fixed address of the record account.
    pub fn record_address(&self) -> Pubkey {
        self.record_keypair.pubkey()
    }

    /// Keypair that co-signs the record's creation.
    pub fn record_keypair(&self) -> &Keypair {
        &self.record_keypair
    }
}

/// Everything a component needs to know about the deployment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub program: Arc<ProgramConfig>,
}

impl AppConfig {
    pub fn new(network: NetworkConfig, program: ProgramConfig) -> Self {
        Self {
            network,
            program: Arc::new(program),
        }
    }

    /// Parse the deployment documents and pair them with `network`.
    pub fn from_documents(network: NetworkConfig, idl_json: &str, keypair_json: &str) -> Result<Self> {
        let descriptor = DeploymentDescriptor::from_json(idl_json, keypair_json)?;
        let program = ProgramConfig::from_descriptor(&descriptor)?;

        tracing::info!(
            "Rainbow program {} with record account {}",
            program.program_id,
            program.record_address()
        );

        Ok(Self::new(network, program))
    }
}
