//! # Application Configuration
//!
//! Network selection and the deployment descriptor. Both are read once at
//! startup into immutable values that are passed to the components that need
//! them; nothing here is stored in a global.
//!
//! ## Deployment Descriptor
//!
//! The descriptor is the pair of documents shipped with the front-end:
//!
//! - `idl.json`: the program's Anchor IDL. Only `metadata.address` (the program id)
//!   and the instruction names are read.
//! - `keypair.json`: the record account's keypair, as written by `@solana/web3.js`
//!   (`{"_keypair": {"secretKey": {"0": 12, "1": 200, ...}}}`) or as a plain
//!   64-byte array.
//!
//! ```rust
//! use lib_core::config::{DeploymentDescriptor, NetworkConfig};
//!
//! let network = NetworkConfig::default();
//! assert_eq!(network.endpoint(), "https://api.devnet.solana.com");
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Length of an ed25519 secret key as exported by Solana tooling (seed + public key).
pub const SECRET_KEY_LEN: usize = 64;

/// Instructions the client invokes; the IDL must declare both.
pub const REQUIRED_INSTRUCTIONS: [&str; 2] = ["startStuffOff", "addColor"];

/// Solana cluster selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Devnet,
    Testnet,
    Mainnet,
    /// Any other RPC endpoint (local validator, private node).
    Custom(String),
}

impl Cluster {
    /// Public RPC URL for the cluster.
    pub fn url(&self) -> &str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::Mainnet => "https://api.mainnet-beta.solana.com",
            Cluster::Custom(url) => url,
        }
    }
}

/// Ledger acknowledgment depth used for reads and transaction confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    #[default]
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    /// Name used on the JSON-RPC wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }

    /// Whether a signature status reported at `reached` satisfies this commitment.
    pub fn is_satisfied_by(&self, reached: Commitment) -> bool {
        reached.rank() >= self.rank()
    }

    fn rank(&self) -> u8 {
        match self {
            Commitment::Processed => 0,
            Commitment::Confirmed => 1,
            Commitment::Finalized => 2,
        }
    }
}

impl std::str::FromStr for Commitment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processed" => Ok(Commitment::Processed),
            "confirmed" => Ok(Commitment::Confirmed),
            "finalized" => Ok(Commitment::Finalized),
            other => Err(AppError::Config(format!("Unknown commitment level: {}", other))),
        }
    }
}

/// Fixed network configuration: which cluster, at which commitment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub cluster: Cluster,
    pub commitment: Commitment,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::Devnet,
            commitment: Commitment::Processed,
        }
    }
}

impl NetworkConfig {
    pub fn new(cluster: Cluster, commitment: Commitment) -> Self {
        Self { cluster, commitment }
    }

    /// RPC endpoint URL.
    pub fn endpoint(&self) -> String {
        self.cluster.url().to_string()
    }
}

// region:    --- Descriptor documents

#[derive(Deserialize)]
struct IdlDocument {
    #[serde(default)]
    instructions: Vec<IdlInstruction>,
    metadata: Option<IdlMetadata>,
}

#[derive(Deserialize)]
struct IdlInstruction {
    name: String,
}

#[derive(Deserialize)]
struct IdlMetadata {
    address: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeypairDocument {
    Raw(Vec<u8>),
    Web3 {
        #[serde(rename = "_keypair")]
        keypair: Web3Keypair,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Web3Keypair {
    secret_key: ByteList,
}

/// `Uint8Array` serialized either as an array or as an index → byte object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ByteList {
    Array(Vec<u8>),
    Indexed(BTreeMap<String, u8>),
}

impl ByteList {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            ByteList::Array(bytes) => Ok(bytes),
            ByteList::Indexed(map) => {
                // Keys arrive as strings; order them numerically
                let mut indexed = map
                    .into_iter()
                    .map(|(k, v)| {
                        k.parse::<usize>().map(|i| (i, v)).map_err(|_| {
                            AppError::Config(format!("Keypair secretKey index '{}' is not a number", k))
                        })
                    })
                    .collect::<Result<Vec<(usize, u8)>>>()?;
                indexed.sort_by_key(|(i, _)| *i);

                let contiguous = indexed.iter().enumerate().all(|(pos, (i, _))| *i == pos);
                if !contiguous {
                    return Err(AppError::Config(
                        "Keypair secretKey indices are not contiguous".to_string(),
                    ));
                }
                Ok(indexed.into_iter().map(|(_, v)| v).collect())
            }
        }
    }
}

// endregion: --- Descriptor documents

/// Program id and record keypair bytes, parsed from the deployment documents.
#[derive(Clone, PartialEq, Eq)]
pub struct DeploymentDescriptor {
    /// Base58 program id from `idl.json` `metadata.address`.
    pub program_id: String,
    /// 64-byte secret key of the record account (seed followed by public key).
    pub record_secret_key: Vec<u8>,
}

impl std::fmt::Debug for DeploymentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentDescriptor")
            .field("program_id", &self.program_id)
            .field("record_secret_key", &"<redacted>")
            .finish()
    }
}

impl DeploymentDescriptor {
    /// Parse the descriptor from the IDL and keypair JSON documents.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the IDL has no program address, lacks one of the
    /// instructions the client calls, or the keypair is not 64 bytes.
    pub fn from_json(idl_json: &str, keypair_json: &str) -> Result<Self> {
        let idl: IdlDocument = serde_json::from_str(idl_json)?;

        let program_id = idl
            .metadata
            .and_then(|m| m.address)
            .filter(|a| !a.trim().is_empty())
            .ok_or_else(|| AppError::Config("IDL is missing metadata.address".to_string()))?;

        for required in REQUIRED_INSTRUCTIONS {
            if !idl.instructions.iter().any(|ix| ix.name == required) {
                return Err(AppError::Config(format!(
                    "IDL does not declare the '{}' instruction",
                    required
                )));
            }
        }

        let keypair: KeypairDocument = serde_json::from_str(keypair_json)?;
        let record_secret_key = match keypair {
            KeypairDocument::Raw(bytes) => bytes,
            KeypairDocument::Web3 { keypair } => keypair.secret_key.into_bytes()?,
        };

        if record_secret_key.len() != SECRET_KEY_LEN {
            return Err(AppError::Config(format!(
                "Record secret key must be {} bytes, got {}",
                SECRET_KEY_LEN,
                record_secret_key.len()
            )));
        }

        tracing::debug!("Loaded deployment descriptor for program {}", program_id);

        Ok(Self {
            program_id,
            record_secret_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDL: &str = r#"{
        "version": "0.0.0",
        "name": "rainbow",
        "instructions": [{"name": "startStuffOff"}, {"name": "addColor"}],
        "metadata": {"address": "CX3B1Cy76tCXBWsf1njTHHvKivicW2NgPBATKp6Dqs82"}
    }"#;

    fn indexed_keypair_json() -> String {
        let entries: Vec<String> = (0..64).map(|i| format!("\"{}\": {}", i, i)).collect();
        format!(r#"{{"_keypair": {{"secretKey": {{{}}}}}}}"#, entries.join(","))
    }

    #[test]
    fn test_default_network_is_devnet_processed() {
        let network = NetworkConfig::default();
        assert_eq!(network.endpoint(), "https://api.devnet.solana.com");
        assert_eq!(network.commitment.as_str(), "processed");
    }

    #[test]
    fn test_custom_cluster_url() {
        let network = NetworkConfig::new(
            Cluster::Custom("http://127.0.0.1:8899".to_string()),
            Commitment::Confirmed,
        );
        assert_eq!(network.endpoint(), "http://127.0.0.1:8899");
    }

    #[test]
    fn test_commitment_ordering() {
        assert!(Commitment::Processed.is_satisfied_by(Commitment::Confirmed));
        assert!(Commitment::Confirmed.is_satisfied_by(Commitment::Finalized));
        assert!(!Commitment::Finalized.is_satisfied_by(Commitment::Processed));
        assert_eq!("confirmed".parse::<Commitment>().unwrap(), Commitment::Confirmed);
        assert!("eventually".parse::<Commitment>().is_err());
    }

    #[test]
    fn test_descriptor_from_indexed_keypair() {
        let descriptor = DeploymentDescriptor::from_json(IDL, &indexed_keypair_json()).unwrap();
        assert_eq!(descriptor.program_id, "CX3B1Cy76tCXBWsf1njTHHvKivicW2NgPBATKp6Dqs82");
        // Numeric ordering, not lexicographic ("10" after "9")
        assert_eq!(descriptor.record_secret_key, (0..64).collect::<Vec<u8>>());
    }

    #[test]
    fn test_descriptor_from_array_keypair() {
        let keypair = serde_json::to_string(&vec![7u8; 64]).unwrap();
        let descriptor = DeploymentDescriptor::from_json(IDL, &keypair).unwrap();
        assert_eq!(descriptor.record_secret_key.len(), SECRET_KEY_LEN);
    }

    #[test]
    fn test_descriptor_rejects_short_key() {
        let keypair = serde_json::to_string(&vec![7u8; 32]).unwrap();
        let err = DeploymentDescriptor::from_json(IDL, &keypair).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_descriptor_requires_program_address() {
        let idl = r#"{"instructions": [{"name": "startStuffOff"}, {"name": "addColor"}]}"#;
        let keypair = serde_json::to_string(&vec![7u8; 64]).unwrap();
        let err = DeploymentDescriptor::from_json(idl, &keypair).unwrap_err();
        assert_eq!(err, AppError::Config("IDL is missing metadata.address".to_string()));
    }

    #[test]
    fn test_descriptor_requires_instructions() {
        let idl = r#"{"instructions": [{"name": "addColor"}], "metadata": {"address": "x"}}"#;
        let keypair = serde_json::to_string(&vec![7u8; 64]).unwrap();
        let err = DeploymentDescriptor::from_json(idl, &keypair).unwrap_err();
        assert!(err.to_string().contains("startStuffOff"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let keypair = serde_json::to_string(&vec![7u8; 64]).unwrap();
        let descriptor = DeploymentDescriptor::from_json(IDL, &keypair).unwrap();
        assert!(format!("{:?}", descriptor).contains("<redacted>"));
    }
}
