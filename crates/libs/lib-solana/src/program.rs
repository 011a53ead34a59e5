//! # Rainbow Program Interface
//!
//! Client-side encoding of the two instructions the rainbow program exposes and
//! decoding of its single account type. The program is an Anchor program, so:
//!
//! - instruction data = `sha256("global:<snake_case_name>")[..8]` followed by the
//!   Borsh-encoded arguments
//! - account data = `sha256("account:<TypeName>")[..8]` followed by the Borsh-encoded
//!   struct (trailing allocation padding is ignored)
//!
//! ## Instructions
//!
//! | Instruction | Args | Accounts |
//! |---|---|---|
//! | `startStuffOff` | none | base_account (w, s), user (w, s), system_program |
//! | `addColor` | `color_code: String` | base_account (w), user (w, s) |

use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};
use thiserror::Error;

use lib_core::model::ColorEntry;

/// System program id (all zero bytes, base58 `11111111111111111111111111111111`).
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// `sha256("global:start_stuff_off")[..8]`
pub const START_STUFF_OFF_DISCRIMINATOR: [u8; 8] = [126, 54, 85, 33, 226, 32, 195, 32];

/// `sha256("global:add_color")[..8]`
pub const ADD_COLOR_DISCRIMINATOR: [u8; 8] = [13, 108, 0, 190, 118, 133, 3, 197];

/// `sha256("account:BaseAccount")[..8]`
pub const BASE_ACCOUNT_DISCRIMINATOR: [u8; 8] = [16, 90, 130, 242, 159, 10, 232, 133];

/// Account decoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgramError {
    #[error("Account data too short: {0} bytes")]
    TooShort(usize),

    #[error("Account discriminator mismatch")]
    Discriminator,

    #[error("Failed to deserialize account: {0}")]
    Deserialize(String),
}

/// One entry of the on-chain color list.
///
/// `user_address` is kept as raw bytes; Borsh lays a `Pubkey` out as 32 bytes.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemStruct {
    pub color_code: String,
    pub user_address: [u8; 32],
}

/// The record account.
#[derive(AnchorSerialize, AnchorDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseAccount {
    pub color_list: Vec<ItemStruct>,
}

impl BaseAccount {
    /// Decode account data, checking the Anchor discriminator.
    pub fn decode(data: &[u8]) -> Result<Self, ProgramError> {
        if data.len() < BASE_ACCOUNT_DISCRIMINATOR.len() {
            return Err(ProgramError::TooShort(data.len()));
        }

        let (discriminator, mut body) = data.split_at(BASE_ACCOUNT_DISCRIMINATOR.len());
        if discriminator != BASE_ACCOUNT_DISCRIMINATOR {
            return Err(ProgramError::Discriminator);
        }

        <BaseAccount as AnchorDeserialize>::deserialize(&mut body)
            .map_err(|e| ProgramError::Deserialize(e.to_string()))
    }

    /// Encode account data with its discriminator.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = BASE_ACCOUNT_DISCRIMINATOR.to_vec();
        // Writing into a Vec cannot fail
        let _ = AnchorSerialize::serialize(self, &mut data);
        data
    }

    /// Entries in on-chain order, submitters rendered as base58.
    pub fn into_entries(self) -> Vec<ColorEntry> {
        self.color_list
            .into_iter()
            .map(|item| {
                ColorEntry::new(
                    item.color_code,
                    Pubkey::new_from_array(item.user_address).to_string(),
                )
            })
            .collect()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize)]
struct AddColorArgs {
    color_code: String,
}

/// Build the `startStuffOff` instruction creating the record account.
pub fn start_stuff_off(program_id: &Pubkey, base_account: &Pubkey, user: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*base_account, true), // base_account (signer, writable)
            AccountMeta::new(*user, true),         // user (payer)
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: START_STUFF_OFF_DISCRIMINATOR.to_vec(),
    }
}

/// Build the `addColor` instruction appending `color_code` to the record.
pub fn add_color(
    program_id: &Pubkey,
    base_account: &Pubkey,
    user: &Pubkey,
    color_code: &str,
) -> Instruction {
    let mut data = ADD_COLOR_DISCRIMINATOR.to_vec();
    let args = AddColorArgs {
        color_code: color_code.to_string(),
    };
    let _ = AnchorSerialize::serialize(&args, &mut data);

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*base_account, false),
            AccountMeta::new(*user, true),
        ],
        data,
    }
}

/// Decoded instruction, as seen by the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RainbowInstruction {
    StartStuffOff,
    AddColor { color_code: String },
}

impl RainbowInstruction {
    /// Decode instruction data. Returns `None` for unknown discriminators.
    pub fn decode(data: &[u8]) -> Option<Self> {
        if data.len() < 8 {
            return None;
        }
        let (discriminator, mut args) = data.split_at(8);

        if discriminator == START_STUFF_OFF_DISCRIMINATOR {
            Some(RainbowInstruction::StartStuffOff)
        } else if discriminator == ADD_COLOR_DISCRIMINATOR {
            let args = <AddColorArgs as AnchorDeserialize>::deserialize(&mut args).ok()?;
            Some(RainbowInstruction::AddColor {
                color_code: args.color_code,
            })
        } else {
            None
        }
    }
}
