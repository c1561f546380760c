use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::{error::RaffleError, state::RaffleConfig};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Create the raffle account and open the first round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer funding the raffle account
    /// 1. `[signer, writable]` The raffle account, must not exist yet
    /// 2. `[]` System program
    InitializeRaffle { config: RaffleConfig },

    /// Enter the current round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The participant paying the entry
    /// 1. `[writable]` The raffle account
    /// 2. `[]` System program
    EnterRaffle {
        /// Lamports to pay in, at least the entrance fee
        amount: u64,
    },

    /// Report whether a draw should be requested, as return data
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckUpkeep { check_data: Vec<u8> },

    /// Close the round and request randomness (anyone may call)
    ///
    /// Accounts expected:
    /// 0. `[writable]` The raffle account
    PerformUpkeep { perform_data: Vec<u8> },

    /// Deliver randomness for the pending request, pay the winner and reopen
    ///
    /// Accounts expected:
    /// 0. `[signer]` The VRF coordinator
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` The selected winner
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<u64>,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| RaffleError::InvalidInstructionData.into())
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        borsh::to_vec(self).map_err(|_| RaffleError::InvalidInstructionData.into())
    }
}

/// Create initialize_raffle instruction
pub fn initialize_raffle(
    program_id: &Pubkey,
    payer: &Pubkey,
    raffle_account: &Pubkey,
    config: RaffleConfig,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::InitializeRaffle { config }.pack()?;

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(*raffle_account, true),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create enter_raffle instruction
pub fn enter_raffle(
    program_id: &Pubkey,
    participant: &Pubkey,
    raffle_account: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::EnterRaffle { amount }.pack()?;

    let accounts = vec![
        AccountMeta::new(*participant, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create check_upkeep instruction
pub fn check_upkeep(
    program_id: &Pubkey,
    raffle_account: &Pubkey,
    check_data: Vec<u8>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::CheckUpkeep { check_data }.pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*raffle_account, false)],
        data,
    })
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    raffle_account: &Pubkey,
    perform_data: Vec<u8>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::PerformUpkeep { perform_data }.pack()?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new(*raffle_account, false)],
        data,
    })
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    coordinator: &Pubkey,
    raffle_account: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_words: Vec<u64>,
) -> Result<Instruction, ProgramError> {
    let data = RaffleInstruction::FulfillRandomWords {
        request_id,
        random_words,
    }
    .pack()?;

    let accounts = vec![
        AccountMeta::new_readonly(*coordinator, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
