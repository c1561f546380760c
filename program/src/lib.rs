// Keeper-driven raffle: fixed-fee entries, a draw every interval using
// verifiable randomness, the whole pool paid to the winner

// Program plumbing
pub mod error;
pub mod event;
pub mod instruction;
pub mod processor;
pub mod state;

// Round lifecycle
pub mod ledger;
pub mod payout;
pub mod raffle;
pub mod upkeep;

// Randomness oracle contract
pub mod vrf;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
