use solana_program::{decode_error::DecodeError, program_error::ProgramError};
use thiserror::Error;

use crate::state::RafflePhase;

/// Errors that may be returned by the raffle program
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaffleError {
    /// Invalid instruction data passed
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    /// Entry amount below the entrance fee
    #[error("Insufficient fee: sent {amount} lamports, entrance fee is {entrance_fee}")]
    InsufficientFee { amount: u64, entrance_fee: u64 },

    /// Entries are only accepted while the raffle is open
    #[error("Raffle is not open")]
    RaffleNotOpen,

    /// Upkeep was performed while the upkeep predicate was false
    #[error("Upkeep not needed (balance: {balance}, players: {player_count}, phase: {phase:?})")]
    UpkeepNotNeeded {
        balance: u64,
        player_count: u64,
        phase: RafflePhase,
    },

    /// The prize could not be delivered to the winner
    #[error("Transfer to winner failed")]
    TransferFailed,

    /// Fulfillment for a request that is not the pending one
    #[error("Unknown randomness request {0}")]
    UnknownRequest(u64),

    #[error("Fulfillment carried no random words")]
    MissingRandomWords,

    #[error("Raffle has no players")]
    NoPlayers,

    /// Player region of the raffle account is exhausted
    #[error("Raffle is full")]
    RaffleFull,

    #[error("Player index {index} out of range ({player_count} players)")]
    PlayerIndexOutOfRange { index: u64, player_count: u64 },

    /// Only the configured coordinator may deliver randomness
    #[error("Only the VRF coordinator can fulfill randomness requests")]
    OnlyCoordinatorCanFulfill,

    #[error("Invalid raffle configuration")]
    InvalidConfig,

    #[error("Raffle already initialized")]
    AlreadyInitialized,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl RaffleError {
    /// Stable code reported through `ProgramError::Custom`
    pub fn code(&self) -> u32 {
        match self {
            RaffleError::InvalidInstructionData => 0,
            RaffleError::InsufficientFee { .. } => 1,
            RaffleError::RaffleNotOpen => 2,
            RaffleError::UpkeepNotNeeded { .. } => 3,
            RaffleError::TransferFailed => 4,
            RaffleError::UnknownRequest(_) => 5,
            RaffleError::MissingRandomWords => 6,
            RaffleError::NoPlayers => 7,
            RaffleError::RaffleFull => 8,
            RaffleError::PlayerIndexOutOfRange { .. } => 9,
            RaffleError::OnlyCoordinatorCanFulfill => 10,
            RaffleError::InvalidConfig => 11,
            RaffleError::AlreadyInitialized => 12,
            RaffleError::ArithmeticOverflow => 13,
        }
    }
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e.code())
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upkeep_not_needed_keeps_diagnostics_in_message() {
        let err = RaffleError::UpkeepNotNeeded {
            balance: 3,
            player_count: 2,
            phase: RafflePhase::Calculating,
        };
        assert_eq!(
            err.to_string(),
            "Upkeep not needed (balance: 3, players: 2, phase: Calculating)"
        );
        assert_eq!(ProgramError::from(err), ProgramError::Custom(3));
    }
}
