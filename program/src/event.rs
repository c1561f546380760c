use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, pubkey::Pubkey};

/// Notifications published by the raffle. Each is logged as a readable line
/// and as borsh-encoded program data for indexers.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleEvent {
    /// An entry was recorded
    RaffleEnter { player: Pubkey },
    /// A randomness request was issued for the current round
    RequestedRaffleWinner { request_id: u64 },
    /// The round was drawn and paid out
    WinnerPicked { winner: Pubkey },
}

impl RaffleEvent {
    pub fn emit(&self) {
        match self {
            RaffleEvent::RaffleEnter { player } => msg!("RaffleEnter: {}", player),
            RaffleEvent::RequestedRaffleWinner { request_id } => {
                msg!("RequestedRaffleWinner: {}", request_id)
            }
            RaffleEvent::WinnerPicked { winner } => msg!("WinnerPicked: {}", winner),
        }
        if let Ok(data) = borsh::to_vec(self) {
            sol_log_data(&[&data[..]]);
        }
    }
}
