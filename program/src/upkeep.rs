use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, msg};

use crate::state::{Raffle, RafflePhase};

/// Conditions that together decide whether a draw should be requested
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    /// At least `interval` seconds since the round started
    pub time_passed: bool,
    pub is_open: bool,
    pub has_balance: bool,
    pub has_players: bool,
}

impl UpkeepCheck {
    pub fn needed(&self) -> bool {
        self.time_passed && self.is_open && self.has_balance && self.has_players
    }

    pub fn log(&self) {
        msg!(
            "Upkeep needed: {} (time passed: {}, open: {}, balance: {}, players: {})",
            self.needed(),
            self.time_passed,
            self.is_open,
            self.has_balance,
            self.has_players
        );
    }
}

/// Answer to `CheckUpkeep`, published as return data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpkeepResult {
    pub upkeep_needed: bool,
    pub perform_data: Vec<u8>,
}

impl Raffle {
    /// Evaluate the upkeep predicate at `now`. Has no side effects.
    pub fn check_upkeep(&self, now: UnixTimestamp) -> UpkeepCheck {
        // A clock behind the round start never counts as elapsed.
        let elapsed = now.checked_sub(self.last_timestamp).unwrap_or(i64::MIN);
        let time_passed = i64::try_from(self.config.interval)
            .map(|interval| elapsed >= interval)
            .unwrap_or(false);

        UpkeepCheck {
            time_passed,
            is_open: self.phase == RafflePhase::Open,
            has_balance: self.balance > 0,
            has_players: !self.players.is_empty(),
        }
    }
}
