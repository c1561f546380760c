use solana_program::{msg, pubkey::Pubkey};

use crate::{
    error::RaffleError,
    event::RaffleEvent,
    state::{Raffle, RafflePhase, MAX_PLAYERS},
};

impl Raffle {
    /// Record an entry of `amount` lamports for `participant`.
    ///
    /// A participant may enter any number of times; each entry is one more
    /// slot in the draw. The caller moves the lamports only after this
    /// returns `Ok`.
    pub fn enter(&mut self, participant: Pubkey, amount: u64) -> Result<RaffleEvent, RaffleError> {
        if amount < self.config.entrance_fee {
            msg!(
                "Entry of {} lamports below entrance fee {}",
                amount,
                self.config.entrance_fee
            );
            return Err(RaffleError::InsufficientFee {
                amount,
                entrance_fee: self.config.entrance_fee,
            });
        }
        if self.phase != RafflePhase::Open {
            return Err(RaffleError::RaffleNotOpen);
        }
        if self.players.len() >= MAX_PLAYERS {
            return Err(RaffleError::RaffleFull);
        }

        let balance = self
            .balance
            .checked_add(amount)
            .ok_or(RaffleError::ArithmeticOverflow)?;
        self.players.push(participant);
        self.balance = balance;

        Ok(RaffleEvent::RaffleEnter {
            player: participant,
        })
    }

    /// Drop every entry of the finished round
    pub(crate) fn reset(&mut self) {
        self.players.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::test_config;

    #[test]
    fn rejects_amount_below_entrance_fee() {
        let mut raffle = Raffle::new(test_config(10, 60), 0);
        for amount in [0, 1, 9] {
            assert_eq!(
                raffle.enter(Pubkey::new_unique(), amount),
                Err(RaffleError::InsufficientFee {
                    amount,
                    entrance_fee: 10
                })
            );
        }
        assert_eq!(raffle.player_count(), 0);
        assert_eq!(raffle.balance(), 0);
    }

    #[test]
    fn records_entries_in_order_and_pools_the_full_amount() {
        let mut raffle = Raffle::new(test_config(10, 60), 0);
        let players: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();

        for (i, player) in players.iter().enumerate() {
            let event = raffle.enter(*player, 10 + i as u64).unwrap();
            assert_eq!(event, RaffleEvent::RaffleEnter { player: *player });
        }

        assert_eq!(raffle.player_count(), 5);
        assert_eq!(raffle.players(), players.as_slice());
        assert_eq!(raffle.balance(), 10 + 11 + 12 + 13 + 14);
    }

    #[test]
    fn repeat_entries_are_kept() {
        let mut raffle = Raffle::new(test_config(1, 60), 0);
        let player = Pubkey::new_unique();
        raffle.enter(player, 1).unwrap();
        raffle.enter(player, 1).unwrap();

        assert_eq!(raffle.players(), &[player, player]);
    }

    #[test]
    fn rejects_entries_while_calculating() {
        let mut raffle = Raffle::new(test_config(1, 60), 0);
        raffle.enter(Pubkey::new_unique(), 1).unwrap();
        raffle.phase = RafflePhase::Calculating;

        assert_eq!(
            raffle.enter(Pubkey::new_unique(), 1),
            Err(RaffleError::RaffleNotOpen)
        );
        assert_eq!(raffle.player_count(), 1);
        assert_eq!(raffle.balance(), 1);
    }

    #[test]
    fn fee_is_checked_before_phase() {
        let mut raffle = Raffle::new(test_config(5, 60), 0);
        raffle.phase = RafflePhase::Calculating;

        assert!(matches!(
            raffle.enter(Pubkey::new_unique(), 1),
            Err(RaffleError::InsufficientFee { .. })
        ));
    }

    #[test]
    fn rejects_entries_once_player_region_is_full() {
        let mut raffle = Raffle::new(test_config(1, 60), 0);
        raffle.players = vec![Pubkey::new_unique(); MAX_PLAYERS];

        assert_eq!(
            raffle.enter(Pubkey::new_unique(), 1),
            Err(RaffleError::RaffleFull)
        );
        assert_eq!(raffle.balance(), 0);
    }

    #[test]
    fn balance_overflow_leaves_round_untouched() {
        let mut raffle = Raffle::new(test_config(1, 60), 0);
        raffle.enter(Pubkey::new_unique(), u64::MAX).unwrap();

        assert_eq!(
            raffle.enter(Pubkey::new_unique(), 1),
            Err(RaffleError::ArithmeticOverflow)
        );
        assert_eq!(raffle.player_count(), 1);
    }

    #[test]
    fn reset_clears_entries() {
        let mut raffle = Raffle::new(test_config(1, 60), 0);
        raffle.enter(Pubkey::new_unique(), 1).unwrap();
        raffle.reset();

        assert_eq!(raffle.player_count(), 0);
    }
}
