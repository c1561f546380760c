//! Round lifecycle: `Open` until upkeep requests randomness, `Calculating`
//! until the matching fulfillment draws, pays and reopens the round.
//!
//! Every transition runs against `&mut Raffle`, so the whole aggregate is
//! held exclusively from the precondition check to the commit. On chain the
//! raffle account's write lock provides the same exclusion between
//! instructions.

use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};

use crate::{
    error::RaffleError,
    event::RaffleEvent,
    payout::PayoutExecutor,
    state::{PendingRequest, Raffle, RafflePhase},
    vrf::{winner_index, RandomWordsRequest, RandomnessOracle},
};

impl Raffle {
    /// Move the round to `Calculating` and request randomness for it.
    ///
    /// The upkeep predicate is evaluated again here; a keeper acting on a
    /// stale `check_upkeep` answer gets `UpkeepNotNeeded` and nothing changes.
    pub fn perform_upkeep<O: RandomnessOracle>(
        &mut self,
        now: UnixTimestamp,
        consumer: Pubkey,
        oracle: &mut O,
    ) -> Result<RaffleEvent, RaffleError> {
        let check = self.check_upkeep(now);
        if !check.needed() {
            check.log();
            return Err(RaffleError::UpkeepNotNeeded {
                balance: self.balance,
                player_count: self.player_count(),
                phase: self.phase,
            });
        }

        let request_nonce = self
            .request_nonce
            .checked_add(1)
            .ok_or(RaffleError::ArithmeticOverflow)?;
        let request = RandomWordsRequest::new(&self.config, consumer, self.request_nonce);
        let request_id = oracle.request_random_words(&request)?;

        self.phase = RafflePhase::Calculating;
        self.pending_request = Some(PendingRequest {
            request_id,
            round: self.round,
        });
        self.request_nonce = request_nonce;

        Ok(RaffleEvent::RequestedRaffleWinner { request_id })
    }

    /// Draw the winner of the pending round, pay out the pool and reopen.
    ///
    /// The next round is prepared on a copy and committed only after the
    /// payout succeeded. On `TransferFailed` the round, its players, balance
    /// and pending request stay exactly as they were.
    pub fn fulfill_random_words<P: PayoutExecutor>(
        &mut self,
        request_id: u64,
        random_words: &[u64],
        now: UnixTimestamp,
        payout: &mut P,
    ) -> Result<RaffleEvent, RaffleError> {
        let pending = match self.pending_request {
            Some(pending) if pending.request_id == request_id => pending,
            _ => {
                msg!("Fulfillment for request {} is not pending", request_id);
                return Err(RaffleError::UnknownRequest(request_id));
            }
        };
        debug_assert_eq!(self.phase, RafflePhase::Calculating);
        debug_assert_eq!(pending.round, self.round);

        let random_word = *random_words
            .first()
            .ok_or(RaffleError::MissingRandomWords)?;
        let index = winner_index(random_word, self.player_count())?;
        let winner = self.get_player(index)?;
        let prize = self.balance;
        msg!(
            "Round {}: word {} selects entry {} of {}",
            pending.round,
            random_word,
            index,
            self.player_count()
        );

        let mut next = self.clone();
        next.reset();
        next.phase = RafflePhase::Open;
        next.last_timestamp = now;
        next.balance = 0;
        next.recent_winner = Some(winner);
        next.pending_request = None;
        next.round = self
            .round
            .checked_add(1)
            .ok_or(RaffleError::ArithmeticOverflow)?;

        if !payout.pay(&winner, prize) {
            return Err(RaffleError::TransferFailed);
        }
        *self = next;

        Ok(RaffleEvent::WinnerPicked { winner })
    }
}
