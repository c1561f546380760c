use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    clock::UnixTimestamp,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};

use crate::error::RaffleError;
use crate::vrf::{
    MAX_CALLBACK_GAS_LIMIT, MAX_NUM_WORDS, MAX_REQUEST_CONFIRMATIONS, MIN_REQUEST_CONFIRMATIONS,
};

/// Player slots reserved in a raffle account. Keeps the account below the
/// 10 KiB limit for accounts created through CPI.
pub const MAX_PLAYERS: usize = 300;

const CONFIG_LEN: usize = 8 + 8 + 32 + 32 + 8 + 2 + 4 + 4 + 1;
const HEADER_LEN: usize = 1 + CONFIG_LEN + 1 + 8 + 8 + 1 + 32 + 1 + 8 + 8 + 8 + 8 + 8;
const PLAYER_LEN: usize = 32;

/// Phase of the current round
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum RafflePhase {
    /// Accepting entries
    Open,
    /// Waiting for the randomness fulfillment, entries blocked
    Calculating,
}

impl TryFrom<u8> for RafflePhase {
    type Error = &'static str;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        match val {
            0 => Ok(RafflePhase::Open),
            1 => Ok(RafflePhase::Calculating),
            _ => Err("Invalid raffle phase"),
        }
    }
}

impl From<RafflePhase> for u8 {
    fn from(phase: RafflePhase) -> Self {
        match phase {
            RafflePhase::Open => 0,
            RafflePhase::Calculating => 1,
        }
    }
}

/// Raffle configuration, fixed when the raffle account is created
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct RaffleConfig {
    /// Minimum lamports accepted per entry
    pub entrance_fee: u64,
    /// Minimum seconds between the start of a round and its draw
    pub interval: u64,
    /// Key that must sign randomness fulfillments
    pub vrf_coordinator: Pubkey,
    /// Oracle key hash the request is made against
    pub key_hash: [u8; 32],
    /// Oracle subscription billed for requests
    pub subscription_id: u64,
    /// Confirmations the oracle waits before answering
    pub request_confirmations: u16,
    /// Compute limit for the fulfillment callback
    pub callback_gas_limit: u32,
    /// Random words requested per draw
    pub num_words: u32,
    /// Pay the oracle in the native currency instead of the subscription token
    pub native_payment: bool,
}

impl RaffleConfig {
    /// Reject configurations the oracle would refuse or the state machine
    /// cannot use
    pub fn validate(&self) -> Result<(), RaffleError> {
        if self.num_words == 0 || self.num_words > MAX_NUM_WORDS {
            return Err(RaffleError::InvalidConfig);
        }
        if self.request_confirmations < MIN_REQUEST_CONFIRMATIONS
            || self.request_confirmations > MAX_REQUEST_CONFIRMATIONS
        {
            return Err(RaffleError::InvalidConfig);
        }
        if self.callback_gas_limit > MAX_CALLBACK_GAS_LIMIT {
            return Err(RaffleError::InvalidConfig);
        }
        if i64::try_from(self.interval).is_err() {
            return Err(RaffleError::InvalidConfig);
        }
        Ok(())
    }
}

impl Sealed for RaffleConfig {}

impl Pack for RaffleConfig {
    const LEN: usize = CONFIG_LEN;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, CONFIG_LEN];
        let (
            entrance_fee,
            interval,
            vrf_coordinator,
            key_hash,
            subscription_id,
            request_confirmations,
            callback_gas_limit,
            num_words,
            native_payment,
        ) = array_refs![src, 8, 8, 32, 32, 8, 2, 4, 4, 1];

        Ok(RaffleConfig {
            entrance_fee: u64::from_le_bytes(*entrance_fee),
            interval: u64::from_le_bytes(*interval),
            vrf_coordinator: Pubkey::new_from_array(*vrf_coordinator),
            key_hash: *key_hash,
            subscription_id: u64::from_le_bytes(*subscription_id),
            request_confirmations: u16::from_le_bytes(*request_confirmations),
            callback_gas_limit: u32::from_le_bytes(*callback_gas_limit),
            num_words: u32::from_le_bytes(*num_words),
            native_payment: native_payment[0] != 0,
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, CONFIG_LEN];
        let (
            entrance_fee_dst,
            interval_dst,
            vrf_coordinator_dst,
            key_hash_dst,
            subscription_id_dst,
            request_confirmations_dst,
            callback_gas_limit_dst,
            num_words_dst,
            native_payment_dst,
        ) = mut_array_refs![dst, 8, 8, 32, 32, 8, 2, 4, 4, 1];

        *entrance_fee_dst = self.entrance_fee.to_le_bytes();
        *interval_dst = self.interval.to_le_bytes();
        vrf_coordinator_dst.copy_from_slice(self.vrf_coordinator.as_ref());
        *key_hash_dst = self.key_hash;
        *subscription_id_dst = self.subscription_id.to_le_bytes();
        *request_confirmations_dst = self.request_confirmations.to_le_bytes();
        *callback_gas_limit_dst = self.callback_gas_limit.to_le_bytes();
        *num_words_dst = self.num_words.to_le_bytes();
        native_payment_dst[0] = self.native_payment as u8;
    }
}

/// Outstanding randomness request and the round it was issued for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    pub request_id: u64,
    pub round: u64,
}

/// Raffle account data: configuration plus the state of the current round
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    pub(crate) is_initialized: bool,
    pub(crate) config: RaffleConfig,
    pub(crate) phase: RafflePhase,
    /// Start of the current round
    pub(crate) last_timestamp: UnixTimestamp,
    /// Pooled lamports owed to the next winner, excluding rent
    pub(crate) balance: u64,
    pub(crate) recent_winner: Option<Pubkey>,
    /// Set iff phase is `Calculating`
    pub(crate) pending_request: Option<PendingRequest>,
    /// Randomness requests issued so far, feeds request id derivation
    pub(crate) request_nonce: u64,
    /// Completed rounds
    pub(crate) round: u64,
    /// Entries of the current round in entry order
    pub(crate) players: Vec<Pubkey>,
}

impl Raffle {
    /// Open the first round at `now`
    pub fn new(config: RaffleConfig, now: UnixTimestamp) -> Self {
        Self {
            is_initialized: true,
            config,
            phase: RafflePhase::Open,
            last_timestamp: now,
            balance: 0,
            recent_winner: None,
            pending_request: None,
            request_nonce: 0,
            round: 0,
            players: Vec::new(),
        }
    }

    pub fn config(&self) -> &RaffleConfig {
        &self.config
    }

    pub fn entrance_fee(&self) -> u64 {
        self.config.entrance_fee
    }

    pub fn interval(&self) -> u64 {
        self.config.interval
    }

    pub fn num_words(&self) -> u32 {
        self.config.num_words
    }

    pub fn request_confirmations(&self) -> u16 {
        self.config.request_confirmations
    }

    pub fn subscription_id(&self) -> u64 {
        self.config.subscription_id
    }

    pub fn phase(&self) -> RafflePhase {
        self.phase
    }

    pub fn last_timestamp(&self) -> UnixTimestamp {
        self.last_timestamp
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn recent_winner(&self) -> Option<Pubkey> {
        self.recent_winner
    }

    pub fn pending_request(&self) -> Option<PendingRequest> {
        self.pending_request
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn players(&self) -> &[Pubkey] {
        &self.players
    }

    pub fn player_count(&self) -> u64 {
        self.players.len() as u64
    }

    /// Player at `index` in entry order
    pub fn get_player(&self, index: u64) -> Result<Pubkey, RaffleError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.players.get(i))
            .copied()
            .ok_or(RaffleError::PlayerIndexOutOfRange {
                index,
                player_count: self.player_count(),
            })
    }
}

impl Sealed for Raffle {}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for Raffle {
    const LEN: usize = HEADER_LEN + MAX_PLAYERS * PLAYER_LEN;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let header = array_ref![src, 0, HEADER_LEN];
        let (
            is_initialized,
            config,
            phase,
            last_timestamp,
            balance,
            has_recent_winner,
            recent_winner,
            has_pending_request,
            pending_request_id,
            pending_round,
            request_nonce,
            round,
            player_count,
        ) = array_refs![header, 1, CONFIG_LEN, 1, 8, 8, 1, 32, 1, 8, 8, 8, 8, 8];

        let phase = match RafflePhase::try_from(phase[0]) {
            Ok(phase) => phase,
            Err(_) => return Err(ProgramError::InvalidAccountData),
        };

        let player_count = usize::try_from(u64::from_le_bytes(*player_count))
            .map_err(|_| ProgramError::InvalidAccountData)?;
        if player_count > MAX_PLAYERS {
            return Err(ProgramError::InvalidAccountData);
        }
        let players = src[HEADER_LEN..]
            .chunks_exact(PLAYER_LEN)
            .take(player_count)
            .map(|slot| Pubkey::new_from_array(*array_ref![slot, 0, PLAYER_LEN]))
            .collect();

        Ok(Raffle {
            is_initialized: is_initialized[0] != 0,
            config: RaffleConfig::unpack_from_slice(config)?,
            phase,
            last_timestamp: UnixTimestamp::from_le_bytes(*last_timestamp),
            balance: u64::from_le_bytes(*balance),
            recent_winner: (has_recent_winner[0] != 0)
                .then(|| Pubkey::new_from_array(*recent_winner)),
            pending_request: (has_pending_request[0] != 0).then(|| PendingRequest {
                request_id: u64::from_le_bytes(*pending_request_id),
                round: u64::from_le_bytes(*pending_round),
            }),
            request_nonce: u64::from_le_bytes(*request_nonce),
            round: u64::from_le_bytes(*round),
            players,
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let (header, players_dst) = dst.split_at_mut(HEADER_LEN);
        let header = array_mut_ref![header, 0, HEADER_LEN];
        let (
            is_initialized_dst,
            config_dst,
            phase_dst,
            last_timestamp_dst,
            balance_dst,
            has_recent_winner_dst,
            recent_winner_dst,
            has_pending_request_dst,
            pending_request_id_dst,
            pending_round_dst,
            request_nonce_dst,
            round_dst,
            player_count_dst,
        ) = mut_array_refs![header, 1, CONFIG_LEN, 1, 8, 8, 1, 32, 1, 8, 8, 8, 8, 8];

        is_initialized_dst[0] = self.is_initialized as u8;
        self.config.pack_into_slice(config_dst);
        phase_dst[0] = self.phase.into();
        *last_timestamp_dst = self.last_timestamp.to_le_bytes();
        *balance_dst = self.balance.to_le_bytes();

        has_recent_winner_dst[0] = self.recent_winner.is_some() as u8;
        recent_winner_dst.copy_from_slice(self.recent_winner.unwrap_or_default().as_ref());

        let pending = self.pending_request.unwrap_or(PendingRequest {
            request_id: 0,
            round: 0,
        });
        has_pending_request_dst[0] = self.pending_request.is_some() as u8;
        *pending_request_id_dst = pending.request_id.to_le_bytes();
        *pending_round_dst = pending.round.to_le_bytes();

        *request_nonce_dst = self.request_nonce.to_le_bytes();
        *round_dst = self.round.to_le_bytes();
        *player_count_dst = (self.players.len() as u64).to_le_bytes();

        // Stale slots from the previous round are zeroed.
        players_dst.fill(0);
        for (slot, player) in players_dst
            .chunks_exact_mut(PLAYER_LEN)
            .zip(self.players.iter())
        {
            slot.copy_from_slice(player.as_ref());
        }
    }
}
