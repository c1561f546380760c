// Randomness oracle contract consumed by the raffle
use arrayref::array_ref;
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{hash::hashv, log::sol_log_data, msg, pubkey::Pubkey};

use crate::{error::RaffleError, state::RaffleConfig};

pub const MIN_REQUEST_CONFIRMATIONS: u16 = 3;
pub const MAX_REQUEST_CONFIRMATIONS: u16 = 200;
pub const MAX_CALLBACK_GAS_LIMIT: u32 = 2_500_000;
pub const MAX_NUM_WORDS: u32 = 500;

/// Leading tag of version 1 extra args
pub const EXTRA_ARGS_V1_TAG: [u8; 4] = [0x92, 0xfd, 0x13, 0x38];

/// Optional request arguments appended after the tag
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtraArgsV1 {
    pub native_payment: bool,
}

impl ExtraArgsV1 {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = EXTRA_ARGS_V1_TAG.to_vec();
        buf.push(self.native_payment as u8);
        buf
    }
}

/// Request record handed to the oracle
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RandomWordsRequest {
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
    pub extra_args: Vec<u8>,
    /// Raffle account the fulfillment is addressed to
    pub consumer: Pubkey,
    pub nonce: u64,
}

impl RandomWordsRequest {
    pub fn new(config: &RaffleConfig, consumer: Pubkey, nonce: u64) -> Self {
        Self {
            key_hash: config.key_hash,
            subscription_id: config.subscription_id,
            request_confirmations: config.request_confirmations,
            callback_gas_limit: config.callback_gas_limit,
            num_words: config.num_words,
            extra_args: ExtraArgsV1 {
                native_payment: config.native_payment,
            }
            .encode(),
            consumer,
            nonce,
        }
    }

    /// Identifier derived from key hash, consumer, subscription and nonce,
    /// so that every request from one consumer gets a distinct id
    pub fn request_id(&self) -> u64 {
        let hash = hashv(&[
            &self.key_hash[..],
            self.consumer.as_ref(),
            &self.subscription_id.to_le_bytes()[..],
            &self.nonce.to_le_bytes()[..],
        ])
        .to_bytes();
        u64::from_le_bytes(*array_ref![hash, 0, 8])
    }
}

/// Source of verifiable randomness. A request returns immediately with an
/// id; the random words arrive later in a separate fulfillment.
pub trait RandomnessOracle {
    fn request_random_words(&mut self, request: &RandomWordsRequest) -> Result<u64, RaffleError>;
}

/// Publishes requests in the program log, where the off-chain coordinator
/// picks them up and answers with a signed `FulfillRandomWords`.
#[derive(Debug, Default)]
pub struct LogCoordinator;

impl RandomnessOracle for LogCoordinator {
    fn request_random_words(&mut self, request: &RandomWordsRequest) -> Result<u64, RaffleError> {
        let request_id = request.request_id();
        msg!(
            "Requesting {} random words: request {}, subscription {}, {} confirmations",
            request.num_words,
            request_id,
            request.subscription_id,
            request.request_confirmations
        );
        if let Ok(record) = borsh::to_vec(request) {
            sol_log_data(&[
                &b"RandomWordsRequested"[..],
                &request_id.to_le_bytes()[..],
                &record[..],
            ]);
        }
        Ok(request_id)
    }
}

/// Index of the winning entry: first random word modulo the entry count
pub fn winner_index(random_word: u64, player_count: u64) -> Result<u64, RaffleError> {
    if player_count == 0 {
        return Err(RaffleError::NoPlayers);
    }
    Ok(random_word % player_count)
}
