use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, set_return_data},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
    sysvar::Sysvar,
};

use crate::{
    error::RaffleError,
    instruction::RaffleInstruction,
    payout::LamportPayout,
    state::{Raffle, RaffleConfig},
    upkeep::UpkeepResult,
    vrf::LogCoordinator,
};

/// Program state handler.
pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeRaffle { config } => {
                msg!("Instruction: Initialize Raffle");
                Self::process_initialize_raffle(program_id, accounts, config)
            }
            RaffleInstruction::EnterRaffle { amount } => {
                msg!("Instruction: Enter Raffle");
                Self::process_enter_raffle(program_id, accounts, amount)
            }
            RaffleInstruction::CheckUpkeep { check_data } => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(program_id, accounts, check_data)
            }
            RaffleInstruction::PerformUpkeep { perform_data } => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(program_id, accounts, perform_data)
            }
            RaffleInstruction::FulfillRandomWords {
                request_id,
                random_words,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(program_id, accounts, request_id, &random_words)
            }
        }
    }

    /// Process InitializeRaffle instruction
    fn process_initialize_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        config: RaffleConfig,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer || !raffle_info.is_signer {
            msg!("Payer and raffle account must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        if *system_program_info.key != system_program::id() {
            return Err(ProgramError::IncorrectProgramId);
        }
        if raffle_info.owner == program_id {
            msg!("Raffle account {} already exists", raffle_info.key);
            return Err(Self::fail(RaffleError::AlreadyInitialized));
        }
        config.validate().map_err(Self::fail)?;

        let rent = Rent::get()?;
        invoke(
            &system_instruction::create_account(
                payer_info.key,
                raffle_info.key,
                rent.minimum_balance(Raffle::LEN),
                Raffle::LEN as u64,
                program_id,
            ),
            &[
                payer_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        let now = Clock::get()?.unix_timestamp;
        Raffle::pack(Raffle::new(config, now), &mut raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle {} opened: entrance fee {} lamports, interval {}s",
            raffle_info.key,
            config.entrance_fee,
            config.interval
        );
        Ok(())
    }

    /// Process EnterRaffle instruction
    fn process_enter_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let participant_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !participant_info.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        let mut raffle = Self::load_raffle(program_id, raffle_info, true)?;

        let event = raffle
            .enter(*participant_info.key, amount)
            .map_err(Self::fail)?;

        invoke(
            &system_instruction::transfer(participant_info.key, raffle_info.key, amount),
            &[
                participant_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    /// Process CheckUpkeep instruction
    fn process_check_upkeep(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        _check_data: Vec<u8>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        let raffle = Self::load_raffle(program_id, raffle_info, false)?;
        let check = raffle.check_upkeep(Clock::get()?.unix_timestamp);
        check.log();

        let result = UpkeepResult {
            upkeep_needed: check.needed(),
            perform_data: Vec::new(),
        };
        let data =
            borsh::to_vec(&result).map_err(|_| ProgramError::BorshIoError("upkeep result".into()))?;
        set_return_data(&data);
        Ok(())
    }

    /// Process PerformUpkeep instruction
    fn process_perform_upkeep(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        _perform_data: Vec<u8>,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        let mut raffle = Self::load_raffle(program_id, raffle_info, true)?;
        let now = Clock::get()?.unix_timestamp;

        let event = raffle
            .perform_upkeep(now, *raffle_info.key, &mut LogCoordinator)
            .map_err(Self::fail)?;

        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    /// Process FulfillRandomWords instruction
    fn process_fulfill_random_words(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        request_id: u64,
        random_words: &[u64],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let coordinator_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        let mut raffle = Self::load_raffle(program_id, raffle_info, true)?;

        if !coordinator_info.is_signer || *coordinator_info.key != raffle.config().vrf_coordinator {
            return Err(Self::fail(RaffleError::OnlyCoordinatorCanFulfill));
        }

        let now = Clock::get()?.unix_timestamp;
        let reserve = Rent::get()?.minimum_balance(raffle_info.data_len());
        let mut payout = LamportPayout::new(raffle_info, winner_info, reserve);

        let event = raffle
            .fulfill_random_words(request_id, random_words, now, &mut payout)
            .map_err(Self::fail)?;

        Raffle::pack(raffle, &mut raffle_info.data.borrow_mut())?;
        event.emit();
        Ok(())
    }

    /// Unpack the raffle account after checking ownership
    fn load_raffle(
        program_id: &Pubkey,
        raffle_info: &AccountInfo,
        writable: bool,
    ) -> Result<Raffle, ProgramError> {
        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }
        if writable && !raffle_info.is_writable {
            msg!("Raffle account must be writable");
            return Err(ProgramError::InvalidAccountData);
        }
        let raffle = Raffle::unpack(&raffle_info.data.borrow())?;
        Ok(raffle)
    }

    /// Log a raffle error and convert it for the runtime
    fn fail(error: RaffleError) -> ProgramError {
        msg!("Error: {}", error);
        error.into()
    }
}
