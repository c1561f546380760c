use solana_program::{account_info::AccountInfo, msg, pubkey::Pubkey};

/// Delivers the prize. Reports failure instead of retrying.
pub trait PayoutExecutor {
    fn pay(&mut self, recipient: &Pubkey, amount: u64) -> bool;
}

/// Moves lamports out of the program-owned raffle account
pub struct LamportPayout<'a, 'b> {
    vault: &'a AccountInfo<'b>,
    recipient: &'a AccountInfo<'b>,
    /// Lamports the vault must keep to stay rent exempt
    reserve: u64,
}

impl<'a, 'b> LamportPayout<'a, 'b> {
    pub fn new(vault: &'a AccountInfo<'b>, recipient: &'a AccountInfo<'b>, reserve: u64) -> Self {
        Self {
            vault,
            recipient,
            reserve,
        }
    }
}

impl PayoutExecutor for LamportPayout<'_, '_> {
    fn pay(&mut self, recipient: &Pubkey, amount: u64) -> bool {
        if self.recipient.key != recipient {
            msg!(
                "Recipient account {} is not the winner {}",
                self.recipient.key,
                recipient
            );
            return false;
        }
        if !self.recipient.is_writable {
            msg!("Winner account must be writable");
            return false;
        }

        let remaining = match self.vault.lamports().checked_sub(amount) {
            Some(remaining) if remaining >= self.reserve => remaining,
            _ => {
                msg!("Raffle account cannot cover a prize of {} lamports", amount);
                return false;
            }
        };
        let credited = match self.recipient.lamports().checked_add(amount) {
            Some(credited) => credited,
            None => return false,
        };

        let (Ok(mut vault_lamports), Ok(mut recipient_lamports)) = (
            self.vault.try_borrow_mut_lamports(),
            self.recipient.try_borrow_mut_lamports(),
        ) else {
            msg!("Raffle and winner accounts must be distinct");
            return false;
        };
        **vault_lamports = remaining;
        **recipient_lamports = credited;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestAccount {
        key: Pubkey,
        owner: Pubkey,
        lamports: u64,
        data: Vec<u8>,
    }

    impl TestAccount {
        fn new(lamports: u64) -> Self {
            Self {
                key: Pubkey::new_unique(),
                owner: Pubkey::new_unique(),
                lamports,
                data: vec![],
            }
        }

        fn info(&mut self, is_writable: bool) -> AccountInfo<'_> {
            AccountInfo::new(
                &self.key,
                false,
                is_writable,
                &mut self.lamports,
                &mut self.data,
                &self.owner,
                false,
                0,
            )
        }
    }

    #[test]
    fn moves_prize_to_winner() {
        let mut vault = TestAccount::new(1_000 + 30);
        let mut winner = TestAccount::new(5);
        let winner_key = winner.key;
        {
            let vault_info = vault.info(true);
            let winner_info = winner.info(true);
            let mut payout = LamportPayout::new(&vault_info, &winner_info, 1_000);
            assert!(payout.pay(&winner_key, 30));
        }
        assert_eq!(vault.lamports, 1_000);
        assert_eq!(winner.lamports, 35);
    }

    #[test]
    fn refuses_wrong_recipient() {
        let mut vault = TestAccount::new(100);
        let mut other = TestAccount::new(0);
        {
            let vault_info = vault.info(true);
            let other_info = other.info(true);
            let mut payout = LamportPayout::new(&vault_info, &other_info, 0);
            assert!(!payout.pay(&Pubkey::new_unique(), 10));
        }
        assert_eq!(vault.lamports, 100);
        assert_eq!(other.lamports, 0);
    }

    #[test]
    fn refuses_read_only_recipient() {
        let mut vault = TestAccount::new(100);
        let mut winner = TestAccount::new(0);
        let winner_key = winner.key;
        {
            let vault_info = vault.info(true);
            let winner_info = winner.info(false);
            let mut payout = LamportPayout::new(&vault_info, &winner_info, 0);
            assert!(!payout.pay(&winner_key, 10));
        }
        assert_eq!(vault.lamports, 100);
    }

    #[test]
    fn refuses_to_dip_into_rent_reserve() {
        let mut vault = TestAccount::new(100);
        let mut winner = TestAccount::new(0);
        let winner_key = winner.key;
        {
            let vault_info = vault.info(true);
            let winner_info = winner.info(true);
            let mut payout = LamportPayout::new(&vault_info, &winner_info, 95);
            assert!(!payout.pay(&winner_key, 10));
        }
        assert_eq!(vault.lamports, 100);
        assert_eq!(winner.lamports, 0);
    }
}
