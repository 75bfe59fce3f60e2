use anchor_lang::prelude::*;

use crate::error::ErrorCode;

mod entry;
mod round;
mod tier;

pub use entry::*;
pub use round::*;
pub use tier::*;

#[account]
#[derive(InitSpace)]
pub struct LotteryConfig {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Bump of the program-owned token account holding every pool.
    pub vault_bump: u8,

    /// The admin allowed to open, close, draw and finalize rounds.
    pub authority: Pubkey,

    /// Six-decimal mint the lottery is denominated in.
    pub mint: Pubkey,

    /// Token account (owned by this PDA) that escrows ticket payments
    /// until they are disbursed.
    pub vault: Pubkey,

    /// Id of the most recently created round, `0` before the first one.
    pub current_round: u64,
}

impl LotteryConfig {
    pub fn next_round_id(&self) -> Result<u64> {
        self.current_round
            .checked_add(1)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))
    }
}

/// Entry ids a single player holds in a single round.
#[account]
#[derive(InitSpace, Debug, Default, PartialEq, Eq)]
pub struct PlayerEntries {
    pub bump: u8,

    pub round_id: u64,

    pub player: Pubkey,

    /// Bounded by `MAX_ENTRIES_PER_PLAYER`.
    #[max_len(50)]
    pub entry_ids: Vec<u64>,
}

impl PlayerEntries {
    pub fn new(round_id: u64, player: Pubkey) -> Self {
        Self {
            bump: 0,
            round_id,
            player,
            entry_ids: Vec::new(),
        }
    }

    pub fn ensure_capacity(&self) -> Result<()> {
        require!(
            self.entry_ids.len() < crate::constants::MAX_ENTRIES_PER_PLAYER,
            ErrorCode::TooManyEntries
        );
        Ok(())
    }

    pub fn record(&mut self, entry_id: u64) -> Result<()> {
        self.ensure_capacity()?;
        self.entry_ids.push(entry_id);
        Ok(())
    }
}
