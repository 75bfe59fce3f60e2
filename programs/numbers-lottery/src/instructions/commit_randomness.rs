use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{CONFIG_SEED, ROUND_SEED};
use crate::error::ErrorCode;
use crate::state::{LotteryConfig, Round};

/// Accounts required to commit a randomness account for a round's draw.
///
/// Ensures:
/// 1. Only the authority of the lottery can commit the randomness.
/// 2. Ticket sales for the round are over, so a revealed seed cannot be bought into.
/// 3. No randomness account was committed for the round before.
/// 4. The randomness account is valid and has not been revealed previously.
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct CommitRandomness<'info> {
    pub authority: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = lottery_config.bump,
        has_one = authority @ ErrorCode::NotAuthorized,
    )]
    pub lottery_config: Account<'info, LotteryConfig>,

    #[account(
        mut,
        seeds = [ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Account<'info, Round>,

    /// Randomness account from Switchboard.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

pub fn process_commit_randomness(ctx: Context<CommitRandomness>, round_id: u64) -> Result<()> {
    let clock = Clock::get()?;
    let round = &mut ctx.accounts.round;
    round.commit_randomness(clock.slot, ctx.accounts.randomness_account_data.key())?;

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| ErrorCode::InvalidRandomnessData)?;

    // The seed must have been requested in the previous slot, so its value
    // cannot be known yet.
    if randomness_data.seed_slot != clock.slot.saturating_sub(1) {
        return Err(ErrorCode::RandomnessAlreadyRevealed.into());
    }

    msg!(
        "Round {} committed to randomness {}",
        round_id,
        round.randomness_account
    );

    Ok(())
}
