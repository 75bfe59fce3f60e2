use anchor_lang::prelude::*;

use crate::constants::ROUND_SEED;
use crate::prize::{self, PrizeSchedule};
use crate::state::Round;

#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct QuotePrizes<'info> {
    #[account(
        seeds = [ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Account<'info, Round>,
}

/// Prices every tier of `round_id` against `total_pool` using the round's
/// finalized winner counts. Counts read as zero until finalization.
pub fn process_quote_prizes(
    ctx: Context<QuotePrizes>,
    _round_id: u64,
    total_pool: u64,
) -> Result<PrizeSchedule> {
    Ok(prize::schedule(
        total_pool,
        &ctx.accounts.round.tier_winner_counts,
    ))
}
