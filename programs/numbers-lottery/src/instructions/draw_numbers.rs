use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{CONFIG_SEED, ROUND_SEED};
use crate::draw::derive_winning_numbers;
use crate::error::ErrorCode;
use crate::events::NumbersDrawn;
use crate::state::{LotteryConfig, Moment, Round};

/// Accounts required to draw a round's winning numbers.
///
/// This ensures that:
/// 1. Only the lottery authority can draw.
/// 2. The randomness account provided is the one committed for the round.
/// 3. The round is closed or its duration has elapsed.
/// 4. The round has not been drawn already.
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct DrawNumbers<'info> {
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

    /// The randomness oracle account providing verifiable randomness.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

pub fn process_draw_numbers(ctx: Context<DrawNumbers>, round_id: u64) -> Result<[u32; 6]> {
    let clock = Clock::get()?;
    let round = &mut ctx.accounts.round;

    // Checked before the oracle is read.
    round.ensure_drawable(clock.slot)?;
    require_keys_eq!(
        ctx.accounts.randomness_account_data.key(),
        round.randomness_account,
        ErrorCode::IncorrectRandomnessAccount
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| ErrorCode::InvalidRandomnessData)?;
    let revealed_random_value = randomness_data
        .get_value(&clock)
        .map_err(|_| ErrorCode::RandomnessNotResolved)?;

    let winning_numbers = derive_winning_numbers(&revealed_random_value)?;
    round.record_draw(Moment::from(&clock), winning_numbers)?;

    msg!("Round {} drew {:?}", round_id, winning_numbers);
    emit!(NumbersDrawn {
        round_id,
        winning_numbers,
        draw_timestamp: round.draw_timestamp,
    });

    Ok(winning_numbers)
}
