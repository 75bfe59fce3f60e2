use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{CONFIG_SEED, MINT_DECIMALS, ROUND_SEED, VAULT_SEED};
use crate::error::ErrorCode;
use crate::events::{RoundClosed, RoundCreated, WinnersFinalized};
use crate::state::{LotteryConfig, Moment, Round, TierCounts};

/// Accounts required to initialize the lottery configuration.
/// This creates the config PDA and the token vault that escrows every pool.
#[derive(Accounts)]
pub struct InitializeConfig<'info> {
    /// The account paying for account creation; becomes the lottery authority.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The LotteryConfig state account.
    #[account(
        init,
        payer = payer,
        space = 8 + LotteryConfig::INIT_SPACE,
        seeds = [CONFIG_SEED],
        bump
    )]
    pub lottery_config: Box<Account<'info, LotteryConfig>>,

    /// Mint the ticket price and prizes are paid in.
    #[account(mint::token_program = token_program)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Program-owned token account holding ticket payments.
    #[account(
        init,
        payer = payer,
        seeds = [VAULT_SEED],
        bump,
        token::mint = mint,
        token::authority = lottery_config,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program interface.
    pub token_program: Interface<'info, TokenInterface>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Accounts required to open the next round.
#[derive(Accounts)]
pub struct CreateRound<'info> {
    /// The lottery authority, paying for the round account.
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [CONFIG_SEED],
        bump = lottery_config.bump,
        has_one = authority @ ErrorCode::NotAuthorized,
    )]
    pub lottery_config: Account<'info, LotteryConfig>,

    /// The new round, addressed by the next sequential id.
    #[account(
        init,
        payer = authority,
        space = 8 + Round::INIT_SPACE,
        seeds = [ROUND_SEED, (lottery_config.current_round + 1).to_le_bytes().as_ref()],
        bump
    )]
    pub round: Account<'info, Round>,

    pub system_program: Program<'info, System>,
}

/// Accounts shared by the authority-only round transitions.
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct AdminRound<'info> {
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
}

/// Initializes the lottery configuration and sets the payer as authority.
///
/// # Arguments
/// * `ctx` - Context holding the InitializeConfig accounts
pub fn process_initialize_config(ctx: Context<InitializeConfig>) -> Result<()> {
    require!(
        ctx.accounts.mint.decimals == MINT_DECIMALS,
        ErrorCode::InvalidMintDecimals
    );

    let lottery_config = &mut ctx.accounts.lottery_config;
    lottery_config.bump = ctx.bumps.lottery_config;
    lottery_config.vault_bump = ctx.bumps.vault;
    lottery_config.authority = ctx.accounts.payer.key();
    lottery_config.mint = ctx.accounts.mint.key();
    lottery_config.vault = ctx.accounts.vault.key();
    lottery_config.current_round = 0;

    msg!("Lottery configured with mint {}", lottery_config.mint);
    Ok(())
}

/// Opens round `current_round + 1` for `duration` slots and returns its id.
///
/// # Arguments
/// * `ctx` - Context holding the CreateRound accounts
/// * `duration` - Number of slots the round accepts tickets for
pub fn process_create_round(ctx: Context<CreateRound>, duration: u64) -> Result<u64> {
    let clock = Clock::get()?;
    let lottery_config = &mut ctx.accounts.lottery_config;
    let round_id = lottery_config.next_round_id()?;

    let round = Round::open(round_id, Moment::from(&clock), duration, ctx.bumps.round)?;
    msg!(
        "Round {} open from slot {} to {}",
        round_id,
        round.start_slot,
        round.end_slot
    );
    emit!(RoundCreated {
        round_id,
        start_slot: round.start_slot,
        end_slot: round.end_slot,
    });

    ctx.accounts.round.set_inner(round);
    lottery_config.current_round = round_id;
    Ok(round_id)
}

/// Stops ticket sales ahead of the round's end slot.
pub fn process_close_round(ctx: Context<AdminRound>, round_id: u64) -> Result<()> {
    let round = &mut ctx.accounts.round;
    Round::close(round)?;

    msg!("Round {} closed", round_id);
    emit!(RoundClosed {
        round_id,
        total_pool: round.total_pool,
        entry_count: round.entry_count,
    });
    Ok(())
}

/// Records the per-tier winner counts of a drawn round.
///
/// The counts come from an off-chain scan of every entry (see
/// `LotteryLedger::tally_round`); scanning here would make the cost of the
/// instruction grow with the number of tickets. Only the authority may call
/// it, and settlement refuses to pay more winners in a tier than recorded.
pub fn process_finalize_round_winners(
    ctx: Context<AdminRound>,
    round_id: u64,
    counts: TierCounts,
) -> Result<()> {
    let round = &mut ctx.accounts.round;
    round.finalize_winners(counts)?;

    msg!(
        "Round {} winners: 3={} 4={} 5={} 6={}",
        round_id,
        counts.three,
        counts.four,
        counts.five,
        counts.six
    );
    emit!(WinnersFinalized {
        round_id,
        counts,
        charity_pool: round.charity_pool,
    });
    Ok(())
}
