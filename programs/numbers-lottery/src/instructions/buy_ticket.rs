use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use super::shared::transfer_from_player;
use crate::constants::{CONFIG_SEED, ENTRY_SEED, PLAYER_ENTRIES_SEED, ROUND_SEED, TICKET_PRICE};
use crate::error::ErrorCode;
use crate::events::TicketPurchased;
use crate::numbers::validate_selection;
use crate::state::{Entry, LotteryConfig, PlayerEntries, Round};

/// Accounts required to buy a ticket.
/// Handles:
/// - Entry creation at the round's next entry id
/// - Per-player entry tracking
/// - Payment transfer into the vault
#[derive(Accounts)]
#[instruction(round_id: u64)]
pub struct BuyTicket<'info> {
    /// The player buying the ticket.
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = lottery_config.bump,
        has_one = mint,
        has_one = vault,
    )]
    pub lottery_config: Box<Account<'info, LotteryConfig>>,

    /// Round the ticket is bought into.
    #[account(
        mut,
        seeds = [ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Box<Account<'info, Round>>,

    /// The new entry, addressed by the round's entry counter.
    #[account(
        init,
        payer = payer,
        space = 8 + Entry::INIT_SPACE,
        seeds = [
            ENTRY_SEED,
            round_id.to_le_bytes().as_ref(),
            round.entry_count.to_le_bytes().as_ref(),
        ],
        bump
    )]
    pub entry: Box<Account<'info, Entry>>,

    /// Entry ids the player holds in this round.
    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + PlayerEntries::INIT_SPACE,
        seeds = [PLAYER_ENTRIES_SEED, round_id.to_le_bytes().as_ref(), payer.key().as_ref()],
        bump
    )]
    pub player_entries: Box<Account<'info, PlayerEntries>>,

    #[account(mint::token_program = token_program)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token account the ticket price is paid from.
    #[account(
        mut,
        token::mint = mint,
        token::authority = payer,
        token::token_program = token_program,
    )]
    pub payer_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Buys one ticket for the caller and returns its entry id.
///
/// Steps performed:
/// 1. Check the round is accepting tickets.
/// 2. Validate and sort the picked numbers.
/// 3. Record the entry against the player and the round.
/// 4. Transfer `TICKET_PRICE` from the payer to the vault.
///
/// # Arguments
/// * `ctx` - Context containing BuyTicket accounts
/// * `round_id` - Round to enter
/// * `numbers` - Six distinct numbers in `1..=59`, any order
/// * `charity` - Optional charity paid if the entry matches all six numbers
pub fn process_buy_ticket(
    ctx: Context<BuyTicket>,
    round_id: u64,
    numbers: Vec<u32>,
    charity: Option<Pubkey>,
) -> Result<u64> {
    let clock = Clock::get()?;
    let payer = ctx.accounts.payer.key();

    ctx.accounts.round.ensure_accepting(clock.slot)?;
    let numbers = validate_selection(&numbers)?;

    let player_entries = &mut ctx.accounts.player_entries;
    if player_entries.player == Pubkey::default() {
        player_entries.set_inner(PlayerEntries::new(round_id, payer));
        player_entries.bump = ctx.bumps.player_entries;
    }
    require_keys_eq!(player_entries.player, payer, ErrorCode::IncorrectOwner);

    let round = &mut ctx.accounts.round;
    let entry_id = round.record_ticket(clock.slot, TICKET_PRICE)?;
    player_entries.record(entry_id)?;

    ctx.accounts.entry.set_inner(Entry::new(
        round_id,
        entry_id,
        payer,
        numbers,
        charity,
        clock.unix_timestamp,
        ctx.bumps.entry,
    ));

    transfer_from_player(
        &ctx.accounts.payer_token_account,
        &ctx.accounts.vault,
        TICKET_PRICE,
        &ctx.accounts.mint,
        &ctx.accounts.payer,
        &ctx.accounts.token_program,
    )?;

    let total_pool_after = ctx.accounts.round.total_pool;
    msg!(
        "Entry {} in round {} for {}; pool {}",
        entry_id,
        round_id,
        payer,
        total_pool_after
    );
    emit!(TicketPurchased {
        round_id,
        entry_id,
        player: payer,
        numbers,
        charity,
        amount: TICKET_PRICE,
        total_pool_after,
    });

    Ok(entry_id)
}
