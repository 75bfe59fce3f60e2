use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use super::shared::transfer_from_vault;
use crate::constants::{CONFIG_SEED, ENTRY_SEED, ROUND_SEED};
use crate::error::ErrorCode;
use crate::events::EntrySettled;
use crate::settlement::{apply_settlement, plan_settlement, Payout};
use crate::state::{Entry, LotteryConfig, Round};

/// Accounts required for settling one entry of a finalized round.
///
/// Anyone may submit it; payouts only ever go to the entry's owner and
/// to the charity the entry named.
#[derive(Accounts)]
#[instruction(round_id: u64, entry_id: u64)]
pub struct SettleEntry<'info> {
    /// The account paying transaction fees.
    pub payer: Signer<'info>,

    #[account(
        seeds = [CONFIG_SEED],
        bump = lottery_config.bump,
        has_one = mint,
        has_one = vault,
    )]
    pub lottery_config: Box<Account<'info, LotteryConfig>>,

    #[account(
        mut,
        seeds = [ROUND_SEED, round_id.to_le_bytes().as_ref()],
        bump = round.bump,
    )]
    pub round: Box<Account<'info, Round>>,

    #[account(
        mut,
        seeds = [ENTRY_SEED, round_id.to_le_bytes().as_ref(), entry_id.to_le_bytes().as_ref()],
        bump = entry.bump,
    )]
    pub entry: Box<Account<'info, Entry>>,

    #[account(mint::token_program = token_program)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the prize; must belong to the entry's owner.
    #[account(
        mut,
        token::mint = mint,
        token::token_program = token_program,
    )]
    pub owner_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Receives the charity share of a six-match entry.
    #[account(
        mut,
        token::mint = mint,
        token::token_program = token_program,
    )]
    pub charity_token_account: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    pub token_program: Interface<'info, TokenInterface>,
}

fn ensure_recipient(
    account: &InterfaceAccount<TokenAccount>,
    payout: &Payout,
    error: ErrorCode,
) -> Result<()> {
    require_keys_eq!(account.owner, payout.recipient, error);
    Ok(())
}

/// Pays out one entry and marks it settled. Returns the amount paid.
///
/// Steps:
/// 1. Work out the entry's matches, tier and payouts.
/// 2. Check the destination accounts belong to the owner and charity.
/// 3. Mark the entry settled and count it against its tier.
/// 4. Transfer the prize and charity share out of the vault.
///
/// An entry with fewer than three matches settles for nothing, as does a
/// winner beyond the count finalized for its tier.
pub fn process_settle_entry(
    ctx: Context<SettleEntry>,
    round_id: u64,
    entry_id: u64,
) -> Result<u64> {
    let settlement = plan_settlement(&ctx.accounts.round, &ctx.accounts.entry)?;

    if let Some(prize) = &settlement.prize {
        ensure_recipient(&ctx.accounts.owner_token_account, prize, ErrorCode::IncorrectOwner)?;
    }
    if let Some(charity) = &settlement.charity {
        let Some(charity_token_account) = ctx.accounts.charity_token_account.as_ref() else {
            return err!(ErrorCode::IncorrectCharity);
        };
        ensure_recipient(charity_token_account, charity, ErrorCode::IncorrectCharity)?;
    }

    apply_settlement(&mut ctx.accounts.round, &mut ctx.accounts.entry, &settlement)?;

    if let Some(prize) = settlement.prize {
        transfer_from_vault(
            &ctx.accounts.vault,
            &ctx.accounts.owner_token_account,
            prize.amount,
            &ctx.accounts.mint,
            &ctx.accounts.lottery_config,
            &ctx.accounts.token_program,
        )?;
    }
    if let (Some(charity), Some(charity_token_account)) =
        (settlement.charity, ctx.accounts.charity_token_account.as_ref())
    {
        transfer_from_vault(
            &ctx.accounts.vault,
            charity_token_account,
            charity.amount,
            &ctx.accounts.mint,
            &ctx.accounts.lottery_config,
            &ctx.accounts.token_program,
        )?;
    }

    let amount_paid = settlement.amount_paid();
    msg!(
        "Entry {} of round {} settled with {} matches, paid {}",
        entry_id,
        round_id,
        settlement.matches,
        amount_paid
    );
    emit!(EntrySettled {
        round_id,
        entry_id,
        matches: settlement.matches,
        prize: settlement.prize.map_or(0, |p| p.amount),
        charity: settlement.charity.map_or(0, |p| p.amount),
        all_winners_paid: ctx.accounts.round.all_winners_paid,
    });

    Ok(amount_paid)
}
