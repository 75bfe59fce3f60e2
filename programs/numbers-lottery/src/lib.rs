#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;
use instructions::*;
use prize::PrizeSchedule;
use state::TierCounts;

/// Program-wide constants: ticket price, number range, tier shares and seeds.
pub mod constants;

/// Derivation of winning numbers from a revealed randomness seed.
pub mod draw;

/// Custom error types returned when instructions fail.
pub mod error;

/// Events emitted by every state transition.
pub mod events;

/// Instruction handlers, such as opening a round, buying tickets and
/// settling entries.
pub mod instructions;

/// In-memory replica of the round ledger for off-chain tallies and tests.
pub mod ledger;

/// Ticket number validation and match counting.
pub mod numbers;

/// Prize and charity arithmetic.
pub mod prize;

/// Settlement planning shared by the program and the ledger.
pub mod settlement;

/// On-chain accounts: the lottery config, rounds, entries and player indexes.
pub mod state;

declare_id!("MKCBm6MTfUWMZk4vF4iJkprpkvRHxgBjmEVKYafmpLL");

#[program]
pub mod numbers_lottery {
    use super::*;

    pub fn initialize_config(ctx: Context<InitializeConfig>) -> Result<()> {
        process_initialize_config(ctx)
    }

    pub fn create_round(ctx: Context<CreateRound>, duration: u64) -> Result<u64> {
        process_create_round(ctx, duration)
    }

    pub fn buy_ticket(
        ctx: Context<BuyTicket>,
        round_id: u64,
        numbers: Vec<u32>,
        charity: Option<Pubkey>,
    ) -> Result<u64> {
        process_buy_ticket(ctx, round_id, numbers, charity)
    }

    pub fn close_round(ctx: Context<AdminRound>, round_id: u64) -> Result<()> {
        process_close_round(ctx, round_id)
    }

    pub fn commit_randomness(ctx: Context<CommitRandomness>, round_id: u64) -> Result<()> {
        process_commit_randomness(ctx, round_id)
    }

    pub fn draw_numbers(ctx: Context<DrawNumbers>, round_id: u64) -> Result<[u32; 6]> {
        process_draw_numbers(ctx, round_id)
    }

    pub fn finalize_round_winners(
        ctx: Context<AdminRound>,
        round_id: u64,
        three_match_winners: u64,
        four_match_winners: u64,
        five_match_winners: u64,
        six_match_winners: u64,
    ) -> Result<()> {
        let counts = TierCounts::new(
            three_match_winners,
            four_match_winners,
            five_match_winners,
            six_match_winners,
        );
        process_finalize_round_winners(ctx, round_id, counts)
    }

    pub fn settle_entry(ctx: Context<SettleEntry>, round_id: u64, entry_id: u64) -> Result<u64> {
        process_settle_entry(ctx, round_id, entry_id)
    }

    pub fn quote_prizes(
        ctx: Context<QuotePrizes>,
        round_id: u64,
        total_pool: u64,
    ) -> Result<PrizeSchedule> {
        process_quote_prizes(ctx, round_id, total_pool)
    }
}
