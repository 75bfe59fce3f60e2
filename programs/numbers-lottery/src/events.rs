use anchor_lang::prelude::*;

use crate::state::TierCounts;

#[event]
pub struct RoundCreated {
    pub round_id: u64,
    pub start_slot: u64,
    pub end_slot: u64,
}

#[event]
pub struct TicketPurchased {
    pub round_id: u64,
    pub entry_id: u64,
    pub player: Pubkey,
    pub numbers: [u32; 6],
    pub charity: Option<Pubkey>,
    pub amount: u64,
    pub total_pool_after: u64,
}

#[event]
pub struct RoundClosed {
    pub round_id: u64,
    pub total_pool: u64,
    pub entry_count: u64,
}

#[event]
pub struct NumbersDrawn {
    pub round_id: u64,
    pub winning_numbers: [u32; 6],
    pub draw_timestamp: i64,
}

#[event]
pub struct WinnersFinalized {
    pub round_id: u64,
    pub counts: TierCounts,
    pub charity_pool: u64,
}

#[event]
pub struct EntrySettled {
    pub round_id: u64,
    pub entry_id: u64,
    pub matches: u8,
    pub prize: u64,
    pub charity: u64,
    pub all_winners_paid: bool,
}
