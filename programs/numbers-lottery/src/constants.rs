use anchor_lang::prelude::*;

/// Price of one ticket in micro-units (1 whole token at 6 decimals).
#[constant]
pub const TICKET_PRICE: u64 = 1_000_000;

/// Decimals the lottery mint must carry for `TICKET_PRICE` to be one token.
#[constant]
pub const MINT_DECIMALS: u8 = 6;

/// Numbers picked per ticket and drawn per round.
pub const NUMBERS_PER_TICKET: usize = 6;

/// Lowest selectable number.
#[constant]
pub const MIN_NUMBER: u32 = 1;

/// Highest selectable number.
#[constant]
pub const MAX_NUMBER: u32 = 59;

/// Fewest matches that still earn a prize tier.
#[constant]
pub const MIN_WINNING_MATCHES: u8 = 3;

/// Fee withheld from every prize and charity payout, in percent.
#[constant]
pub const PLATFORM_FEE_PERCENT: u64 = 15;

/// Share of the pool reserved for the charities of six-match winners.
#[constant]
pub const CHARITY_POOL_PERCENT: u64 = 10;

/// Pool share of each tier, in percent.
#[constant]
pub const TIER_3_SHARE_PERCENT: u64 = 2;
#[constant]
pub const TIER_4_SHARE_PERCENT: u64 = 5;
#[constant]
pub const TIER_5_SHARE_PERCENT: u64 = 13;
#[constant]
pub const TIER_6_SHARE_PERCENT: u64 = 50;

/// Per-player, per-round cap on tickets (bounds the `PlayerEntries` account).
pub const MAX_ENTRIES_PER_PLAYER: usize = 50;

/// Hash blocks the draw may consume before giving up on the seed.
pub const MAX_DRAW_BLOCKS: u32 = 64;

#[constant]
pub const CONFIG_SEED: &[u8] = b"lottery_config";
#[constant]
pub const VAULT_SEED: &[u8] = b"vault";
#[constant]
pub const ROUND_SEED: &[u8] = b"round";
#[constant]
pub const ENTRY_SEED: &[u8] = b"entry";
#[constant]
pub const PLAYER_ENTRIES_SEED: &[u8] = b"player_entries";
