use anchor_lang::prelude::*;

use super::tier::{PrizeTier, TierCounts};
use crate::constants::NUMBERS_PER_TICKET;
use crate::error::ErrorCode;
use crate::prize::{self, PrizeSchedule};

/// Point on the ledger's clock: slots drive round expiry, the unix
/// timestamp is recorded on entries and draws.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Moment {
    pub slot: u64,
    pub unix_timestamp: i64,
}

impl Moment {
    pub fn new(slot: u64, unix_timestamp: i64) -> Self {
        Self {
            slot,
            unix_timestamp,
        }
    }
}

impl From<&Clock> for Moment {
    fn from(clock: &Clock) -> Self {
        Self::new(clock.slot, clock.unix_timestamp)
    }
}

/// Where a round sits in `Open -> Closed -> Drawn -> Finalized -> Archived`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundStatus {
    Open,
    Closed,
    Drawn,
    Finalized,
    Archived,
}

#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Round {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Sequential id, starting at 1. Never reused.
    pub id: u64,

    /// Slot the round opened at.
    pub start_slot: u64,

    /// First slot at which tickets are no longer accepted.
    pub end_slot: u64,

    /// The UNIX timestamp at creation.
    pub created_at: i64,

    /// Cleared by an explicit close or by the draw.
    pub is_open: bool,

    pub is_drawn: bool,

    /// Ascending; only meaningful once `is_drawn` is set.
    pub winning_numbers: [u32; 6],

    pub draw_timestamp: i64,

    /// Sum of every ticket price paid into the round, in micro-units.
    pub total_pool: u64,

    /// Charity reserve, fixed when the winners are finalized.
    pub charity_pool: u64,

    /// Number of entries sold; also the next entry id.
    pub entry_count: u64,

    pub winners_finalized: bool,

    /// Winners per tier, as finalized. Immutable afterwards.
    pub tier_winner_counts: TierCounts,

    /// Winners per tier that have already been paid.
    pub settled_winners: TierCounts,

    /// Set once every finalized winner has been settled. Never cleared.
    pub all_winners_paid: bool,

    /// Randomness oracle account committed for this round's draw.
    pub randomness_account: Pubkey,
}

impl Round {
    /// Opens round `id` at `now`, accepting tickets for `duration` slots.
    pub fn open(id: u64, now: Moment, duration: u64, bump: u8) -> Result<Self> {
        require!(duration > 0, ErrorCode::InvalidDuration);
        let end_slot = now
            .slot
            .checked_add(duration)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;

        Ok(Self {
            bump,
            id,
            start_slot: now.slot,
            end_slot,
            created_at: now.unix_timestamp,
            is_open: true,
            is_drawn: false,
            winning_numbers: [0; NUMBERS_PER_TICKET],
            draw_timestamp: 0,
            total_pool: 0,
            charity_pool: 0,
            entry_count: 0,
            winners_finalized: false,
            tier_winner_counts: TierCounts::default(),
            settled_winners: TierCounts::default(),
            all_winners_paid: false,
            randomness_account: Pubkey::default(),
        })
    }

    pub fn has_expired(&self, slot: u64) -> bool {
        slot >= self.end_slot
    }

    pub fn status(&self, slot: u64) -> RoundStatus {
        if self.all_winners_paid {
            RoundStatus::Archived
        } else if self.winners_finalized {
            RoundStatus::Finalized
        } else if self.is_drawn {
            RoundStatus::Drawn
        } else if self.is_open && !self.has_expired(slot) {
            RoundStatus::Open
        } else {
            RoundStatus::Closed
        }
    }

    /// Winning numbers in ascending order; empty until the draw.
    pub fn winning_numbers(&self) -> &[u32] {
        if self.is_drawn {
            &self.winning_numbers[..]
        } else {
            &[]
        }
    }

    pub fn ensure_accepting(&self, slot: u64) -> Result<()> {
        require!(self.is_open && !self.is_drawn, ErrorCode::RoundNotOpen);
        require!(!self.has_expired(slot), ErrorCode::RoundExpired);
        Ok(())
    }

    /// Credits one ticket to the pool and hands out its entry id.
    pub fn record_ticket(&mut self, slot: u64, price: u64) -> Result<u64> {
        self.ensure_accepting(slot)?;

        let total_pool = self
            .total_pool
            .checked_add(price)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
        let entry_count = self
            .entry_count
            .checked_add(1)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;

        let entry_id = self.entry_count;
        self.total_pool = total_pool;
        self.entry_count = entry_count;
        Ok(entry_id)
    }

    pub fn close(&mut self) -> Result<()> {
        require!(self.is_open, ErrorCode::AlreadyClosed);
        self.is_open = false;
        Ok(())
    }

    /// A round can be drawn once, after it closed or its duration elapsed.
    pub fn ensure_drawable(&self, slot: u64) -> Result<()> {
        require!(!self.is_drawn, ErrorCode::AlreadyDrawn);
        require!(
            !self.is_open || self.has_expired(slot),
            ErrorCode::RoundStillOpen
        );
        Ok(())
    }

    /// Binds the oracle account whose reveal will decide the draw. Only one
    /// account per round, and only once tickets can no longer be bought.
    pub fn commit_randomness(&mut self, slot: u64, randomness_account: Pubkey) -> Result<()> {
        self.ensure_drawable(slot)?;
        require_keys_eq!(
            self.randomness_account,
            Pubkey::default(),
            ErrorCode::RandomnessAlreadyCommitted
        );
        self.randomness_account = randomness_account;
        Ok(())
    }

    pub fn record_draw(
        &mut self,
        now: Moment,
        winning_numbers: [u32; NUMBERS_PER_TICKET],
    ) -> Result<()> {
        self.ensure_drawable(now.slot)?;
        self.is_open = false;
        self.is_drawn = true;
        self.winning_numbers = winning_numbers;
        self.draw_timestamp = now.unix_timestamp;
        Ok(())
    }

    /// Records the tier counts produced by a full scan of the round's entries.
    /// The counts are taken as given; see `numbers::tally_tier_counts`.
    pub fn finalize_winners(&mut self, counts: TierCounts) -> Result<()> {
        require!(self.is_drawn, ErrorCode::NotDrawn);
        require!(!self.winners_finalized, ErrorCode::AlreadyFinalized);
        let total_winners = counts.total();

        self.tier_winner_counts = counts;
        self.charity_pool = prize::charity_pool(self.total_pool);
        self.winners_finalized = true;
        self.all_winners_paid = total_winners == 0;
        Ok(())
    }

    /// Zero until the winners are finalized.
    pub fn tier_winner_count(&self, tier: PrizeTier) -> u64 {
        self.tier_winner_counts.get(tier)
    }

    pub fn ensure_finalized(&self) -> Result<()> {
        require!(self.winners_finalized, ErrorCode::NotFinalized);
        Ok(())
    }

    /// Whether `tier` still has a finalized winner slot left to pay.
    pub fn has_tier_capacity(&self, tier: PrizeTier) -> bool {
        self.settled_winners.get(tier) < self.tier_winner_counts.get(tier)
    }

    /// Rejects a winner beyond the count finalized for its tier.
    pub fn ensure_tier_capacity(&self, tier: PrizeTier) -> Result<()> {
        require!(self.has_tier_capacity(tier), ErrorCode::TierCountExceeded);
        Ok(())
    }

    pub fn record_winner_settled(&mut self, tier: PrizeTier) -> Result<()> {
        self.ensure_tier_capacity(tier)?;
        let mut settled = self.settled_winners;
        settled.increment(tier)?;
        let all_paid = settled.total() == self.tier_winner_counts.total();

        self.settled_winners = settled;
        if all_paid {
            self.all_winners_paid = true;
        }
        Ok(())
    }

    /// Per-tier amounts for this round's own pool and counts.
    pub fn prize_schedule(&self) -> PrizeSchedule {
        prize::schedule(self.total_pool, &self.tier_winner_counts)
    }
}
