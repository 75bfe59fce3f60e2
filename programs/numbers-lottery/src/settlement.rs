use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::prize;
use crate::state::{Entry, PrizeTier, Round};

/// A transfer out of the vault owed by a settlement.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub recipient: Pubkey,
    pub amount: u64,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettlementOutcome {
    /// Fewer than three matches: settled for nothing.
    NoPrize,
    Won(PrizeTier),
    /// A winner beyond the count finalized for its tier: settled for
    /// nothing, the tier's share stays with the winners it was split across.
    Unfunded(PrizeTier),
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub round_id: u64,
    pub entry_id: u64,
    pub matches: u8,
    pub outcome: SettlementOutcome,
    /// Net prize to the entry owner.
    pub prize: Option<Payout>,
    /// Net charity share to the entry's charity, six-match entries only.
    pub charity: Option<Payout>,
}

impl Settlement {
    pub fn amount_paid(&self) -> u64 {
        // Prize and charity are disjoint shares of one pool; the sum stays below it.
        self.prize.map_or(0, |p| p.amount) + self.charity.map_or(0, |p| p.amount)
    }

    pub fn payouts(&self) -> impl Iterator<Item = Payout> {
        self.prize.into_iter().chain(self.charity)
    }
}

fn payout(recipient: Pubkey, amount: u64) -> Option<Payout> {
    (amount > 0).then_some(Payout { recipient, amount })
}

fn unpaid(round: &Round, entry: &Entry, matches: u8, outcome: SettlementOutcome) -> Settlement {
    Settlement {
        round_id: round.id,
        entry_id: entry.entry_id,
        matches,
        outcome,
        prize: None,
        charity: None,
    }
}

/// Works out what settling `entry` pays, without touching either account.
///
/// Fails if the round's winners are not finalized or the entry was already
/// settled. A winner whose tier has no finalized slot left is paid nothing.
pub fn plan_settlement(round: &Round, entry: &Entry) -> Result<Settlement> {
    round.ensure_finalized()?;
    require!(!entry.settled, ErrorCode::AlreadySettled);

    let matches = entry.matches(round);
    let Some(tier) = PrizeTier::from_matches(matches) else {
        return Ok(unpaid(round, entry, matches, SettlementOutcome::NoPrize));
    };
    if !round.has_tier_capacity(tier) {
        msg!(
            "Entry {} exceeds the {} finalized winners of its tier",
            entry.entry_id,
            round.tier_winner_count(tier)
        );
        return Ok(unpaid(round, entry, matches, SettlementOutcome::Unfunded(tier)));
    }

    let winners = round.tier_winner_count(tier);
    let prize = payout(
        entry.owner,
        prize::net_prize(round.total_pool, tier, winners),
    );
    let charity = match (tier, entry.charity) {
        (PrizeTier::Six, Some(charity)) => payout(
            charity,
            prize::net_charity_per_winner(round.total_pool, winners),
        ),
        _ => None,
    };

    Ok(Settlement {
        round_id: round.id,
        entry_id: entry.entry_id,
        matches,
        outcome: SettlementOutcome::Won(tier),
        prize,
        charity,
    })
}

/// Flips the entry's `settled` flag and counts the winner against its tier.
/// This is the only place either account changes during disbursement.
pub fn apply_settlement(
    round: &mut Round,
    entry: &mut Entry,
    settlement: &Settlement,
) -> Result<()> {
    let mut settled_round = round.clone();
    if let SettlementOutcome::Won(tier) = settlement.outcome {
        settled_round.record_winner_settled(tier)?;
    }
    entry.mark_settled()?;
    *round = settled_round;
    Ok(())
}
