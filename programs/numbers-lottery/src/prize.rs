//! Prize and charity arithmetic.
//!
//! Every amount is in micro-units and every division floors. Pool shares are
//! taken first (`pool * percent / 100`), then split per winner, then the
//! platform fee comes off the per-winner amount. Validators replay these
//! functions to agree on payouts, so the order of operations is part of the
//! contract.

use anchor_lang::prelude::*;

use crate::constants::{CHARITY_POOL_PERCENT, PLATFORM_FEE_PERCENT};
use crate::state::{PrizeTier, TierCounts};

/// `floor(amount * percent / 100)`, widened so the product cannot overflow.
/// `percent` never exceeds 100, so the result always fits back in a `u64`.
fn percent_of(amount: u64, percent: u64) -> u64 {
    (u128::from(amount) * u128::from(percent) / 100) as u64
}

/// Portion of the pool reserved for a tier, before it is split.
pub fn tier_pool(total_pool: u64, tier: PrizeTier) -> u64 {
    percent_of(total_pool, tier.share_percent())
}

/// Per-winner prize before the platform fee; `0` when the tier has no winners.
pub fn gross_prize(total_pool: u64, tier: PrizeTier, winners: u64) -> u64 {
    tier_pool(total_pool, tier).checked_div(winners).unwrap_or(0)
}

/// Amount left after the platform fee.
pub fn net_of_fee(gross: u64) -> u64 {
    percent_of(gross, 100 - PLATFORM_FEE_PERCENT)
}

pub fn net_prize(total_pool: u64, tier: PrizeTier, winners: u64) -> u64 {
    net_of_fee(gross_prize(total_pool, tier, winners))
}

pub fn charity_pool(total_pool: u64) -> u64 {
    percent_of(total_pool, CHARITY_POOL_PERCENT)
}

/// Charity pool split across six-match winners. The split truncates, so up
/// to `six_match_winners - 1` micro-units stay in the vault.
pub fn charity_share_per_winner(total_pool: u64, six_match_winners: u64) -> u64 {
    charity_pool(total_pool)
        .checked_div(six_match_winners)
        .unwrap_or(0)
}

pub fn net_charity_per_winner(total_pool: u64, six_match_winners: u64) -> u64 {
    net_of_fee(charity_share_per_winner(total_pool, six_match_winners))
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierPrize {
    pub tier: PrizeTier,
    pub winners: u64,
    pub gross: u64,
    pub net: u64,
}

/// Everything a round pays out, per winner.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PrizeSchedule {
    pub total_pool: u64,
    pub tiers: Vec<TierPrize>,
    pub charity_pool: u64,
    pub charity_share: u64,
    pub net_charity_share: u64,
}

impl PrizeSchedule {
    pub fn tier(&self, tier: PrizeTier) -> Option<&TierPrize> {
        self.tiers.iter().find(|prize| prize.tier == tier)
    }
}

pub fn schedule(total_pool: u64, counts: &TierCounts) -> PrizeSchedule {
    let tiers = PrizeTier::ALL
        .iter()
        .map(|&tier| {
            let winners = counts.get(tier);
            let gross = gross_prize(total_pool, tier, winners);
            TierPrize {
                tier,
                winners,
                gross,
                net: net_of_fee(gross),
            }
        })
        .collect();

    PrizeSchedule {
        total_pool,
        tiers,
        charity_pool: charity_pool(total_pool),
        charity_share: charity_share_per_winner(total_pool, counts.six),
        net_charity_share: net_charity_per_winner(total_pool, counts.six),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POOL: u64 = 100_000_000;

    #[test]
    fn four_match_prize_splits_five_percent() {
        assert_eq!(tier_pool(POOL, PrizeTier::Four), 5_000_000);
        assert_eq!(gross_prize(POOL, PrizeTier::Four, 5), 1_000_000);
        assert_eq!(net_prize(POOL, PrizeTier::Four, 5), 850_000);
    }

    #[test]
    fn no_winners_means_no_prize() {
        for tier in PrizeTier::ALL {
            assert_eq!(gross_prize(POOL, tier, 0), 0);
            assert_eq!(net_prize(POOL, tier, 0), 0);
        }
        assert_eq!(charity_share_per_winner(POOL, 0), 0);
        assert_eq!(net_charity_per_winner(POOL, 0), 0);
    }

    #[test]
    fn single_six_match_charity() {
        assert_eq!(charity_pool(POOL), 10_000_000);
        assert_eq!(charity_share_per_winner(POOL, 1), 10_000_000);
        assert_eq!(net_charity_per_winner(POOL, 1), 8_500_000);
    }

    #[test]
    fn charity_split_truncates_and_keeps_residue() {
        let share = charity_share_per_winner(POOL, 3);
        assert_eq!(share, 3_333_333);
        assert_eq!(net_charity_per_winner(POOL, 3), 2_833_330);
        // truncation, accepted: one micro-unit stays behind
        assert_eq!(charity_pool(POOL) - 3 * share, 1);
    }

    #[test]
    fn pool_share_is_floored_before_the_split() {
        // 7 * 5 / 100 floors to 0 before dividing by winners
        assert_eq!(gross_prize(7, PrizeTier::Four, 1), 0);
        // 999 * 13 / 100 = 129, then / 4 = 32
        assert_eq!(gross_prize(999, PrizeTier::Five, 4), 32);
        assert_eq!(net_of_fee(32), 27);
    }

    #[test]
    fn net_is_always_floor_of_85_percent_of_gross() {
        let pools = [0, 1, 99, 1_000_000, 123_456_789, u64::MAX / 3, u64::MAX];
        for pool in pools {
            for tier in PrizeTier::ALL {
                for winners in [0, 1, 2, 3, 7, 1_000] {
                    let gross = gross_prize(pool, tier, winners);
                    let expected = (u128::from(gross) * 85 / 100) as u64;
                    assert_eq!(net_prize(pool, tier, winners), expected);
                }
            }
        }
    }

    #[test]
    fn huge_pools_do_not_overflow() {
        assert_eq!(tier_pool(u64::MAX, PrizeTier::Six), u64::MAX / 2);
        assert!(charity_pool(u64::MAX) < u64::MAX);
    }

    #[test]
    fn schedule_reports_every_tier() {
        let schedule = schedule(POOL, &TierCounts::new(50, 10, 3, 1));
        assert_eq!(schedule.tiers.len(), 4);

        let three = schedule.tier(PrizeTier::Three).unwrap();
        assert_eq!(three.gross, 40_000);
        assert_eq!(three.net, 34_000);

        let six = schedule.tier(PrizeTier::Six).unwrap();
        assert_eq!(six.gross, 50_000_000);
        assert_eq!(six.net, 42_500_000);

        assert_eq!(schedule.charity_share, 10_000_000);
        assert_eq!(schedule.net_charity_share, 8_500_000);
    }
}
