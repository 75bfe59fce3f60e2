use anchor_lang::prelude::*;

use crate::constants::{
    TIER_3_SHARE_PERCENT, TIER_4_SHARE_PERCENT, TIER_5_SHARE_PERCENT, TIER_6_SHARE_PERCENT,
};
use crate::error::ErrorCode;

/// Prize bracket, named by the exact number of matches that earns it.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrizeTier {
    Three,
    Four,
    Five,
    Six,
}

impl PrizeTier {
    pub const ALL: [PrizeTier; 4] = [
        PrizeTier::Three,
        PrizeTier::Four,
        PrizeTier::Five,
        PrizeTier::Six,
    ];

    /// Tier earned by `matches` correct numbers; fewer than three earns none.
    pub fn from_matches(matches: u8) -> Option<Self> {
        match matches {
            3 => Some(PrizeTier::Three),
            4 => Some(PrizeTier::Four),
            5 => Some(PrizeTier::Five),
            6 => Some(PrizeTier::Six),
            _ => None,
        }
    }

    pub fn matches(self) -> u8 {
        match self {
            PrizeTier::Three => 3,
            PrizeTier::Four => 4,
            PrizeTier::Five => 5,
            PrizeTier::Six => 6,
        }
    }

    /// Percentage of the round's total pool split among this tier's winners.
    pub fn share_percent(self) -> u64 {
        match self {
            PrizeTier::Three => TIER_3_SHARE_PERCENT,
            PrizeTier::Four => TIER_4_SHARE_PERCENT,
            PrizeTier::Five => TIER_5_SHARE_PERCENT,
            PrizeTier::Six => TIER_6_SHARE_PERCENT,
        }
    }
}

impl TryFrom<u8> for PrizeTier {
    type Error = anchor_lang::error::Error;

    fn try_from(tier: u8) -> Result<Self> {
        PrizeTier::from_matches(tier).ok_or_else(|| error!(ErrorCode::InvalidTier))
    }
}

/// Winner count per tier for one round.
#[derive(
    AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub struct TierCounts {
    pub three: u64,
    pub four: u64,
    pub five: u64,
    pub six: u64,
}

impl TierCounts {
    pub fn new(three: u64, four: u64, five: u64, six: u64) -> Self {
        Self {
            three,
            four,
            five,
            six,
        }
    }

    pub fn get(&self, tier: PrizeTier) -> u64 {
        match tier {
            PrizeTier::Three => self.three,
            PrizeTier::Four => self.four,
            PrizeTier::Five => self.five,
            PrizeTier::Six => self.six,
        }
    }

    fn get_mut(&mut self, tier: PrizeTier) -> &mut u64 {
        match tier {
            PrizeTier::Three => &mut self.three,
            PrizeTier::Four => &mut self.four,
            PrizeTier::Five => &mut self.five,
            PrizeTier::Six => &mut self.six,
        }
    }

    pub fn increment(&mut self, tier: PrizeTier) -> Result<()> {
        let count = self.get_mut(tier);
        *count = count
            .checked_add(1)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
        Ok(())
    }

    /// Sum over every tier, widened so any four counts fit.
    pub fn total(&self) -> u128 {
        PrizeTier::ALL
            .iter()
            .map(|tier| u128::from(self.get(*tier)))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn tiers_start_at_three_matches() {
        assert_eq!(PrizeTier::from_matches(0), None);
        assert_eq!(PrizeTier::from_matches(2), None);
        assert_eq!(PrizeTier::from_matches(3), Some(PrizeTier::Three));
        assert_eq!(PrizeTier::from_matches(6), Some(PrizeTier::Six));
        assert_eq!(PrizeTier::from_matches(7), None);

        for tier in PrizeTier::ALL {
            assert_eq!(PrizeTier::from_matches(tier.matches()), Some(tier));
        }
    }

    #[test]
    fn try_from_rejects_unknown_tier() {
        assert_eq!(PrizeTier::try_from(4).unwrap(), PrizeTier::Four);
        assert_eq!(
            PrizeTier::try_from(2).unwrap_err(),
            ErrorCode::InvalidTier.into()
        );
    }

    #[test]
    fn shares_leave_room_for_charity_pool() {
        let prizes: u64 = PrizeTier::ALL.iter().map(|t| t.share_percent()).sum();
        assert!(prizes + crate::constants::CHARITY_POOL_PERCENT <= 100);
        assert_eq!(PrizeTier::Four.share_percent(), 5);
    }

    #[test]
    fn counts_increment_and_total() {
        let mut counts = TierCounts::new(50, 10, 3, 1);
        assert_eq!(counts.total(), 64);

        counts.increment(PrizeTier::Five).unwrap();
        assert_eq!(counts.get(PrizeTier::Five), 4);
        assert_eq!(counts.total(), 65);
    }

    #[test]
    fn total_widens_but_increment_overflows() {
        let counts = TierCounts::new(u64::MAX, 1, 0, 0);
        assert_eq!(counts.total(), u128::from(u64::MAX) + 1);

        let mut full = TierCounts::new(0, 0, 0, u64::MAX);
        assert!(full.increment(PrizeTier::Six).is_err());
        assert_eq!(full.six, u64::MAX);
    }
}
