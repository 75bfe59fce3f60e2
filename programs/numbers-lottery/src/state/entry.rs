use anchor_lang::prelude::*;

use super::round::Round;
use super::tier::PrizeTier;
use crate::constants::NUMBERS_PER_TICKET;
use crate::error::ErrorCode;
use crate::numbers::count_matches;

/// One ticket bought into a round.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Entry {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    pub round_id: u64,

    /// Sequential within the round, starting at 0.
    pub entry_id: u64,

    /// Player who bought the ticket and receives its prize.
    pub owner: Pubkey,

    /// The picked numbers, ascending.
    pub numbers: [u32; 6],

    /// Receives the charity share if this entry matches all six numbers.
    pub charity: Option<Pubkey>,

    /// The UNIX timestamp of the purchase.
    pub timestamp: i64,

    /// Flipped once by settlement; the only field that changes after creation.
    pub settled: bool,
}

impl Entry {
    pub fn new(
        round_id: u64,
        entry_id: u64,
        owner: Pubkey,
        numbers: [u32; NUMBERS_PER_TICKET],
        charity: Option<Pubkey>,
        timestamp: i64,
        bump: u8,
    ) -> Self {
        Self {
            bump,
            round_id,
            entry_id,
            owner,
            numbers,
            charity,
            timestamp,
            settled: false,
        }
    }

    /// Numbers shared with the round's draw, `0` while undrawn.
    pub fn matches(&self, round: &Round) -> u8 {
        if round.is_drawn {
            count_matches(&self.numbers, &round.winning_numbers)
        } else {
            0
        }
    }

    pub fn tier(&self, round: &Round) -> Option<PrizeTier> {
        PrizeTier::from_matches(self.matches(round))
    }

    pub fn is_winner(&self, round: &Round) -> bool {
        self.tier(round).is_some()
    }

    pub fn mark_settled(&mut self) -> Result<()> {
        require!(!self.settled, ErrorCode::AlreadySettled);
        self.settled = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Moment;

    fn drawn(numbers: [u32; 6]) -> Round {
        let mut round = Round::open(1, Moment::default(), 10, 0).unwrap();
        round.close().unwrap();
        round.record_draw(Moment::default(), numbers).unwrap();
        round
    }

    #[test]
    fn matches_are_zero_before_draw() {
        let round = Round::open(1, Moment::default(), 10, 0).unwrap();
        let entry = Entry::new(1, 0, Pubkey::new_unique(), [1, 2, 3, 4, 5, 6], None, 0, 0);
        assert_eq!(entry.matches(&round), 0);
        assert!(!entry.is_winner(&round));
    }

    #[test]
    fn tier_follows_match_count() {
        let round = drawn([5, 12, 23, 34, 45, 56]);
        let owner = Pubkey::new_unique();

        let jackpot = Entry::new(1, 0, owner, [5, 12, 23, 34, 45, 56], None, 0, 0);
        assert_eq!(jackpot.tier(&round), Some(PrizeTier::Six));

        let three = Entry::new(1, 1, owner, [1, 2, 5, 12, 23, 59], None, 0, 0);
        assert_eq!(three.matches(&round), 3);
        assert_eq!(three.tier(&round), Some(PrizeTier::Three));

        let two = Entry::new(1, 2, owner, [1, 2, 3, 12, 23, 59], None, 0, 0);
        assert_eq!(two.tier(&round), None);
    }

    #[test]
    fn settles_once() {
        let mut entry = Entry::new(1, 0, Pubkey::new_unique(), [1, 2, 3, 4, 5, 6], None, 0, 0);
        entry.mark_settled().unwrap();
        assert_eq!(
            entry.mark_settled().unwrap_err(),
            ErrorCode::AlreadySettled.into()
        );
        assert!(entry.settled);
    }
}
