use anchor_lang::prelude::*;

use crate::constants::{MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_TICKET};
use crate::error::ErrorCode;
use crate::state::{Entry, PrizeTier, TierCounts};

/// Checks a ticket selection and returns it in ascending order.
///
/// Rules are applied in order: count, range, distinctness. The first rule
/// that fails is the one reported.
pub fn validate_selection(numbers: &[u32]) -> Result<[u32; NUMBERS_PER_TICKET]> {
    require!(
        numbers.len() == NUMBERS_PER_TICKET,
        ErrorCode::InvalidNumberCount
    );
    require!(
        numbers
            .iter()
            .all(|n| (MIN_NUMBER..=MAX_NUMBER).contains(n)),
        ErrorCode::NumberOutOfRange
    );

    let mut sorted = [0u32; NUMBERS_PER_TICKET];
    sorted.copy_from_slice(numbers);
    sorted.sort_unstable();
    require!(
        sorted.windows(2).all(|pair| pair[0] != pair[1]),
        ErrorCode::DuplicateNumber
    );

    Ok(sorted)
}

/// Size of the intersection of two selections.
pub fn count_matches(
    picked: &[u32; NUMBERS_PER_TICKET],
    winning: &[u32; NUMBERS_PER_TICKET],
) -> u8 {
    picked.iter().filter(|n| winning.contains(n)).count() as u8
}

/// Full scan of a round's entries against its winning numbers.
pub fn tally_tier_counts<'a, I>(
    entries: I,
    winning: &[u32; NUMBERS_PER_TICKET],
) -> Result<TierCounts>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut counts = TierCounts::default();
    for entry in entries {
        if let Some(tier) = PrizeTier::from_matches(count_matches(&entry.numbers, winning)) {
            counts.increment(tier)?;
        }
    }
    Ok(counts)
}
