use anchor_lang::prelude::*;
use solana_program::keccak;

use crate::constants::{MAX_DRAW_BLOCKS, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_TICKET};
use crate::error::ErrorCode;

/// Count of drawable numbers.
const SPAN: u64 = (MAX_NUMBER - MIN_NUMBER + 1) as u64;

/// Candidates at or above this bound would favour the low numbers and are
/// rejected; it is the largest multiple of `SPAN` within the `u32` range.
const ACCEPT_BELOW: u64 = (1u64 << 32) / SPAN * SPAN;

/// Derives the winning numbers for a draw from one revealed seed.
///
/// The seed is stretched into blocks of `keccak(seed || block_index)`, each
/// cut into eight little-endian `u32` candidates. A candidate is discarded
/// when it falls in the biased tail or repeats a number already drawn, so
/// every number in range is equally likely at each pick. The same seed
/// always yields the same numbers, which are returned ascending.
pub fn derive_winning_numbers(seed: &[u8; 32]) -> Result<[u32; NUMBERS_PER_TICKET]> {
    let mut drawn = [0u32; NUMBERS_PER_TICKET];
    let mut filled = 0;

    for block in 0..MAX_DRAW_BLOCKS {
        let digest = keccak::hashv(&[seed.as_ref(), &block.to_le_bytes()]).to_bytes();

        for chunk in digest.chunks_exact(4) {
            let raw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if u64::from(raw) >= ACCEPT_BELOW {
                continue;
            }

            let candidate = MIN_NUMBER + (u64::from(raw) % SPAN) as u32;
            if drawn[..filled].contains(&candidate) {
                continue;
            }

            drawn[filled] = candidate;
            filled += 1;
            if filled == NUMBERS_PER_TICKET {
                drawn.sort_unstable();
                return Ok(drawn);
            }
        }
    }

    msg!("Seed exhausted after {} blocks", MAX_DRAW_BLOCKS);
    Err(ErrorCode::RandomnessExhausted.into())
}
