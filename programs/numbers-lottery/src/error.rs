use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    // Selection and argument validation
    #[msg("Round duration must be greater than zero")]
    InvalidDuration,
    #[msg("A ticket must pick exactly six numbers")]
    InvalidNumberCount,
    #[msg("Ticket numbers must be between 1 and 59")]
    NumberOutOfRange,
    #[msg("Ticket numbers must be distinct")]
    DuplicateNumber,
    #[msg("Prize tier must be 3, 4, 5 or 6")]
    InvalidTier,
    #[msg("Player reached the ticket limit for this round")]
    TooManyEntries,
    #[msg("Lottery mint must use six decimals")]
    InvalidMintDecimals,

    // Round state
    #[msg("Round is not open")]
    RoundNotOpen,
    #[msg("Round has expired")]
    RoundExpired,
    #[msg("Round is already closed")]
    AlreadyClosed,
    #[msg("Round is still open")]
    RoundStillOpen,
    #[msg("Numbers already drawn for this round")]
    AlreadyDrawn,
    #[msg("Numbers not yet drawn for this round")]
    NotDrawn,
    #[msg("Winners already finalized for this round")]
    AlreadyFinalized,
    #[msg("Winners not yet finalized for this round")]
    NotFinalized,
    #[msg("Entry is already settled")]
    AlreadySettled,
    #[msg("More winners settled for this tier than were finalized")]
    TierCountExceeded,

    // Lookups
    #[msg("Round not found")]
    RoundNotFound,
    #[msg("Entry not found")]
    EntryNotFound,

    // Access
    #[msg("Not authorized")]
    NotAuthorized,
    #[msg("Payout account does not belong to the entry owner")]
    IncorrectOwner,
    #[msg("Charity account does not match the entry's charity")]
    IncorrectCharity,

    // Collaborators
    #[msg("Insufficient funds for transfer")]
    InsufficientFunds,
    #[msg("Invalid randomness data")]
    InvalidRandomnessData,
    #[msg("Incorrect randomness account")]
    IncorrectRandomnessAccount,
    #[msg("Randomness already revealed")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness already committed for this round")]
    RandomnessAlreadyCommitted,
    #[msg("Randomness not resolved")]
    RandomnessNotResolved,
    #[msg("Randomness seed exhausted before six numbers were drawn")]
    RandomnessExhausted,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
