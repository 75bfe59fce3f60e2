//! In-memory replica of the lottery state machine.
//!
//! `LotteryLedger` owns every round, entry and per-player index explicitly
//! and drives them through the same `Round`/`Entry` transitions, draw
//! derivation and prize arithmetic the on-chain instructions use. Anyone can
//! replay a round's purchases, revealed seed and settlements through it and
//! arrive at the same payouts to the micro-unit.
//!
//! Each operation either commits completely or returns an error with the
//! ledger untouched: state changes are staged on copies, funds move through
//! one all-or-nothing `FundsTransfer::commit`, and only then are the staged
//! copies written back.

use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::constants::{NUMBERS_PER_TICKET, TICKET_PRICE};
use crate::draw::derive_winning_numbers;
use crate::error::ErrorCode;
use crate::numbers::{tally_tier_counts, validate_selection};
use crate::prize::{self, PrizeSchedule};
use crate::settlement::{apply_settlement, plan_settlement, Settlement};
use crate::state::{Entry, Moment, PlayerEntries, PrizeTier, Round, RoundStatus, TierCounts};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u64,
}

/// Moves funds on behalf of the ledger.
pub trait FundsTransfer {
    /// Applies every transfer in `transfers`, or none of them.
    fn commit(&mut self, transfers: &[Transfer]) -> Result<()>;
}

/// Supplies the opaque seed behind a round's draw.
pub trait RandomnessSource {
    fn reveal(&mut self, round_id: u64) -> Result<[u8; 32]>;
}

/// A seed that has already been revealed, e.g. read back from the oracle
/// account an on-chain draw consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealedSeed(pub [u8; 32]);

impl RandomnessSource for RevealedSeed {
    fn reveal(&mut self, _round_id: u64) -> Result<[u8; 32]> {
        Ok(self.0)
    }
}

/// Plain balance sheet implementing `FundsTransfer`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Balances {
    accounts: BTreeMap<Pubkey, u64>,
}

impl Balances {
    pub fn balance_of(&self, owner: &Pubkey) -> u64 {
        self.accounts.get(owner).copied().unwrap_or(0)
    }

    pub fn deposit(&mut self, owner: Pubkey, amount: u64) -> Result<()> {
        let balance = self.accounts.entry(owner).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
        Ok(())
    }
}

impl FundsTransfer for Balances {
    fn commit(&mut self, transfers: &[Transfer]) -> Result<()> {
        let mut staged = self.accounts.clone();
        for transfer in transfers {
            let from = staged.entry(transfer.from).or_insert(0);
            *from = from
                .checked_sub(transfer.amount)
                .ok_or_else(|| error!(ErrorCode::InsufficientFunds))?;

            let to = staged.entry(transfer.to).or_insert(0);
            *to = to
                .checked_add(transfer.amount)
                .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
        }
        self.accounts = staged;
        Ok(())
    }
}

/// An entry together with how it fared in the draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketInfo {
    pub entry: Entry,
    pub matches: u8,
    pub is_winner: bool,
}

/// A round as seen by one player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSummary {
    pub round_id: u64,
    pub status: RoundStatus,
    pub is_drawn: bool,
    pub winning_numbers: Vec<u32>,
    pub total_pool: u64,
    pub draw_timestamp: i64,
    pub player_entry_ids: Vec<u64>,
}

impl RoundSummary {
    pub fn player_ticket_count(&self) -> usize {
        self.player_entry_ids.len()
    }
}

#[derive(Clone, Debug)]
pub struct LotteryLedger {
    authority: Pubkey,
    vault: Pubkey,
    now: Moment,
    current_round: u64,
    rounds: BTreeMap<u64, Round>,
    entries: BTreeMap<u64, Vec<Entry>>,
    player_entries: BTreeMap<(u64, Pubkey), PlayerEntries>,
}

impl LotteryLedger {
    /// `authority` administers rounds; `vault` holds every ticket payment.
    pub fn new(authority: Pubkey, vault: Pubkey, now: Moment) -> Self {
        Self {
            authority,
            vault,
            now,
            current_round: 0,
            rounds: BTreeMap::new(),
            entries: BTreeMap::new(),
            player_entries: BTreeMap::new(),
        }
    }

    pub fn authority(&self) -> Pubkey {
        self.authority
    }

    pub fn vault(&self) -> Pubkey {
        self.vault
    }

    pub fn now(&self) -> Moment {
        self.now
    }

    /// Moves the ledger clock. Time never runs backwards.
    pub fn set_clock(&mut self, now: Moment) {
        if now.slot >= self.now.slot {
            self.now = now;
        }
    }

    pub fn advance_slots(&mut self, slots: u64) {
        self.now.slot = self.now.slot.saturating_add(slots);
    }

    fn ensure_authority(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.authority, ErrorCode::NotAuthorized);
        Ok(())
    }

    fn round_ref(&self, round_id: u64) -> Result<&Round> {
        self.rounds
            .get(&round_id)
            .ok_or_else(|| error!(ErrorCode::RoundNotFound))
    }

    fn round_mut(&mut self, round_id: u64) -> Result<&mut Round> {
        self.rounds
            .get_mut(&round_id)
            .ok_or_else(|| error!(ErrorCode::RoundNotFound))
    }

    fn entry_ref(&self, round_id: u64, entry_id: u64) -> Result<&Entry> {
        self.entries
            .get(&round_id)
            .and_then(|entries| usize::try_from(entry_id).ok().and_then(|i| entries.get(i)))
            .ok_or_else(|| error!(ErrorCode::EntryNotFound))
    }

    // ------------------------------------------------------------------
    // Round ledger
    // ------------------------------------------------------------------

    pub fn create_round(&mut self, caller: &Pubkey, duration: u64) -> Result<u64> {
        self.ensure_authority(caller)?;
        let round_id = self
            .current_round
            .checked_add(1)
            .ok_or_else(|| error!(ErrorCode::ArithmeticOverflow))?;
        let round = Round::open(round_id, self.now, duration, 0)?;

        msg!(
            "Round {} open from slot {} to {}",
            round_id,
            round.start_slot,
            round.end_slot
        );
        self.rounds.insert(round_id, round);
        self.entries.insert(round_id, Vec::new());
        self.current_round = round_id;
        Ok(round_id)
    }

    /// Sells `caller` one ticket in `round_id` for `TICKET_PRICE`.
    pub fn buy_ticket<F: FundsTransfer>(
        &mut self,
        funds: &mut F,
        caller: &Pubkey,
        round_id: u64,
        numbers: &[u32],
        charity: Option<Pubkey>,
    ) -> Result<u64> {
        let mut round = self.round_ref(round_id)?.clone();
        round.ensure_accepting(self.now.slot)?;
        let numbers = validate_selection(numbers)?;

        let mut held = self
            .player_entries
            .get(&(round_id, *caller))
            .cloned()
            .unwrap_or_else(|| PlayerEntries::new(round_id, *caller));
        held.ensure_capacity()?;

        let entry_id = round.record_ticket(self.now.slot, TICKET_PRICE)?;
        held.record(entry_id)?;
        let entry = Entry::new(
            round_id,
            entry_id,
            *caller,
            numbers,
            charity,
            self.now.unix_timestamp,
            0,
        );

        funds.commit(&[Transfer {
            from: *caller,
            to: self.vault,
            amount: TICKET_PRICE,
        }])?;

        msg!(
            "Entry {} in round {} for {}; pool {}",
            entry_id,
            round_id,
            caller,
            round.total_pool
        );
        self.rounds.insert(round_id, round);
        self.entries.entry(round_id).or_default().push(entry);
        self.player_entries.insert((round_id, *caller), held);
        Ok(entry_id)
    }

    pub fn close_round(&mut self, caller: &Pubkey, round_id: u64) -> Result<()> {
        self.ensure_authority(caller)?;
        self.round_mut(round_id)?.close()?;
        msg!("Round {} closed", round_id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Number draw
    // ------------------------------------------------------------------

    /// Fixes the winning numbers of a closed round. The randomness source is
    /// consulted only after every check passes, at most once per round.
    pub fn draw<R: RandomnessSource>(
        &mut self,
        caller: &Pubkey,
        round_id: u64,
        source: &mut R,
    ) -> Result<[u32; NUMBERS_PER_TICKET]> {
        self.ensure_authority(caller)?;
        let now = self.now;
        self.round_ref(round_id)?.ensure_drawable(now.slot)?;

        let seed = source.reveal(round_id)?;
        let numbers = derive_winning_numbers(&seed)?;
        self.round_mut(round_id)?.record_draw(now, numbers)?;

        msg!("Round {} drew {:?}", round_id, numbers);
        Ok(numbers)
    }

    // ------------------------------------------------------------------
    // Tier winner registry
    // ------------------------------------------------------------------

    /// Full scan of the round's entries against its winning numbers.
    pub fn tally_round(&self, round_id: u64) -> Result<TierCounts> {
        let round = self.round_ref(round_id)?;
        require!(round.is_drawn, ErrorCode::NotDrawn);
        let entries = self.entries.get(&round_id).map(Vec::as_slice).unwrap_or(&[]);
        tally_tier_counts(entries, &round.winning_numbers)
    }

    /// Records externally tallied winner counts verbatim.
    pub fn finalize_round_winners(
        &mut self,
        caller: &Pubkey,
        round_id: u64,
        three: u64,
        four: u64,
        five: u64,
        six: u64,
    ) -> Result<()> {
        self.ensure_authority(caller)?;
        let counts = TierCounts::new(three, four, five, six);
        self.round_mut(round_id)?.finalize_winners(counts)?;
        msg!("Round {} winners finalized: {:?}", round_id, counts);
        Ok(())
    }

    /// Finalizes with counts recomputed from the round's own entries.
    pub fn finalize_round_winners_from_scan(
        &mut self,
        caller: &Pubkey,
        round_id: u64,
    ) -> Result<TierCounts> {
        self.ensure_authority(caller)?;
        let counts = self.tally_round(round_id)?;
        self.finalize_round_winners(
            caller,
            round_id,
            counts.three,
            counts.four,
            counts.five,
            counts.six,
        )?;
        Ok(counts)
    }

    /// `0` for unknown rounds and rounds not yet finalized.
    pub fn get_tier_winner_count(&self, round_id: u64, tier: PrizeTier) -> u64 {
        self.rounds
            .get(&round_id)
            .map_or(0, |round| round.tier_winner_count(tier))
    }

    // ------------------------------------------------------------------
    // Prize calculator
    // ------------------------------------------------------------------

    pub fn calculate_gross_prize(&self, round_id: u64, tier: PrizeTier, total_pool: u64) -> u64 {
        prize::gross_prize(
            total_pool,
            tier,
            self.get_tier_winner_count(round_id, tier),
        )
    }

    pub fn calculate_net_prize(&self, round_id: u64, tier: PrizeTier, total_pool: u64) -> u64 {
        prize::net_of_fee(self.calculate_gross_prize(round_id, tier, total_pool))
    }

    pub fn calculate_charity_share_per_winner(&self, round_id: u64, total_pool: u64) -> u64 {
        prize::charity_share_per_winner(
            total_pool,
            self.get_tier_winner_count(round_id, PrizeTier::Six),
        )
    }

    pub fn calculate_net_charity_per_winner(&self, round_id: u64, total_pool: u64) -> u64 {
        prize::net_of_fee(self.calculate_charity_share_per_winner(round_id, total_pool))
    }

    pub fn prize_schedule(&self, round_id: u64) -> Result<PrizeSchedule> {
        Ok(self.round_ref(round_id)?.prize_schedule())
    }

    // ------------------------------------------------------------------
    // Disbursement
    // ------------------------------------------------------------------

    /// Pays out one entry. Anyone may trigger it; the prize always goes to
    /// the entry's owner and the charity share to its recorded charity.
    pub fn settle_entry<F: FundsTransfer>(
        &mut self,
        funds: &mut F,
        round_id: u64,
        entry_id: u64,
    ) -> Result<Settlement> {
        let mut round = self.round_ref(round_id)?.clone();
        let mut entry = self.entry_ref(round_id, entry_id)?.clone();

        let settlement = plan_settlement(&round, &entry)?;
        apply_settlement(&mut round, &mut entry, &settlement)?;

        let transfers: Vec<Transfer> = settlement
            .payouts()
            .map(|payout| Transfer {
                from: self.vault,
                to: payout.recipient,
                amount: payout.amount,
            })
            .collect();
        funds.commit(&transfers)?;

        msg!(
            "Entry {} in round {} settled with {} matches, paid {}",
            entry_id,
            round_id,
            settlement.matches,
            settlement.amount_paid()
        );
        if round.all_winners_paid {
            msg!("Round {} fully paid", round_id);
        }

        self.rounds.insert(round_id, round);
        if let Some(slot) = self
            .entries
            .get_mut(&round_id)
            .and_then(|entries| entries.get_mut(entry.entry_id as usize))
        {
            *slot = entry;
        }
        Ok(settlement)
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn ticket_price(&self) -> u64 {
        TICKET_PRICE
    }

    /// Id of the latest round, `0` before any round exists.
    pub fn current_round(&self) -> u64 {
        self.current_round
    }

    pub fn round(&self, round_id: u64) -> Option<&Round> {
        self.rounds.get(&round_id)
    }

    pub fn round_status(&self, round_id: u64) -> Result<RoundStatus> {
        Ok(self.round_ref(round_id)?.status(self.now.slot))
    }

    pub fn entry(&self, round_id: u64, entry_id: u64) -> Option<&Entry> {
        self.entry_ref(round_id, entry_id).ok()
    }

    pub fn entries(&self, round_id: u64) -> &[Entry] {
        self.entries.get(&round_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn player_entries(&self, round_id: u64, player: &Pubkey) -> &[u64] {
        self.player_entries
            .get(&(round_id, *player))
            .map(|held| held.entry_ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn player_total_tickets(&self, player: &Pubkey) -> u64 {
        self.player_entries
            .iter()
            .filter(|((_, owner), _)| owner == player)
            .map(|(_, held)| held.entry_ids.len() as u64)
            .sum()
    }

    /// Match count of an entry, `0` until its round is drawn.
    pub fn check_winner(&self, round_id: u64, entry_id: u64) -> Result<u8> {
        let round = self.round_ref(round_id)?;
        Ok(self.entry_ref(round_id, entry_id)?.matches(round))
    }

    pub fn ticket_info(&self, round_id: u64, entry_id: u64) -> Result<TicketInfo> {
        let round = self.round_ref(round_id)?;
        let entry = self.entry_ref(round_id, entry_id)?;
        Ok(TicketInfo {
            entry: entry.clone(),
            matches: entry.matches(round),
            is_winner: entry.is_winner(round),
        })
    }

    pub fn player_has_winners(&self, round_id: u64, player: &Pubkey) -> bool {
        let Some(round) = self.rounds.get(&round_id) else {
            return false;
        };
        self.player_entries(round_id, player)
            .iter()
            .filter_map(|&entry_id| self.entry_ref(round_id, entry_id).ok())
            .any(|entry| entry.is_winner(round))
    }

    pub fn round_summary_for_player(&self, round_id: u64, player: &Pubkey) -> Result<RoundSummary> {
        let round = self.round_ref(round_id)?;
        Ok(RoundSummary {
            round_id,
            status: round.status(self.now.slot),
            is_drawn: round.is_drawn,
            winning_numbers: round.winning_numbers().to_vec(),
            total_pool: round.total_pool,
            draw_timestamp: round.draw_timestamp,
            player_entry_ids: self.player_entries(round_id, player).to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    struct CountingSource {
        seed: [u8; 32],
        reveals: u32,
    }

    impl RandomnessSource for CountingSource {
        fn reveal(&mut self, _round_id: u64) -> Result<[u8; 32]> {
            self.reveals += 1;
            Ok(self.seed)
        }
    }

    struct Fixture {
        ledger: LotteryLedger,
        funds: Balances,
        admin: Pubkey,
        player: Pubkey,
    }

    fn fixture() -> Fixture {
        let admin = Pubkey::new_unique();
        let player = Pubkey::new_unique();
        let mut funds = Balances::default();
        funds.deposit(player, 10 * TICKET_PRICE).unwrap();
        Fixture {
            ledger: LotteryLedger::new(
                admin,
                Pubkey::new_unique(),
                Moment::new(1_000, 1_700_000_000),
            ),
            funds,
            admin,
            player,
        }
    }

    #[test]
    fn only_authority_creates_rounds() {
        let mut f = fixture();
        assert_eq!(
            f.ledger.create_round(&f.player, 1000).unwrap_err(),
            ErrorCode::NotAuthorized.into()
        );
        assert_eq!(
            f.ledger.create_round(&f.admin, 0).unwrap_err(),
            ErrorCode::InvalidDuration.into()
        );
        assert_eq!(f.ledger.current_round(), 0);
        assert_eq!(f.ledger.create_round(&f.admin, 1000).unwrap(), 1);
        assert_eq!(f.ledger.create_round(&f.admin, 1000).unwrap(), 2);
    }

    #[test]
    fn failed_payment_leaves_round_untouched() {
        let mut f = fixture();
        let round_id = f.ledger.create_round(&f.admin, 1000).unwrap();
        let broke = Pubkey::new_unique();

        assert_eq!(
            f.ledger
                .buy_ticket(&mut f.funds, &broke, round_id, &[1, 2, 3, 4, 5, 6], None)
                .unwrap_err(),
            ErrorCode::InsufficientFunds.into()
        );
        assert_eq!(f.ledger.round(round_id).unwrap().total_pool, 0);
        assert!(f.ledger.entries(round_id).is_empty());
        assert!(f.ledger.player_entries(round_id, &broke).is_empty());
    }

    #[test]
    fn rejected_draw_does_not_consume_randomness() {
        let mut f = fixture();
        let round_id = f.ledger.create_round(&f.admin, 1000).unwrap();
        let mut source = CountingSource {
            seed: [9; 32],
            reveals: 0,
        };

        assert_eq!(
            f.ledger.draw(&f.admin, round_id, &mut source).unwrap_err(),
            ErrorCode::RoundStillOpen.into()
        );
        assert_eq!(
            f.ledger.draw(&f.player, round_id, &mut source).unwrap_err(),
            ErrorCode::NotAuthorized.into()
        );
        assert_eq!(source.reveals, 0);

        f.ledger.close_round(&f.admin, round_id).unwrap();
        f.ledger.draw(&f.admin, round_id, &mut source).unwrap();
        assert!(f.ledger.draw(&f.admin, round_id, &mut source).is_err());
        assert_eq!(source.reveals, 1);
    }

    #[test]
    fn draw_matches_on_chain_derivation() {
        let mut f = fixture();
        let round_id = f.ledger.create_round(&f.admin, 10).unwrap();
        f.ledger.advance_slots(10);

        let seed = [42u8; 32];
        let numbers = f
            .ledger
            .draw(&f.admin, round_id, &mut RevealedSeed(seed))
            .unwrap();
        assert_eq!(numbers, derive_winning_numbers(&seed).unwrap());
        assert_eq!(f.ledger.round(round_id).unwrap().winning_numbers(), &numbers);
    }

    #[test]
    fn settling_unknown_entry_fails() {
        let mut f = fixture();
        let round_id = f.ledger.create_round(&f.admin, 10).unwrap();
        assert_eq!(
            f.ledger.settle_entry(&mut f.funds, round_id, 0).unwrap_err(),
            ErrorCode::EntryNotFound.into()
        );
        assert_eq!(
            f.ledger.settle_entry(&mut f.funds, 99, 0).unwrap_err(),
            ErrorCode::RoundNotFound.into()
        );
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut f = fixture();
        f.ledger.set_clock(Moment::new(10, 0));
        assert_eq!(f.ledger.now().slot, 1_000);
        f.ledger.set_clock(Moment::new(2_000, 5));
        assert_eq!(f.ledger.now(), Moment::new(2_000, 5));
    }
}
