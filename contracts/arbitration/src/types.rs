use soroban_sdk::{contracttype, Address, BytesN, Map, String, Vec};

// ==================== Enums ====================

/// Lifecycle of a dispute.
///
/// `PendingSelection -> Active -> Resolved`, `Active -> DefaultResolved`,
/// `Resolved -> Appealed -> Resolved` (final).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum DisputeStatus {
    PendingSelection,
    Active,
    Resolved,
    Appealed,
    DefaultResolved,
}

/// A panel member's ballot. `Unset` is the zero value and is never accepted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum VoteChoice {
    Unset,
    Release,
    Refund,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum PanelTier {
    Initial,
    Appeal,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[contracttype]
pub enum ResolutionMethod {
    Majority,
    Default,
    Appeal,
    /// One disputant revealed its selection secret and the other never did.
    Forfeit,
}

// ==================== Records ====================

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ArbitratorEntry {
    pub arbitrator: Address,
    pub stake: i128,
    /// Mirrors `stake >= min_stake`; cleared on withdrawal below the minimum.
    pub active: bool,
    /// Advisory score from the qualification source, plus one per majority vote.
    pub score: i128,
    pub registered_at: u64,
}

/// Terms read from the escrow collaborator.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct EscrowTerms {
    pub buyer: Address,
    pub seller: Address,
    pub amount: i128,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Evidence {
    pub submitter: Address,
    /// Off-chain content reference (IPFS CID, URL hash, ...).
    pub reference: String,
    pub submitted_at: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[contracttype]
pub struct FeeBreakdown {
    pub total: i128,
    pub arbitrator_share: i128,
    pub validator_share: i128,
    pub treasury_share: i128,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Resolution {
    pub outcome: VoteChoice,
    pub release_votes: u32,
    pub refund_votes: u32,
    pub method: ResolutionMethod,
    pub resolved_at: u64,
    pub fee: FeeBreakdown,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct AppealRecord {
    pub appellant: Address,
    pub stake: i128,
    /// Empty until the appeal selection is finalized.
    pub panel: Vec<Address>,
    pub votes: Map<Address, VoteChoice>,
    pub release_votes: u32,
    pub refund_votes: u32,
    pub original_outcome: VoteChoice,
    pub outcome: VoteChoice,
    pub overturned: bool,
    pub concluded: bool,
    pub filed_at: u64,
    /// Provisional from filing; restarted when the appeal panel is assigned.
    pub deadline: u64,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Dispute {
    pub id: u64,
    pub escrow_id: u64,
    pub buyer: Address,
    pub seller: Address,
    pub amount: i128,
    pub status: DisputeStatus,
    pub panel: Vec<Address>,
    pub votes: Map<Address, VoteChoice>,
    pub release_votes: u32,
    pub refund_votes: u32,
    pub evidence: Vec<Evidence>,
    pub created_at: u64,
    /// Provisional from creation; restarted when the initial panel is assigned.
    pub deadline: u64,
}

/// Phase one of panel selection. Holds no randomness of its own: the seed
/// comes from secrets the disputants commit to before `requested_ledger +
/// selection_delay` and reveal afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct SelectionRequest {
    pub dispute_id: u64,
    pub tier: PanelTier,
    pub panel_size: u32,
    /// Disputants who must commit and reveal.
    pub participants: Vec<Address>,
    pub excluded: Vec<Address>,
    /// Eligible pool at request time, in pool order.
    pub candidates: Vec<Address>,
    pub requested_ledger: u32,
    pub commitments: Map<Address, BytesN<32>>,
    pub reveals: Map<Address, BytesN<32>>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct ArbitrationConfig {
    pub admin: Address,
    pub stake_token: Address,
    pub escrow_source: Address,
    pub qualification_source: Address,
    pub min_stake: i128,
    /// Length of the commit window in ledgers. Reveals and finalize open
    /// once it has closed.
    pub selection_delay: u32,
    /// Seconds a panel has to reach majority.
    pub voting_period: u64,
}

// ==================== Storage Keys ====================

#[contracttype]
pub enum DataKey {
    // Instance storage
    Config,
    Paused,
    DisputeCount,
    ValidatorPool,
    TreasuryAccrued,
    ForfeitedStakes,

    // Persistent storage
    PoolIndex, // Map<Address, i128> stake of every active arbitrator
    Arbitrator(Address),
    Dispute(u64),
    Resolution(u64),
    Appeal(u64),
    EscrowDispute(u64),
    Selection(u64),
    Accrued(Address),
}
