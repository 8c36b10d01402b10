use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, String, Vec};

use crate::types::{FeeBreakdown, PanelTier, VoteChoice};

// ==================== Event Payload Structs ====================
// Published under ("ARBITR", symbol_short!("…")) topics.

#[derive(Clone)]
#[contracttype]
pub struct StakeEvent {
    pub arbitrator: Address,
    pub amount: i128,
    pub stake: i128,
    pub active: bool,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct DisputeCreatedEvent {
    pub dispute_id: u64,
    pub escrow_id: u64,
    pub opened_by: Address,
    pub amount: i128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct SelectionEvent {
    pub dispute_id: u64,
    pub tier: PanelTier,
    pub ledger: u32,
    /// Empty for requests, the assigned panel for finalizations.
    pub panel: Vec<Address>,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct SeedEvent {
    pub dispute_id: u64,
    pub tier: PanelTier,
    pub party: Address,
    /// The commitment, or the revealed secret.
    pub value: BytesN<32>,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct EvidenceEvent {
    pub dispute_id: u64,
    pub submitter: Address,
    pub reference: String,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct VoteEvent {
    pub dispute_id: u64,
    pub arbitrator: Address,
    pub tier: PanelTier,
    pub choice: VoteChoice,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct ResolvedEvent {
    pub dispute_id: u64,
    pub outcome: VoteChoice,
    pub release_votes: u32,
    pub refund_votes: u32,
    pub fee: FeeBreakdown,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct AppealFiledEvent {
    pub dispute_id: u64,
    pub appellant: Address,
    pub stake: i128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct AppealConcludedEvent {
    pub dispute_id: u64,
    pub outcome: VoteChoice,
    pub overturned: bool,
    /// Appeal stake returned to the appellant (zero when forfeited).
    pub refunded: i128,
    pub timestamp: u64,
}

#[derive(Clone)]
#[contracttype]
pub struct AdminEvent {
    pub admin: Address,
    pub timestamp: u64,
}

// ==================== Emit Functions ====================

pub fn emit_registered(env: &Env, arbitrator: Address, amount: i128, stake: i128) {
    env.events().publish(
        ("ARBITR", symbol_short!("ARB_REG")),
        StakeEvent {
            arbitrator,
            amount,
            stake,
            active: true,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_withdrawn(env: &Env, arbitrator: Address, amount: i128, stake: i128, active: bool) {
    env.events().publish(
        ("ARBITR", symbol_short!("ARB_WDR")),
        StakeEvent {
            arbitrator,
            amount,
            stake,
            active,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_deactivated(env: &Env, arbitrator: Address, stake: i128) {
    env.events().publish(
        ("ARBITR", symbol_short!("ARB_OFF")),
        StakeEvent {
            arbitrator,
            amount: 0,
            stake,
            active: false,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_dispute_created(
    env: &Env,
    dispute_id: u64,
    escrow_id: u64,
    opened_by: Address,
    amount: i128,
) {
    env.events().publish(
        ("ARBITR", symbol_short!("DSP_NEW")),
        DisputeCreatedEvent {
            dispute_id,
            escrow_id,
            opened_by,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_selection_requested(env: &Env, dispute_id: u64, tier: PanelTier) {
    env.events().publish(
        ("ARBITR", symbol_short!("SEL_REQ")),
        SelectionEvent {
            dispute_id,
            tier,
            ledger: env.ledger().sequence(),
            panel: Vec::new(env),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_panel_assigned(env: &Env, dispute_id: u64, tier: PanelTier, panel: Vec<Address>) {
    env.events().publish(
        ("ARBITR", symbol_short!("SEL_FIN")),
        SelectionEvent {
            dispute_id,
            tier,
            ledger: env.ledger().sequence(),
            panel,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_seed_committed(
    env: &Env,
    dispute_id: u64,
    tier: PanelTier,
    party: Address,
    commitment: BytesN<32>,
) {
    env.events().publish(
        ("ARBITR", symbol_short!("SEED_CMT")),
        SeedEvent {
            dispute_id,
            tier,
            party,
            value: commitment,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_seed_revealed(
    env: &Env,
    dispute_id: u64,
    tier: PanelTier,
    party: Address,
    secret: BytesN<32>,
) {
    env.events().publish(
        ("ARBITR", symbol_short!("SEED_RVL")),
        SeedEvent {
            dispute_id,
            tier,
            party,
            value: secret,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_evidence(env: &Env, dispute_id: u64, submitter: Address, reference: String) {
    env.events().publish(
        ("ARBITR", symbol_short!("EVIDENCE")),
        EvidenceEvent {
            dispute_id,
            submitter,
            reference,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_vote(
    env: &Env,
    dispute_id: u64,
    arbitrator: Address,
    tier: PanelTier,
    choice: VoteChoice,
) {
    env.events().publish(
        ("ARBITR", symbol_short!("VOTE")),
        VoteEvent {
            dispute_id,
            arbitrator,
            tier,
            choice,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_resolved(
    env: &Env,
    dispute_id: u64,
    outcome: VoteChoice,
    release_votes: u32,
    refund_votes: u32,
    fee: FeeBreakdown,
) {
    env.events().publish(
        ("ARBITR", symbol_short!("RESOLVED")),
        ResolvedEvent {
            dispute_id,
            outcome,
            release_votes,
            refund_votes,
            fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

/// Covers both the stalled-panel refund and a forfeit by a disputant that
/// never revealed its selection secret.
pub fn emit_default_resolved(env: &Env, dispute_id: u64, outcome: VoteChoice, fee: FeeBreakdown) {
    env.events().publish(
        ("ARBITR", symbol_short!("DEFAULTED")),
        ResolvedEvent {
            dispute_id,
            outcome,
            release_votes: 0,
            refund_votes: 0,
            fee,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_appeal_filed(env: &Env, dispute_id: u64, appellant: Address, stake: i128) {
    env.events().publish(
        ("ARBITR", symbol_short!("APL_NEW")),
        AppealFiledEvent {
            dispute_id,
            appellant,
            stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_appeal_concluded(
    env: &Env,
    dispute_id: u64,
    outcome: VoteChoice,
    overturned: bool,
    refunded: i128,
) {
    env.events().publish(
        ("ARBITR", symbol_short!("APL_END")),
        AppealConcludedEvent {
            dispute_id,
            outcome,
            overturned,
            refunded,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_paused(env: &Env, admin: Address, paused: bool) {
    let topic = if paused {
        symbol_short!("PAUSED")
    } else {
        symbol_short!("UNPAUSED")
    };
    env.events().publish(
        ("ARBITR", topic),
        AdminEvent {
            admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn emit_config_updated(env: &Env, admin: Address) {
    env.events().publish(
        ("ARBITR", symbol_short!("CFG_UPD")),
        AdminEvent {
            admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}
