use soroban_sdk::{Address, Env, Map, String, Vec};

use crate::collaborators::EscrowSourceClient;
use crate::errors::Error;
use crate::events;
use crate::fees;
use crate::pool;
use crate::selection;
use crate::storage;
use crate::types::{
    ArbitrationConfig, Dispute, DisputeStatus, Evidence, PanelTier, Resolution,
    ResolutionMethod, SelectionRequest, VoteChoice,
};

/// Outcome applied when a panel fails to reach majority before its deadline:
/// funds go back to the buyer.
pub const DEFAULT_OUTCOME: VoteChoice = VoteChoice::Refund;

pub const MAX_EVIDENCE: u32 = 50;
pub const MAX_REFERENCE_LEN: u32 = 256;

pub fn is_party(dispute: &Dispute, who: &Address) -> bool {
    &dispute.buyer == who || &dispute.seller == who
}

/// Disputants in the order their selection secrets enter the seed.
pub fn participants(env: &Env, dispute: &Dispute) -> Vec<Address> {
    let mut parties = Vec::new(env);
    parties.push_back(dispute.buyer.clone());
    parties.push_back(dispute.seller.clone());
    parties
}

pub fn opposite(outcome: VoteChoice) -> VoteChoice {
    match outcome {
        VoteChoice::Release => VoteChoice::Refund,
        VoteChoice::Refund => VoteChoice::Release,
        VoteChoice::Unset => VoteChoice::Unset,
    }
}

pub fn open(
    env: &Env,
    config: &ArbitrationConfig,
    caller: &Address,
    escrow_id: u64,
) -> Result<Dispute, Error> {
    let terms = EscrowSourceClient::new(env, &config.escrow_source)
        .get_escrow(&escrow_id)
        .ok_or(Error::EscrowNotFound)?;
    if caller != &terms.buyer && caller != &terms.seller {
        return Err(Error::NotEscrowParty);
    }
    if storage::get_escrow_dispute(env, escrow_id).is_some() {
        return Err(Error::DisputeAlreadyExists);
    }
    if terms.amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let id = storage::next_dispute_id(env);
    let now = env.ledger().timestamp();
    let dispute = Dispute {
        id,
        escrow_id,
        buyer: terms.buyer,
        seller: terms.seller,
        amount: terms.amount,
        status: DisputeStatus::PendingSelection,
        panel: Vec::new(env),
        votes: Map::new(env),
        release_votes: 0,
        refund_votes: 0,
        evidence: Vec::new(env),
        created_at: now,
        deadline: now + config.voting_period,
    };

    let parties = participants(env, &dispute);
    selection::request(env, config, id, PanelTier::Initial, parties.clone(), parties)?;
    storage::set_dispute(env, &dispute);
    storage::set_escrow_dispute(env, escrow_id, id);

    events::emit_dispute_created(env, id, escrow_id, caller.clone(), dispute.amount);
    Ok(dispute)
}

pub fn assign_panel(
    env: &Env,
    config: &ArbitrationConfig,
    dispute: &mut Dispute,
    panel: Vec<Address>,
) {
    dispute.panel = panel;
    dispute.status = DisputeStatus::Active;
    dispute.deadline = env.ledger().timestamp() + config.voting_period;
}

pub fn add_evidence(
    env: &Env,
    dispute: &mut Dispute,
    submitter: &Address,
    reference: String,
) -> Result<(), Error> {
    match dispute.status {
        DisputeStatus::PendingSelection | DisputeStatus::Active | DisputeStatus::Appealed => {}
        DisputeStatus::Resolved | DisputeStatus::DefaultResolved => {
            return Err(Error::EvidencePeriodClosed)
        }
    }
    let on_appeal_panel = storage::get_appeal(env, dispute.id)
        .map(|appeal| appeal.panel.contains(submitter))
        .unwrap_or(false);
    if !is_party(dispute, submitter) && !dispute.panel.contains(submitter) && !on_appeal_panel {
        return Err(Error::NotEscrowParty);
    }
    if reference.len() == 0 || reference.len() > MAX_REFERENCE_LEN {
        return Err(Error::InvalidInput);
    }
    if dispute.evidence.len() >= MAX_EVIDENCE {
        return Err(Error::EvidenceLimitReached);
    }

    dispute.evidence.push_back(Evidence {
        submitter: submitter.clone(),
        reference: reference.clone(),
        submitted_at: env.ledger().timestamp(),
    });
    events::emit_evidence(env, dispute.id, submitter.clone(), reference);
    Ok(())
}

/// Records one ballot against `panel`. Returns the winning choice once it
/// holds a strict majority of the panel.
pub fn tally_vote(
    votes: &mut Map<Address, VoteChoice>,
    release_votes: &mut u32,
    refund_votes: &mut u32,
    panel: &Vec<Address>,
    arbitrator: &Address,
    choice: VoteChoice,
) -> Result<Option<VoteChoice>, Error> {
    if choice == VoteChoice::Unset {
        return Err(Error::InvalidVoteType);
    }
    if !panel.contains(arbitrator) {
        return Err(Error::NotAssignedArbitrator);
    }
    if votes.contains_key(arbitrator.clone()) {
        return Err(Error::AlreadyVoted);
    }

    votes.set(arbitrator.clone(), choice);
    match choice {
        VoteChoice::Release => *release_votes += 1,
        VoteChoice::Refund => *refund_votes += 1,
        VoteChoice::Unset => {}
    }

    let threshold = selection::majority_threshold(panel.len());
    if *release_votes >= threshold {
        Ok(Some(VoteChoice::Release))
    } else if *refund_votes >= threshold {
        Ok(Some(VoteChoice::Refund))
    } else {
        Ok(None)
    }
}

pub fn cast_vote(
    env: &Env,
    dispute: &mut Dispute,
    arbitrator: &Address,
    choice: VoteChoice,
) -> Result<(), Error> {
    if !matches!(
        dispute.status,
        DisputeStatus::PendingSelection | DisputeStatus::Active
    ) {
        return Err(Error::DisputeAlreadyResolved);
    }

    let outcome = tally_vote(
        &mut dispute.votes,
        &mut dispute.release_votes,
        &mut dispute.refund_votes,
        &dispute.panel,
        arbitrator,
        choice,
    )?;
    events::emit_vote(env, dispute.id, arbitrator.clone(), PanelTier::Initial, choice);

    if let Some(outcome) = outcome {
        resolve_by_majority(env, dispute, outcome)?;
    }
    Ok(())
}

fn majority_of(env: &Env, votes: &Map<Address, VoteChoice>, outcome: VoteChoice) -> Vec<Address> {
    let mut winners = Vec::new(env);
    for (member, ballot) in votes.iter() {
        if ballot == outcome {
            winners.push_back(member);
        }
    }
    winners
}

/// Accrues an even cut of `share` to every voter who sided with `outcome`
/// and credits their score. Returns the undivided remainder.
pub fn reward_majority(
    env: &Env,
    votes: &Map<Address, VoteChoice>,
    outcome: VoteChoice,
    share: i128,
) -> i128 {
    let winners = majority_of(env, votes, outcome);
    let (per_arbitrator, remainder) = fees::split_evenly(share, winners.len());
    for winner in winners.iter() {
        storage::add_accrued(env, &winner, per_arbitrator);
        pool::credit_majority_vote(env, &winner);
    }
    remainder
}

/// Reverses the accruals of a superseded `reward_majority` call. Returns the
/// remainder that call had sent to the treasury.
pub fn unwind_majority(
    env: &Env,
    votes: &Map<Address, VoteChoice>,
    outcome: VoteChoice,
    share: i128,
) -> i128 {
    let winners = majority_of(env, votes, outcome);
    let (per_arbitrator, remainder) = fees::split_evenly(share, winners.len());
    for winner in winners.iter() {
        storage::add_accrued(env, &winner, -per_arbitrator);
    }
    remainder
}

fn resolve_by_majority(env: &Env, dispute: &mut Dispute, outcome: VoteChoice) -> Result<(), Error> {
    let fee = fees::calculate_fee(dispute.amount)?;

    let remainder = reward_majority(env, &dispute.votes, outcome, fee.arbitrator_share);
    storage::add_validator_pool(env, fee.validator_share);
    storage::add_treasury_accrued(env, fee.treasury_share + remainder);

    dispute.status = DisputeStatus::Resolved;
    storage::set_resolution(
        env,
        dispute.id,
        &Resolution {
            outcome,
            release_votes: dispute.release_votes,
            refund_votes: dispute.refund_votes,
            method: ResolutionMethod::Majority,
            resolved_at: env.ledger().timestamp(),
            fee,
        },
    );
    events::emit_resolved(
        env,
        dispute.id,
        outcome,
        dispute.release_votes,
        dispute.refund_votes,
        fee,
    );
    Ok(())
}

/// Outcome for a dispute whose panel was never drawn. A disputant that
/// revealed while the other did not wins; otherwise the default applies.
fn unformed_panel_outcome(
    dispute: &Dispute,
    pending: Option<SelectionRequest>,
) -> (VoteChoice, ResolutionMethod) {
    let participation = pending.map(|request| {
        (
            selection::has_revealed(&request, &dispute.buyer),
            selection::has_revealed(&request, &dispute.seller),
        )
    });
    match participation {
        Some((true, false)) => (VoteChoice::Refund, ResolutionMethod::Forfeit),
        Some((false, true)) => (VoteChoice::Release, ResolutionMethod::Forfeit),
        _ => (DEFAULT_OUTCOME, ResolutionMethod::Default),
    }
}

/// Closes a dispute whose deadline passed without a majority, whether its
/// panel stalled or was never drawn.
pub fn resolve_by_default(env: &Env, dispute: &mut Dispute) -> Result<(), Error> {
    match dispute.status {
        DisputeStatus::Active | DisputeStatus::PendingSelection => {}
        _ => return Err(Error::DisputeAlreadyResolved),
    }
    if env.ledger().timestamp() < dispute.deadline {
        return Err(Error::DeadlineNotReached);
    }

    let (outcome, method) = if dispute.status == DisputeStatus::PendingSelection {
        let pending = storage::get_selection(env, dispute.id);
        storage::remove_selection(env, dispute.id);
        unformed_panel_outcome(dispute, pending)
    } else {
        (DEFAULT_OUTCOME, ResolutionMethod::Default)
    };

    // No panel earned the arbitrator share.
    let fee = fees::calculate_fee(dispute.amount)?;
    storage::add_validator_pool(env, fee.validator_share);
    storage::add_treasury_accrued(env, fee.arbitrator_share + fee.treasury_share);

    dispute.status = DisputeStatus::DefaultResolved;
    storage::set_resolution(
        env,
        dispute.id,
        &Resolution {
            outcome,
            release_votes: 0,
            refund_votes: 0,
            method,
            resolved_at: env.ledger().timestamp(),
            fee,
        },
    );
    events::emit_default_resolved(env, dispute.id, outcome, fee);
    Ok(())
}
