use soroban_sdk::{token::Client as TokenClient, Address, Env, Map, Vec};

use crate::dispute;
use crate::errors::Error;
use crate::events;
use crate::fees;
use crate::pool;
use crate::selection;
use crate::storage;
use crate::types::{
    AppealRecord, ArbitrationConfig, Dispute, DisputeStatus, PanelTier, ResolutionMethod,
    VoteChoice,
};

/// Escalates a `Resolved` dispute. Returns the stake taken into custody.
pub fn file(
    env: &Env,
    config: &ArbitrationConfig,
    dispute: &mut Dispute,
    appellant: &Address,
) -> Result<i128, Error> {
    if !dispute::is_party(dispute, appellant) {
        return Err(Error::NotEscrowParty);
    }
    if storage::get_appeal(env, dispute.id).is_some() {
        return Err(Error::AppealAlreadyFiled);
    }
    match dispute.status {
        DisputeStatus::Resolved => {}
        DisputeStatus::DefaultResolved => return Err(Error::DisputeAlreadyResolved),
        _ => return Err(Error::DisputeNotResolved),
    }
    let original_outcome = storage::get_resolution(env, dispute.id)
        .map(|resolution| resolution.outcome)
        .ok_or(Error::DisputeNotResolved)?;

    let participants = dispute::participants(env, dispute);
    let mut excluded = participants.clone();
    for member in dispute.panel.iter() {
        excluded.push_back(member);
    }
    selection::request(env, config, dispute.id, PanelTier::Appeal, participants, excluded)?;

    let stake = fees::appeal_stake(dispute.amount)?;
    if stake > 0 {
        let token = TokenClient::new(env, &config.stake_token);
        if token.balance(appellant) < stake {
            return Err(Error::InsufficientStake);
        }
        token.transfer(appellant, &env.current_contract_address(), &stake);
    }

    let now = env.ledger().timestamp();
    storage::set_appeal(
        env,
        dispute.id,
        &AppealRecord {
            appellant: appellant.clone(),
            stake,
            panel: Vec::new(env),
            votes: Map::new(env),
            release_votes: 0,
            refund_votes: 0,
            original_outcome,
            outcome: VoteChoice::Unset,
            overturned: false,
            concluded: false,
            filed_at: now,
            deadline: now + config.voting_period,
        },
    );
    dispute.status = DisputeStatus::Appealed;

    events::emit_appeal_filed(env, dispute.id, appellant.clone(), stake);
    Ok(stake)
}

pub fn assign_panel(
    env: &Env,
    config: &ArbitrationConfig,
    dispute: &Dispute,
    panel: Vec<Address>,
) -> Result<(), Error> {
    let mut appeal = storage::get_appeal(env, dispute.id).ok_or(Error::DisputeNotResolved)?;
    appeal.panel = panel;
    appeal.deadline = env.ledger().timestamp() + config.voting_period;
    storage::set_appeal(env, dispute.id, &appeal);
    Ok(())
}

pub fn cast_vote(
    env: &Env,
    config: &ArbitrationConfig,
    dispute: &mut Dispute,
    arbitrator: &Address,
    choice: VoteChoice,
) -> Result<(), Error> {
    if dispute.status != DisputeStatus::Appealed {
        return Err(Error::DisputeAlreadyResolved);
    }
    let mut appeal = storage::get_appeal(env, dispute.id).ok_or(Error::DisputeNotResolved)?;

    let outcome = dispute::tally_vote(
        &mut appeal.votes,
        &mut appeal.release_votes,
        &mut appeal.refund_votes,
        &appeal.panel,
        arbitrator,
        choice,
    )?;
    events::emit_vote(env, dispute.id, arbitrator.clone(), PanelTier::Appeal, choice);

    match outcome {
        Some(outcome) => conclude(env, config, dispute, appeal, outcome),
        None => {
            storage::set_appeal(env, dispute.id, &appeal);
            Ok(())
        }
    }
}

/// Applies the appeal panel's majority. A different outcome supersedes the
/// original resolution and returns the bond; the same outcome forfeits it.
fn conclude(
    env: &Env,
    config: &ArbitrationConfig,
    dispute: &mut Dispute,
    appeal: AppealRecord,
    outcome: VoteChoice,
) -> Result<(), Error> {
    let overturned = outcome != appeal.original_outcome;
    let refunded = if overturned {
        overturn(env, config, dispute, &appeal, outcome, ResolutionMethod::Appeal)?;
        appeal.stake
    } else {
        // Upheld: the original accruals stand, the appeal panel earns score only.
        for (member, ballot) in appeal.votes.iter() {
            if ballot == outcome {
                pool::credit_majority_vote(env, &member);
            }
        }
        storage::add_forfeited_stakes(env, appeal.stake);
        0
    };
    close(env, dispute, appeal, outcome, overturned, refunded);
    Ok(())
}

/// Supersedes the original resolution with `outcome` and returns the bond.
/// The arbitrator share moves from the original majority to the appeal
/// majority, or to the treasury when no appeal panel voted.
fn overturn(
    env: &Env,
    config: &ArbitrationConfig,
    dispute: &Dispute,
    appeal: &AppealRecord,
    outcome: VoteChoice,
    method: ResolutionMethod,
) -> Result<(), Error> {
    let mut resolution = storage::get_resolution(env, dispute.id).ok_or(Error::DisputeNotResolved)?;
    let share = resolution.fee.arbitrator_share;
    let unwound = dispute::unwind_majority(env, &dispute.votes, appeal.original_outcome, share);
    let remainder = dispute::reward_majority(env, &appeal.votes, outcome, share);
    storage::add_treasury_accrued(env, remainder - unwound);

    refund_stake(env, config, appeal);

    resolution.outcome = outcome;
    resolution.release_votes = appeal.release_votes;
    resolution.refund_votes = appeal.refund_votes;
    resolution.method = method;
    resolution.resolved_at = env.ledger().timestamp();
    storage::set_resolution(env, dispute.id, &resolution);
    events::emit_resolved(
        env,
        dispute.id,
        outcome,
        appeal.release_votes,
        appeal.refund_votes,
        resolution.fee,
    );
    Ok(())
}

fn close(
    env: &Env,
    dispute: &mut Dispute,
    mut appeal: AppealRecord,
    outcome: VoteChoice,
    overturned: bool,
    refunded: i128,
) {
    appeal.outcome = outcome;
    appeal.overturned = overturned;
    appeal.concluded = true;
    storage::set_appeal(env, dispute.id, &appeal);
    dispute.status = DisputeStatus::Resolved;
    events::emit_appeal_concluded(env, dispute.id, outcome, overturned, refunded);
}

/// Closes an appeal whose deadline passed without a majority.
///
/// If the appeal panel was never drawn because one disputant withheld its
/// selection secret, that disputant loses: a silent appellant forfeits the
/// bond, a silent appellee sees the resolution overturned. In every other
/// case the original resolution stands and the bond is returned.
pub fn conclude_stalled(
    env: &Env,
    config: &ArbitrationConfig,
    dispute: &mut Dispute,
) -> Result<(), Error> {
    match dispute.status {
        DisputeStatus::Appealed => {}
        DisputeStatus::PendingSelection | DisputeStatus::Active => {
            return Err(Error::DisputeNotResolved)
        }
        _ => return Err(Error::DisputeAlreadyResolved),
    }
    let appeal = storage::get_appeal(env, dispute.id).ok_or(Error::DisputeNotResolved)?;
    if env.ledger().timestamp() < appeal.deadline {
        return Err(Error::DeadlineNotReached);
    }

    let pending = storage::get_selection(env, dispute.id);
    storage::remove_selection(env, dispute.id);
    let appellee = if appeal.appellant == dispute.buyer {
        dispute.seller.clone()
    } else {
        dispute.buyer.clone()
    };
    let participation = pending.map(|request| {
        (
            selection::has_revealed(&request, &appeal.appellant),
            selection::has_revealed(&request, &appellee),
        )
    });

    let original = appeal.original_outcome;
    match participation {
        Some((true, false)) => {
            let outcome = dispute::opposite(original);
            overturn(env, config, dispute, &appeal, outcome, ResolutionMethod::Forfeit)?;
            let refunded = appeal.stake;
            close(env, dispute, appeal, outcome, true, refunded);
        }
        Some((false, true)) => {
            storage::add_forfeited_stakes(env, appeal.stake);
            close(env, dispute, appeal, original, false, 0);
        }
        _ => {
            refund_stake(env, config, &appeal);
            let refunded = appeal.stake;
            close(env, dispute, appeal, original, false, refunded);
        }
    }
    Ok(())
}

fn refund_stake(env: &Env, config: &ArbitrationConfig, appeal: &AppealRecord) {
    if appeal.stake > 0 {
        TokenClient::new(env, &config.stake_token).transfer(
            &env.current_contract_address(),
            &appeal.appellant,
            &appeal.stake,
        );
    }
}
