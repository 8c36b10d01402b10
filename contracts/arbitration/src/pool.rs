use soroban_sdk::{token::Client as TokenClient, Address, Env, Vec};

use crate::collaborators::QualificationSourceClient;
use crate::errors::Error;
use crate::events;
use crate::storage;
use crate::types::{ArbitrationConfig, ArbitratorEntry};

/// Upper bound on active arbitrators. Keeps the pool index a single bounded
/// ledger entry that selection can read in one go.
pub const MAX_POOL_MEMBERS: u32 = 100;

pub fn register(
    env: &Env,
    config: &ArbitrationConfig,
    arbitrator: &Address,
    amount: i128,
) -> Result<ArbitratorEntry, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let qualification = QualificationSourceClient::new(env, &config.qualification_source);
    if !qualification.is_qualified(arbitrator) {
        return Err(Error::NotQualified);
    }

    let existing = storage::get_arbitrator(env, arbitrator);
    let new_stake = match &existing {
        Some(entry) => entry.stake + amount,
        None => amount,
    };
    if new_stake < config.min_stake {
        return Err(Error::InsufficientStake);
    }

    let mut index = storage::get_pool_index(env);
    if !index.contains_key(arbitrator.clone()) && index.len() >= MAX_POOL_MEMBERS {
        return Err(Error::PoolFull);
    }

    let token = TokenClient::new(env, &config.stake_token);
    if token.balance(arbitrator) < amount {
        return Err(Error::InsufficientStake);
    }
    token.transfer(arbitrator, &env.current_contract_address(), &amount);

    let entry = match existing {
        Some(mut entry) => {
            entry.stake = new_stake;
            entry.active = true;
            entry
        }
        None => ArbitratorEntry {
            arbitrator: arbitrator.clone(),
            stake: new_stake,
            active: true,
            score: qualification.get_score(arbitrator),
            registered_at: env.ledger().timestamp(),
        },
    };
    storage::set_arbitrator(env, &entry);
    index.set(arbitrator.clone(), entry.stake);
    storage::set_pool_index(env, &index);

    events::emit_registered(env, arbitrator.clone(), amount, entry.stake);
    Ok(entry)
}

pub fn withdraw(
    env: &Env,
    config: &ArbitrationConfig,
    arbitrator: &Address,
    amount: i128,
) -> Result<ArbitratorEntry, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let mut entry = storage::get_arbitrator(env, arbitrator).ok_or(Error::ArbitratorNotFound)?;
    if amount > entry.stake {
        return Err(Error::InsufficientStake);
    }

    entry.stake -= amount;
    let dropped_out = entry.active && entry.stake < config.min_stake;
    if dropped_out {
        entry.active = false;
    }
    storage::set_arbitrator(env, &entry);

    let mut index = storage::get_pool_index(env);
    if entry.active {
        index.set(arbitrator.clone(), entry.stake);
    } else {
        index.remove(arbitrator.clone());
    }
    storage::set_pool_index(env, &index);

    TokenClient::new(env, &config.stake_token).transfer(
        &env.current_contract_address(),
        arbitrator,
        &amount,
    );

    events::emit_withdrawn(env, arbitrator.clone(), amount, entry.stake, entry.active);
    if dropped_out {
        events::emit_deactivated(env, arbitrator.clone(), entry.stake);
    }
    Ok(entry)
}

/// Active members that still meet the current minimum (which the admin may
/// have raised since they staked), in index order.
pub fn eligible_members(env: &Env, min_stake: i128) -> Vec<Address> {
    let mut eligible = Vec::new(env);
    for (member, stake) in storage::get_pool_index(env).iter() {
        if stake >= min_stake {
            eligible.push_back(member);
        }
    }
    eligible
}

pub fn pool_size(env: &Env, min_stake: i128) -> u32 {
    eligible_members(env, min_stake).len()
}

/// Bumps the cumulative score of an arbitrator who sided with the majority.
pub fn credit_majority_vote(env: &Env, arbitrator: &Address) {
    if let Some(mut entry) = storage::get_arbitrator(env, arbitrator) {
        entry.score += 1;
        storage::set_arbitrator(env, &entry);
    }
}
