use soroban_sdk::{Address, Env, Map};

use crate::errors::Error;
use crate::types::{
    AppealRecord, ArbitrationConfig, ArbitratorEntry, DataKey, Dispute, Resolution,
    SelectionRequest,
};

// Roughly 30 days of 5s ledgers; refreshed whenever an entry is written.
const PERSISTENT_TTL_THRESHOLD: u32 = 100_000;
const PERSISTENT_TTL_EXTEND: u32 = 518_400;

fn bump(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

// ------ Config / lifecycle ------

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> Result<ArbitrationConfig, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn set_config(env: &Env, config: &ArbitrationConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

// ------ Pool ------

/// Stake of every active arbitrator, so eligibility is one ledger read.
pub fn get_pool_index(env: &Env) -> Map<Address, i128> {
    env.storage()
        .persistent()
        .get(&DataKey::PoolIndex)
        .unwrap_or_else(|| Map::new(env))
}

pub fn set_pool_index(env: &Env, index: &Map<Address, i128>) {
    env.storage().persistent().set(&DataKey::PoolIndex, index);
    bump(env, &DataKey::PoolIndex);
}

pub fn get_arbitrator(env: &Env, arbitrator: &Address) -> Option<ArbitratorEntry> {
    env.storage()
        .persistent()
        .get(&DataKey::Arbitrator(arbitrator.clone()))
}

pub fn set_arbitrator(env: &Env, entry: &ArbitratorEntry) {
    let key = DataKey::Arbitrator(entry.arbitrator.clone());
    env.storage().persistent().set(&key, entry);
    bump(env, &key);
}

// ------ Disputes ------

pub fn next_dispute_id(env: &Env) -> u64 {
    let id: u64 = env
        .storage()
        .instance()
        .get(&DataKey::DisputeCount)
        .unwrap_or(0)
        + 1;
    env.storage().instance().set(&DataKey::DisputeCount, &id);
    id
}

pub fn get_dispute_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::DisputeCount)
        .unwrap_or(0)
}

pub fn get_dispute(env: &Env, dispute_id: u64) -> Result<Dispute, Error> {
    env.storage()
        .persistent()
        .get(&DataKey::Dispute(dispute_id))
        .ok_or(Error::DisputeNotFound)
}

pub fn set_dispute(env: &Env, dispute: &Dispute) {
    let key = DataKey::Dispute(dispute.id);
    env.storage().persistent().set(&key, dispute);
    bump(env, &key);
}

pub fn get_resolution(env: &Env, dispute_id: u64) -> Option<Resolution> {
    env.storage()
        .persistent()
        .get(&DataKey::Resolution(dispute_id))
}

pub fn set_resolution(env: &Env, dispute_id: u64, resolution: &Resolution) {
    let key = DataKey::Resolution(dispute_id);
    env.storage().persistent().set(&key, resolution);
    bump(env, &key);
}

pub fn get_appeal(env: &Env, dispute_id: u64) -> Option<AppealRecord> {
    env.storage().persistent().get(&DataKey::Appeal(dispute_id))
}

pub fn set_appeal(env: &Env, dispute_id: u64, appeal: &AppealRecord) {
    let key = DataKey::Appeal(dispute_id);
    env.storage().persistent().set(&key, appeal);
    bump(env, &key);
}

pub fn get_escrow_dispute(env: &Env, escrow_id: u64) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::EscrowDispute(escrow_id))
}

pub fn set_escrow_dispute(env: &Env, escrow_id: u64, dispute_id: u64) {
    let key = DataKey::EscrowDispute(escrow_id);
    env.storage().persistent().set(&key, &dispute_id);
    bump(env, &key);
}

// ------ Selection requests ------

pub fn get_selection(env: &Env, dispute_id: u64) -> Option<SelectionRequest> {
    env.storage()
        .persistent()
        .get(&DataKey::Selection(dispute_id))
}

pub fn set_selection(env: &Env, request: &SelectionRequest) {
    let key = DataKey::Selection(request.dispute_id);
    env.storage().persistent().set(&key, request);
    bump(env, &key);
}

pub fn remove_selection(env: &Env, dispute_id: u64) {
    env.storage()
        .persistent()
        .remove(&DataKey::Selection(dispute_id));
}

// ------ Payable ledger ------

pub fn get_accrued(env: &Env, who: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Accrued(who.clone()))
        .unwrap_or(0)
}

/// `delta` may be negative when a superseded resolution is unwound.
pub fn add_accrued(env: &Env, who: &Address, delta: i128) {
    let key = DataKey::Accrued(who.clone());
    let current = get_accrued(env, who);
    env.storage().persistent().set(&key, &(current + delta));
    bump(env, &key);
}

fn get_counter(env: &Env, key: &DataKey) -> i128 {
    env.storage().instance().get(key).unwrap_or(0)
}

fn add_counter(env: &Env, key: &DataKey, delta: i128) {
    let current = get_counter(env, key);
    env.storage().instance().set(key, &(current + delta));
}

pub fn get_validator_pool(env: &Env) -> i128 {
    get_counter(env, &DataKey::ValidatorPool)
}

pub fn add_validator_pool(env: &Env, delta: i128) {
    add_counter(env, &DataKey::ValidatorPool, delta);
}

pub fn get_treasury_accrued(env: &Env) -> i128 {
    get_counter(env, &DataKey::TreasuryAccrued)
}

pub fn add_treasury_accrued(env: &Env, delta: i128) {
    add_counter(env, &DataKey::TreasuryAccrued, delta);
}

pub fn get_forfeited_stakes(env: &Env) -> i128 {
    get_counter(env, &DataKey::ForfeitedStakes)
}

pub fn add_forfeited_stakes(env: &Env, delta: i128) {
    add_counter(env, &DataKey::ForfeitedStakes, delta);
}
