//! Two-phase panel selection.
//!
//! `request` snapshots the eligible pool and opens a commit window that
//! closes `selection_delay` ledgers later. Inside the window every disputant
//! commits to `sha256(secret)`; once it has closed they reveal. The seed is
//! derived from the request and the revealed secrets only, so no disputant
//! can know the panel when committing and no caller can change it by
//! repeating or aborting `finalize`.

use soroban_sdk::{log, Address, Bytes, BytesN, Env, Map, Vec};

use crate::errors::Error;
use crate::events;
use crate::pool;
use crate::storage;
use crate::types::{ArbitrationConfig, PanelTier, SelectionRequest};

pub const INITIAL_PANEL_SIZE: u32 = 3;
pub const APPEAL_PANEL_SIZE: u32 = 5;

/// Random draws allowed per pool member before falling back to a scan.
const DRAWS_PER_CANDIDATE: u32 = 4;

pub fn panel_size(tier: PanelTier) -> u32 {
    match tier {
        PanelTier::Initial => INITIAL_PANEL_SIZE,
        PanelTier::Appeal => APPEAL_PANEL_SIZE,
    }
}

/// Strict majority of a panel: 2 of 3, 3 of 5.
pub fn majority_threshold(panel_len: u32) -> u32 {
    panel_len / 2 + 1
}

pub fn commitment_of(env: &Env, secret: &BytesN<32>) -> BytesN<32> {
    env.crypto()
        .sha256(&Bytes::from_array(env, &secret.to_array()))
        .into()
}

pub fn request(
    env: &Env,
    config: &ArbitrationConfig,
    dispute_id: u64,
    tier: PanelTier,
    participants: Vec<Address>,
    excluded: Vec<Address>,
) -> Result<SelectionRequest, Error> {
    let size = panel_size(tier);
    let candidates = pool::eligible_members(env, config.min_stake);
    if count_available(&candidates, &excluded) < size {
        return Err(Error::InsufficientArbitrators);
    }

    let request = SelectionRequest {
        dispute_id,
        tier,
        panel_size: size,
        participants,
        excluded,
        candidates,
        requested_ledger: env.ledger().sequence(),
        commitments: Map::new(env),
        reveals: Map::new(env),
    };
    storage::set_selection(env, &request);
    events::emit_selection_requested(env, dispute_id, tier);
    Ok(request)
}

fn ready_at(config: &ArbitrationConfig, request: &SelectionRequest) -> u32 {
    request
        .requested_ledger
        .saturating_add(config.selection_delay)
}

fn pending_for(env: &Env, dispute_id: u64, party: &Address) -> Result<SelectionRequest, Error> {
    let request = storage::get_selection(env, dispute_id).ok_or(Error::NoPendingSelection)?;
    if !request.participants.contains(party) {
        return Err(Error::NotEscrowParty);
    }
    Ok(request)
}

pub fn commit(
    env: &Env,
    config: &ArbitrationConfig,
    dispute_id: u64,
    party: &Address,
    commitment: BytesN<32>,
) -> Result<(), Error> {
    let mut request = pending_for(env, dispute_id, party)?;
    if env.ledger().sequence() >= ready_at(config, &request) {
        return Err(Error::CommitmentClosed);
    }
    if request.commitments.contains_key(party.clone()) {
        return Err(Error::AlreadyCommitted);
    }

    request.commitments.set(party.clone(), commitment.clone());
    storage::set_selection(env, &request);
    events::emit_seed_committed(env, dispute_id, request.tier, party.clone(), commitment);
    Ok(())
}

pub fn reveal(
    env: &Env,
    config: &ArbitrationConfig,
    dispute_id: u64,
    party: &Address,
    secret: BytesN<32>,
) -> Result<(), Error> {
    let mut request = pending_for(env, dispute_id, party)?;
    let opens_at = ready_at(config, &request);
    if env.ledger().sequence() < opens_at {
        log!(
            env,
            "reveals for dispute {} open at ledger {}",
            dispute_id,
            opens_at
        );
        return Err(Error::SelectionNotReady);
    }
    if request.reveals.contains_key(party.clone()) {
        return Err(Error::AlreadyRevealed);
    }
    let commitment = request
        .commitments
        .get(party.clone())
        .ok_or(Error::MissingCommitment)?;
    if commitment_of(env, &secret) != commitment {
        return Err(Error::InvalidReveal);
    }

    request.reveals.set(party.clone(), secret.clone());
    storage::set_selection(env, &request);
    events::emit_seed_revealed(env, dispute_id, request.tier, party.clone(), secret);
    Ok(())
}

pub fn has_revealed(request: &SelectionRequest, party: &Address) -> bool {
    request.reveals.contains_key(party.clone())
}

pub fn finalize(
    env: &Env,
    config: &ArbitrationConfig,
    dispute_id: u64,
) -> Result<(SelectionRequest, Vec<Address>), Error> {
    let request = storage::get_selection(env, dispute_id).ok_or(Error::NoPendingSelection)?;

    let opens_at = ready_at(config, &request);
    if env.ledger().sequence() < opens_at {
        log!(
            env,
            "selection for dispute {} not ready until ledger {}",
            dispute_id,
            opens_at
        );
        return Err(Error::SelectionNotReady);
    }

    let panel = draw(env, config, &request)?;
    storage::remove_selection(env, dispute_id);
    events::emit_panel_assigned(env, dispute_id, request.tier, panel.clone());
    Ok((request, panel))
}

/// The panel `finalize` would assign right now. Fails with `AwaitingReveal`
/// until every disputant has revealed.
pub fn draw(
    env: &Env,
    config: &ArbitrationConfig,
    request: &SelectionRequest,
) -> Result<Vec<Address>, Error> {
    for party in request.participants.iter() {
        if !has_revealed(request, &party) {
            return Err(Error::AwaitingReveal);
        }
    }
    let seed = derive_seed(env, request);
    let unavailable = unavailable(env, config, request);
    sample_panel(
        env,
        &seed,
        &request.candidates,
        &unavailable,
        request.panel_size,
    )
}

fn derive_seed(env: &Env, request: &SelectionRequest) -> BytesN<32> {
    let tier_tag: u32 = match request.tier {
        PanelTier::Initial => 0,
        PanelTier::Appeal => 1,
    };
    let mut material = Bytes::new(env);
    material.extend_from_array(&request.dispute_id.to_be_bytes());
    material.extend_from_array(&tier_tag.to_be_bytes());
    material.extend_from_array(&request.panel_size.to_be_bytes());
    material.extend_from_array(&request.requested_ledger.to_be_bytes());
    for party in request.participants.iter() {
        if let Some(secret) = request.reveals.get(party) {
            material.extend_from_array(&secret.to_array());
        }
    }
    env.crypto().sha256(&material).into()
}

/// Exclusions plus snapshot members that have since left the pool or fallen
/// under the minimum.
fn unavailable(env: &Env, config: &ArbitrationConfig, request: &SelectionRequest) -> Vec<Address> {
    let eligible = pool::eligible_members(env, config.min_stake);
    let mut unavailable = request.excluded.clone();
    for candidate in request.candidates.iter() {
        if !eligible.contains(&candidate) && !unavailable.contains(&candidate) {
            unavailable.push_back(candidate);
        }
    }
    unavailable
}

fn draw_index(env: &Env, seed: &BytesN<32>, attempt: u32, modulus: u32) -> u32 {
    let mut buf = Bytes::from_array(env, &seed.to_array());
    buf.extend_from_array(&attempt.to_be_bytes());
    let digest: BytesN<32> = env.crypto().sha256(&buf).into();
    let bytes = digest.to_array();
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    (u64::from_be_bytes(word) % modulus as u64) as u32
}

fn count_available(candidates: &Vec<Address>, excluded: &Vec<Address>) -> u32 {
    let mut available = 0;
    for candidate in candidates.iter() {
        if !excluded.contains(&candidate) {
            available += 1;
        }
    }
    available
}

/// Samples `size` distinct candidates, none of them excluded.
///
/// Draws are derived from `seed`, so the same seed and pool always yield the
/// same panel. Hits on excluded or already chosen members are redrawn; if the
/// draw budget runs out the panel is completed by scanning forward from the
/// last drawn index.
pub fn sample_panel(
    env: &Env,
    seed: &BytesN<32>,
    candidates: &Vec<Address>,
    excluded: &Vec<Address>,
    size: u32,
) -> Result<Vec<Address>, Error> {
    if count_available(candidates, excluded) < size {
        return Err(Error::InsufficientArbitrators);
    }

    let n = candidates.len();
    let mut panel: Vec<Address> = Vec::new(env);
    if size == 0 {
        return Ok(panel);
    }

    let max_attempts = n * DRAWS_PER_CANDIDATE + size;
    let mut attempt = 0;
    let mut cursor = 0;
    while panel.len() < size && attempt < max_attempts {
        cursor = draw_index(env, seed, attempt, n);
        attempt += 1;
        let candidate = candidates.get_unchecked(cursor);
        if excluded.contains(&candidate) || panel.contains(&candidate) {
            continue;
        }
        panel.push_back(candidate);
    }

    let mut step = 0;
    while panel.len() < size && step < n {
        let candidate = candidates.get_unchecked((cursor + step) % n);
        step += 1;
        if !excluded.contains(&candidate) && !panel.contains(&candidate) {
            panel.push_back(candidate);
        }
    }
    Ok(panel)
}
