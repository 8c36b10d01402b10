#![no_std]
#![allow(clippy::too_many_arguments)]

//! Staked, panel-based arbitration for escrowed trades.
//!
//! Disputants open a dispute against an escrow record and a three-member panel
//! is drawn from the staked pool, seeded by secrets both disputants commit to
//! and later reveal. The panel's strict majority decides between releasing
//! funds to the seller and refunding the buyer. One appeal to a disjoint
//! five-member panel is allowed. A dispute that reaches its deadline without
//! a majority falls back to a refund, unless one disputant withheld its
//! selection secret and so forfeits to the other.

mod appeal;
mod collaborators;
mod dispute;
mod errors;
mod events;
mod fees;
mod pool;
mod selection;
mod storage;
mod types;


pub use collaborators::{
    EscrowSource, EscrowSourceClient, QualificationSource, QualificationSourceClient,
};
pub use errors::{get_suggestion, Error};
pub use fees::calculate_fee;
pub use types::{
    AppealRecord, ArbitrationConfig, ArbitratorEntry, Dispute, DisputeStatus, EscrowTerms,
    Evidence, FeeBreakdown, PanelTier, Resolution, ResolutionMethod, SelectionRequest,
    VoteChoice,
};

use soroban_sdk::{contract, contractimpl, contractmeta, Address, BytesN, Env, String, Vec};

contractmeta!(
    key = "Description",
    val = "Staked panel arbitration with appeals and default resolution"
);

/// Seven days, the default window a panel has to reach majority.
pub const DEFAULT_VOTING_PERIOD: u64 = 7 * 24 * 60 * 60;

#[contract]
pub struct ArbitrationContract;

#[contractimpl]
impl ArbitrationContract {
    // ------------------------------------------------------------------
    // Lifecycle & administration
    // ------------------------------------------------------------------

    /// Initialise the engine. Must be called exactly once.
    pub fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        escrow_source: Address,
        qualification_source: Address,
        min_stake: i128,
        selection_delay: u32,
        voting_period: u64,
    ) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();
        if min_stake <= 0 || selection_delay == 0 || voting_period == 0 {
            return Err(Error::InvalidConfig);
        }

        storage::set_config(
            &env,
            &ArbitrationConfig {
                admin: admin.clone(),
                stake_token,
                escrow_source,
                qualification_source,
                min_stake,
                selection_delay,
                voting_period,
            },
        );
        storage::set_paused(&env, false);
        storage::bump_instance(&env);

        events::emit_config_updated(&env, admin);
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<ArbitrationConfig, Error> {
        storage::get_config(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        storage::is_paused(&env)
    }

    pub fn pause(env: Env, admin: Address) -> Result<(), Error> {
        Self::require_admin(&env, &admin)?;
        storage::set_paused(&env, true);
        events::emit_paused(&env, admin, true);
        Ok(())
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), Error> {
        Self::require_admin(&env, &admin)?;
        storage::set_paused(&env, false);
        events::emit_paused(&env, admin, false);
        Ok(())
    }

    /// Raising the minimum takes entries below it out of future panels
    /// without touching panels already assigned.
    pub fn set_min_stake(env: Env, admin: Address, min_stake: i128) -> Result<(), Error> {
        let mut config = Self::require_admin(&env, &admin)?;
        Self::require_not_paused(&env)?;
        if min_stake <= 0 {
            return Err(Error::InvalidConfig);
        }
        config.min_stake = min_stake;
        storage::set_config(&env, &config);
        events::emit_config_updated(&env, admin);
        Ok(())
    }

    pub fn set_collaborators(
        env: Env,
        admin: Address,
        escrow_source: Address,
        qualification_source: Address,
    ) -> Result<(), Error> {
        let mut config = Self::require_admin(&env, &admin)?;
        Self::require_not_paused(&env)?;
        config.escrow_source = escrow_source;
        config.qualification_source = qualification_source;
        storage::set_config(&env, &config);
        events::emit_config_updated(&env, admin);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Arbitrator pool
    // ------------------------------------------------------------------

    /// Stake into the pool, or top up an existing stake.
    pub fn register(env: Env, arbitrator: Address, amount: i128) -> Result<ArbitratorEntry, Error> {
        let config = Self::require_active(&env)?;
        arbitrator.require_auth();
        pool::register(&env, &config, &arbitrator, amount)
    }

    pub fn withdraw(env: Env, arbitrator: Address, amount: i128) -> Result<ArbitratorEntry, Error> {
        let config = Self::require_active(&env)?;
        arbitrator.require_auth();
        pool::withdraw(&env, &config, &arbitrator, amount)
    }

    pub fn pool_size(env: Env) -> Result<u32, Error> {
        let config = storage::get_config(&env)?;
        Ok(pool::pool_size(&env, config.min_stake))
    }

    pub fn get_pool(env: Env) -> Result<Vec<Address>, Error> {
        let config = storage::get_config(&env)?;
        Ok(pool::eligible_members(&env, config.min_stake))
    }

    pub fn get_arbitrator(env: Env, arbitrator: Address) -> Option<ArbitratorEntry> {
        storage::get_arbitrator(&env, &arbitrator)
    }

    pub fn get_stake(env: Env, arbitrator: Address) -> i128 {
        storage::get_arbitrator(&env, &arbitrator)
            .map(|entry| entry.stake)
            .unwrap_or(0)
    }

    // ------------------------------------------------------------------
    // Disputes
    // ------------------------------------------------------------------

    /// Opens a dispute on `escrow_id` and requests its panel. Returns the
    /// dispute id; the panel is drawn later by `finalize_selection`.
    pub fn create_dispute(env: Env, caller: Address, escrow_id: u64) -> Result<u64, Error> {
        let config = Self::require_active(&env)?;
        caller.require_auth();
        let dispute = dispute::open(&env, &config, &caller, escrow_id)?;
        Ok(dispute.id)
    }

    /// Records `sha256(secret)` for the caller's pending panel draw. Only
    /// accepted before `selection_delay` ledgers have closed since the request.
    pub fn commit_selection(
        env: Env,
        caller: Address,
        dispute_id: u64,
        commitment: BytesN<32>,
    ) -> Result<(), Error> {
        let config = Self::require_active(&env)?;
        caller.require_auth();
        storage::get_dispute(&env, dispute_id)?;
        selection::commit(&env, &config, dispute_id, &caller, commitment)
    }

    /// Opens the caller's commitment once the commit window has closed.
    pub fn reveal_selection(
        env: Env,
        caller: Address,
        dispute_id: u64,
        secret: BytesN<32>,
    ) -> Result<(), Error> {
        let config = Self::require_active(&env)?;
        caller.require_auth();
        storage::get_dispute(&env, dispute_id)?;
        selection::reveal(&env, &config, dispute_id, &caller, secret)
    }

    /// Completes a pending panel draw for either tier. Anyone may call it
    /// once every disputant has revealed; the panel depends only on the
    /// request and the revealed secrets.

    pub fn finalize_selection(env: Env, dispute_id: u64) -> Result<Vec<Address>, Error> {
        let config = Self::require_active(&env)?;
        let mut record = storage::get_dispute(&env, dispute_id)?;
        let pending = storage::get_selection(&env, dispute_id).ok_or(Error::NoPendingSelection)?;
        match (pending.tier, record.status) {
            (PanelTier::Initial, DisputeStatus::PendingSelection) => {}
            (PanelTier::Appeal, DisputeStatus::Appealed) => {}
            _ => return Err(Error::DisputeAlreadyResolved),
        }

        let (request, panel) = selection::finalize(&env, &config, dispute_id)?;
        match request.tier {
            PanelTier::Initial => dispute::assign_panel(&env, &config, &mut record, panel.clone()),
            PanelTier::Appeal => appeal::assign_panel(&env, &config, &record, panel.clone())?,
        }
        storage::set_dispute(&env, &record);
        Ok(panel)
    }

    pub fn submit_evidence(
        env: Env,
        caller: Address,
        dispute_id: u64,
        reference: String,
    ) -> Result<(), Error> {
        Self::require_active(&env)?;
        caller.require_auth();
        let mut record = storage::get_dispute(&env, dispute_id)?;
        dispute::add_evidence(&env, &mut record, &caller, reference)?;
        storage::set_dispute(&env, &record);
        Ok(())
    }

    pub fn cast_vote(
        env: Env,
        arbitrator: Address,
        dispute_id: u64,
        choice: VoteChoice,
    ) -> Result<(), Error> {
        Self::require_active(&env)?;
        arbitrator.require_auth();
        let mut record = storage::get_dispute(&env, dispute_id)?;
        dispute::cast_vote(&env, &mut record, &arbitrator, choice)?;
        storage::set_dispute(&env, &record);
        Ok(())
    }

    /// Resolves a dispute whose deadline passed without a majority.
    ///
    /// Any address may trigger this. It also covers a dispute still waiting
    /// on its panel: a disputant that revealed while the other did not wins,
    /// otherwise the fallback refund applies.
    pub fn trigger_default_resolution(env: Env, dispute_id: u64) -> Result<(), Error> {
        Self::require_active(&env)?;
        let mut record = storage::get_dispute(&env, dispute_id)?;
        dispute::resolve_by_default(&env, &mut record)?;
        storage::set_dispute(&env, &record);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Appeals
    // ------------------------------------------------------------------

    /// Files the single allowed appeal. Returns the stake taken into custody.
    pub fn file_appeal(env: Env, appellant: Address, dispute_id: u64) -> Result<i128, Error> {
        let config = Self::require_active(&env)?;
        appellant.require_auth();
        let mut record = storage::get_dispute(&env, dispute_id)?;
        let stake = appeal::file(&env, &config, &mut record, &appellant)?;
        storage::set_dispute(&env, &record);
        Ok(stake)
    }

    pub fn cast_appeal_vote(
        env: Env,
        arbitrator: Address,
        dispute_id: u64,
        choice: VoteChoice,
    ) -> Result<(), Error> {
        let config = Self::require_active(&env)?;
        arbitrator.require_auth();
        let mut record = storage::get_dispute(&env, dispute_id)?;
        appeal::cast_vote(&env, &config, &mut record, &arbitrator, choice)?;
        storage::set_dispute(&env, &record);
        Ok(())
    }

    /// Callable by anyone once the appeal deadline has passed without a
    /// majority. The original resolution stands and the bond is returned,
    /// unless one disputant withheld its secret from the appeal draw.
    pub fn conclude_stalled_appeal(env: Env, dispute_id: u64) -> Result<(), Error> {
        let config = Self::require_active(&env)?;
        let mut record = storage::get_dispute(&env, dispute_id)?;
        appeal::conclude_stalled(&env, &config, &mut record)?;
        storage::set_dispute(&env, &record);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn get_dispute(env: Env, dispute_id: u64) -> Result<Dispute, Error> {
        storage::get_dispute(&env, dispute_id)
    }

    pub fn get_dispute_count(env: Env) -> u64 {
        storage::get_dispute_count(&env)
    }

    pub fn get_dispute_for_escrow(env: Env, escrow_id: u64) -> Option<u64> {
        storage::get_escrow_dispute(&env, escrow_id)
    }

    pub fn get_resolution(env: Env, dispute_id: u64) -> Option<Resolution> {
        storage::get_resolution(&env, dispute_id)
    }

    pub fn get_appeal(env: Env, dispute_id: u64) -> Option<AppealRecord> {
        storage::get_appeal(&env, dispute_id)
    }

    pub fn get_selection_request(env: Env, dispute_id: u64) -> Option<SelectionRequest> {
        storage::get_selection(&env, dispute_id)
    }

    /// The panel a pending draw will produce, available once every disputant
    /// has revealed.
    pub fn preview_panel(env: Env, dispute_id: u64) -> Result<Vec<Address>, Error> {
        let config = storage::get_config(&env)?;
        let request = storage::get_selection(&env, dispute_id).ok_or(Error::NoPendingSelection)?;
        selection::draw(&env, &config, &request)
    }

    /// Commitment to submit for `secret`.
    pub fn selection_commitment(env: Env, secret: BytesN<32>) -> BytesN<32> {
        selection::commitment_of(&env, &secret)
    }

    pub fn has_voted(
        env: Env,
        dispute_id: u64,
        tier: PanelTier,
        arbitrator: Address,
    ) -> Result<bool, Error> {
        let record = storage::get_dispute(&env, dispute_id)?;
        Ok(match tier {
            PanelTier::Initial => record.votes.contains_key(arbitrator),
            PanelTier::Appeal => storage::get_appeal(&env, dispute_id)
                .map(|appeal| appeal.votes.contains_key(arbitrator))
                .unwrap_or(false),
        })
    }

    pub fn preview_fee(_env: Env, amount: i128) -> Result<FeeBreakdown, Error> {
        fees::calculate_fee(amount)
    }

    pub fn preview_appeal_stake(_env: Env, amount: i128) -> Result<i128, Error> {
        fees::appeal_stake(amount)
    }

    /// Arbitrator rewards owed by the settlement rail.
    pub fn get_accrued(env: Env, who: Address) -> i128 {
        storage::get_accrued(&env, &who)
    }

    pub fn get_validator_pool(env: Env) -> i128 {
        storage::get_validator_pool(&env)
    }

    pub fn get_treasury_accrued(env: Env) -> i128 {
        storage::get_treasury_accrued(&env)
    }

    pub fn get_forfeited_stakes(env: Env) -> i128 {
        storage::get_forfeited_stakes(&env)
    }
}

impl ArbitrationContract {
    fn require_not_paused(env: &Env) -> Result<(), Error> {
        if storage::is_paused(env) {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    /// Gate for every mutating entry point.
    fn require_active(env: &Env) -> Result<ArbitrationConfig, Error> {
        let config = storage::get_config(env)?;
        Self::require_not_paused(env)?;
        storage::bump_instance(env);
        Ok(config)
    }

    fn require_admin(env: &Env, caller: &Address) -> Result<ArbitrationConfig, Error> {
        let config = storage::get_config(env)?;
        caller.require_auth();
        if &config.admin != caller {
            return Err(Error::NotAuthorized);
        }
        Ok(config)
    }
}
