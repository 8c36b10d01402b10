#![no_std]
//! Admin-curated reputation ledger used to gate arbitrator registration.
//!
//! A candidate qualifies once its score reaches the configured threshold.

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Env, Map, Symbol,
};

const ADMIN: Symbol = symbol_short!("admin");
const SCORES: Symbol = symbol_short!("scores");
const THRESHOLD: Symbol = symbol_short!("thresh");

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    NotAuthorized = 3,
    InvalidAmount = 4,
}

#[contract]
pub struct ReputationSystem;

#[contractimpl]
impl ReputationSystem {
    pub fn initialize(env: Env, admin: Address, threshold: i128) -> Result<(), Error> {
        if env.storage().instance().has(&ADMIN) {
            return Err(Error::AlreadyInitialized);
        }
        if threshold < 0 {
            return Err(Error::InvalidAmount);
        }
        admin.require_auth();
        env.storage().instance().set(&ADMIN, &admin);
        env.storage().instance().set(&THRESHOLD, &threshold);
        Ok(())
    }

    // Read-only views
    pub fn get_score(env: Env, candidate: Address) -> i128 {
        Self::scores(&env).get(candidate).unwrap_or(0)
    }

    pub fn get_threshold(env: Env) -> i128 {
        env.storage().instance().get(&THRESHOLD).unwrap_or(0)
    }

    /// True once the candidate's score reaches the threshold. Candidates with
    /// no history never qualify.
    pub fn is_qualified(env: Env, candidate: Address) -> bool {
        let scores = Self::scores(&env);
        match scores.get(candidate) {
            Some(score) => score > 0 && score >= Self::get_threshold(env),
            None => false,
        }
    }

    pub fn set_threshold(env: Env, threshold: i128) -> Result<(), Error> {
        Self::require_admin(&env)?;
        if threshold < 0 {
            return Err(Error::InvalidAmount);
        }
        env.storage().instance().set(&THRESHOLD, &threshold);
        env.events()
            .publish((symbol_short!("REP_THR"),), threshold);
        Ok(())
    }

    pub fn mint(env: Env, user: Address, amount: i128) -> Result<i128, Error> {
        Self::require_admin(&env)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let mut scores = Self::scores(&env);
        let updated = scores.get(user.clone()).unwrap_or(0) + amount;
        scores.set(user.clone(), updated);
        env.storage().persistent().set(&SCORES, &scores);
        env.events()
            .publish((symbol_short!("REP_MINT"), user), (amount, updated));
        Ok(updated)
    }

    // Slash reputation for bad behavior; floors at zero.
    pub fn slash(env: Env, user: Address, amount: i128) -> Result<i128, Error> {
        Self::require_admin(&env)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let mut scores = Self::scores(&env);
        let current = scores.get(user.clone()).unwrap_or(0);
        let updated = if amount > current { 0 } else { current - amount };
        scores.set(user.clone(), updated);
        env.storage().persistent().set(&SCORES, &scores);
        env.events()
            .publish((symbol_short!("REP_SLSH"), user), (amount, updated));
        Ok(updated)
    }
}

impl ReputationSystem {
    fn scores(env: &Env) -> Map<Address, i128> {
        env.storage()
            .persistent()
            .get(&SCORES)
            .unwrap_or(Map::new(env))
    }

    fn require_admin(env: &Env) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&ADMIN)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::testutils::Address as _;

    fn setup(env: &Env, threshold: i128) -> (ReputationSystemClient<'_>, Address) {
        env.mock_all_auths();
        let contract_id = env.register_contract(None, ReputationSystem);
        let client = ReputationSystemClient::new(env, &contract_id);
        let admin = Address::generate(env);
        client.initialize(&admin, &threshold);
        (client, admin)
    }

    #[test]
    fn test_qualification_follows_threshold() {
        let env = Env::default();
        let (client, _) = setup(&env, 50);
        let candidate = Address::generate(&env);

        assert!(!client.is_qualified(&candidate));
        client.mint(&candidate, &40);
        assert!(!client.is_qualified(&candidate));
        client.mint(&candidate, &10);
        assert!(client.is_qualified(&candidate));
        assert_eq!(client.get_score(&candidate), 50);

        client.set_threshold(&60);
        assert!(!client.is_qualified(&candidate));
    }

    #[test]
    fn test_slash_floors_at_zero_and_disqualifies() {
        let env = Env::default();
        let (client, _) = setup(&env, 1);
        let candidate = Address::generate(&env);

        client.mint(&candidate, &5);
        assert!(client.is_qualified(&candidate));
        assert_eq!(client.slash(&candidate, &100), 0);
        assert!(!client.is_qualified(&candidate));
    }

    #[test]
    fn test_double_initialize_fails() {
        let env = Env::default();
        let (client, admin) = setup(&env, 1);
        assert!(matches!(
            client.try_initialize(&admin, &1),
            Err(Ok(Error::AlreadyInitialized))
        ));
    }

    #[test]
    fn test_rejects_non_positive_mint() {
        let env = Env::default();
        let (client, _) = setup(&env, 1);
        assert!(matches!(
            client.try_mint(&Address::generate(&env), &0),
            Err(Ok(Error::InvalidAmount))
        ));
    }
}
