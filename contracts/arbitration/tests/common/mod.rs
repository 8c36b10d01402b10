use arbitration::{ArbitrationContract, ArbitrationContractClient, EscrowTerms};
use reputation::{ReputationSystem, ReputationSystemClient};
use soroban_sdk::{
    contract, contractimpl, contracttype, testutils::Address as _, testutils::Ledger, token,
    Address, BytesN, Env,
};

pub const MIN_STAKE: i128 = 10_000;
pub const QUALIFYING_SCORE: i128 = 50;
pub const VOTING_PERIOD: u64 = 7 * 24 * 60 * 60;
pub const SELECTION_DELAY: u32 = 2;

#[derive(Clone)]
#[contracttype]
enum EscrowKey {
    Terms(u64),
}

/// Minimal escrow book standing in for the marketplace escrow contract.
#[contract]
pub struct EscrowBook;

#[contractimpl]
impl EscrowBook {
    pub fn open(env: Env, escrow_id: u64, terms: EscrowTerms) {
        env.storage()
            .persistent()
            .set(&EscrowKey::Terms(escrow_id), &terms);
    }

    pub fn get_escrow(env: Env, escrow_id: u64) -> Option<EscrowTerms> {
        env.storage().persistent().get(&EscrowKey::Terms(escrow_id))
    }
}

pub struct ArbitrationTest<'a> {
    pub env: &'a Env,
    pub client: ArbitrationContractClient<'a>,
    pub reputation: ReputationSystemClient<'a>,
    pub escrow: EscrowBookClient<'a>,
    pub token: token::Client<'a>,
    pub token_admin: token::StellarAssetClient<'a>,
    #[allow(dead_code)]
    pub admin: Address,
    pub buyer: Address,
    pub seller: Address,
}

pub fn setup_arbitration(env: &Env) -> ArbitrationTest<'_> {
    env.mock_all_auths();

    let admin = Address::generate(env);
    let token_id = env
        .register_stellar_asset_contract_v2(Address::generate(env))
        .address();

    let reputation_id = env.register_contract(None, ReputationSystem);
    let reputation = ReputationSystemClient::new(env, &reputation_id);
    reputation.initialize(&admin, &QUALIFYING_SCORE);

    let escrow_id = env.register_contract(None, EscrowBook);
    let contract_id = env.register_contract(None, ArbitrationContract);
    let client = ArbitrationContractClient::new(env, &contract_id);
    client.initialize(
        &admin,
        &token_id,
        &escrow_id,
        &reputation_id,
        &MIN_STAKE,
        &SELECTION_DELAY,
        &VOTING_PERIOD,
    );

    ArbitrationTest {
        env,
        client,
        reputation,
        escrow: EscrowBookClient::new(env, &escrow_id),
        token: token::Client::new(env, &token_id),
        token_admin: token::StellarAssetClient::new(env, &token_id),
        admin,
        buyer: Address::generate(env),
        seller: Address::generate(env),
    }
}

impl ArbitrationTest<'_> {
    /// Builds reputation for a fresh address and stakes it into the pool.
    pub fn onboard_arbitrator(&self) -> Address {
        let arbitrator = Address::generate(self.env);
        self.reputation.mint(&arbitrator, &QUALIFYING_SCORE);
        self.token_admin.mint(&arbitrator, &MIN_STAKE);
        self.client.register(&arbitrator, &MIN_STAKE);
        arbitrator
    }

    pub fn open_escrow(&self, escrow_id: u64, amount: i128) {
        self.escrow.open(
            &escrow_id,
            &EscrowTerms {
                buyer: self.buyer.clone(),
                seller: self.seller.clone(),
                amount,
            },
        );
    }

    fn seed_secret(&self, party: &Address) -> BytesN<32> {
        let tag = if party == &self.buyer { 0xb0 } else { 0x5e };
        BytesN::from_array(self.env, &[tag; 32])
    }

    /// Both disputants commit to their selection secrets. Must run in the
    /// ledger the draw was requested in, or within `SELECTION_DELAY` of it.
    pub fn commit_seeds(&self, dispute_id: u64) {
        for party in [&self.buyer, &self.seller] {
            let commitment = self.client.selection_commitment(&self.seed_secret(party));
            self.client.commit_selection(party, &dispute_id, &commitment);
        }
    }

    pub fn reveal_seed(&self, dispute_id: u64, party: &Address) {
        self.client
            .reveal_selection(party, &dispute_id, &self.seed_secret(party));
    }

    pub fn reveal_seeds(&self, dispute_id: u64) {
        self.reveal_seed(dispute_id, &self.buyer);
        self.reveal_seed(dispute_id, &self.seller);
    }

    pub fn close_ledgers(&self, count: u32) {
        self.env.ledger().with_mut(|li| {
            li.sequence_number += count;
            li.timestamp += 5 * count as u64;
        });
    }

    pub fn wait(&self, seconds: u64) {
        self.env.ledger().with_mut(|li| {
            li.sequence_number += 1;
            li.timestamp += seconds;
        });
    }
}
