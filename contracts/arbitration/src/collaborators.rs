use soroban_sdk::{contractclient, Address, Env};

use crate::types::EscrowTerms;

/// Read-only view of the escrow contract whose trades are disputed.
#[contractclient(name = "EscrowSourceClient")]
pub trait EscrowSource {
    fn get_escrow(env: Env, escrow_id: u64) -> Option<EscrowTerms>;
}

/// Gatekeeper for pool registration. The score is advisory only.
#[contractclient(name = "QualificationSourceClient")]
pub trait QualificationSource {
    fn is_qualified(env: Env, candidate: Address) -> bool;
    fn get_score(env: Env, candidate: Address) -> i128;
}
