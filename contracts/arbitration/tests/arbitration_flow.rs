#![allow(clippy::unwrap_used)]

mod common;

use arbitration::{DisputeStatus, Error, ResolutionMethod, VoteChoice};
use common::{setup_arbitration, MIN_STAKE, SELECTION_DELAY, VOTING_PERIOD};
use soroban_sdk::{testutils::Address as _, Address, Env, String};

#[test]
fn test_reputation_gates_registration() {
    let env = Env::default();
    let t = setup_arbitration(&env);
    let newcomer = Address::generate(&env);
    t.token_admin.mint(&newcomer, &MIN_STAKE);

    assert!(matches!(
        t.client.try_register(&newcomer, &MIN_STAKE),
        Err(Ok(Error::NotQualified))
    ));

    t.reputation.mint(&newcomer, &common::QUALIFYING_SCORE);
    let entry = t.client.register(&newcomer, &MIN_STAKE);
    assert!(entry.active);
    assert_eq!(entry.score, common::QUALIFYING_SCORE);
}

#[test]
fn test_slashed_reputation_blocks_top_up_but_not_membership() {
    let env = Env::default();
    let t = setup_arbitration(&env);
    let arbitrator = t.onboard_arbitrator();

    t.reputation.slash(&arbitrator, &common::QUALIFYING_SCORE);
    t.token_admin.mint(&arbitrator, &100);
    assert!(matches!(
        t.client.try_register(&arbitrator, &100),
        Err(Ok(Error::NotQualified))
    ));
    // Qualification is checked at registration only.
    assert_eq!(t.client.pool_size(), 1);
}

#[test]
fn test_full_dispute_lifecycle_with_appeal() {
    let env = Env::default();
    let t = setup_arbitration(&env);
    for _ in 0..10 {
        t.onboard_arbitrator();
    }
    t.token_admin.mint(&t.seller, &100);
    t.open_escrow(7, 1_000);

    let dispute_id = t.client.create_dispute(&t.seller, &7);
    t.client.submit_evidence(
        &t.seller,
        &dispute_id,
        &String::from_str(&env, "ipfs://bafy-shipping-receipt"),
    );

    t.commit_seeds(dispute_id);

    t.close_ledgers(SELECTION_DELAY - 1);
    assert!(matches!(
        t.client.try_finalize_selection(&dispute_id),
        Err(Ok(Error::SelectionNotReady))
    ));
    t.close_ledgers(1);
    t.reveal_seeds(dispute_id);
    let panel = t.client.finalize_selection(&dispute_id);
    assert_eq!(panel.len(), 3);

    t.client
        .cast_vote(&panel.get(0).unwrap(), &dispute_id, &VoteChoice::Refund);
    t.client
        .cast_vote(&panel.get(1).unwrap(), &dispute_id, &VoteChoice::Refund);
    let dispute = t.client.get_dispute(&dispute_id);
    assert_eq!(dispute.status, DisputeStatus::Resolved);
    assert_eq!(
        t.client.get_resolution(&dispute_id).unwrap().outcome,
        VoteChoice::Refund
    );

    // The seller lost and escalates.
    assert_eq!(t.client.file_appeal(&t.seller, &dispute_id), 25);
    assert_eq!(t.token.balance(&t.seller), 75);

    t.commit_seeds(dispute_id);
    t.close_ledgers(SELECTION_DELAY);
    t.reveal_seeds(dispute_id);
    let appeal_panel = t.client.finalize_selection(&dispute_id);
    assert_eq!(appeal_panel.len(), 5);
    for member in appeal_panel.iter() {
        assert!(!panel.contains(&member));
    }

    for i in 0..3 {
        t.client.cast_appeal_vote(
            &appeal_panel.get(i).unwrap(),
            &dispute_id,
            &VoteChoice::Release,
        );
    }
    let dispute = t.client.get_dispute(&dispute_id);
    assert_eq!(dispute.status, DisputeStatus::Resolved);
    let resolution = t.client.get_resolution(&dispute_id).unwrap();
    assert_eq!(resolution.outcome, VoteChoice::Release);
    assert_eq!(resolution.method, ResolutionMethod::Appeal);
    assert!(t.client.get_appeal(&dispute_id).unwrap().overturned);
    assert_eq!(t.token.balance(&t.seller), 100);

    // Stakes stay in custody for everyone who never withdrew.
    assert_eq!(t.token.balance(&t.client.address), MIN_STAKE * 10);
}

#[test]
fn test_stalled_panel_defaults_to_refund() {
    let env = Env::default();
    let t = setup_arbitration(&env);
    for _ in 0..3 {
        t.onboard_arbitrator();
    }
    t.open_escrow(1, 2_000);
    let dispute_id = t.client.create_dispute(&t.buyer, &1);
    t.commit_seeds(dispute_id);
    t.close_ledgers(SELECTION_DELAY);
    t.reveal_seeds(dispute_id);
    let panel = t.client.finalize_selection(&dispute_id);
    t.client
        .cast_vote(&panel.get(2).unwrap(), &dispute_id, &VoteChoice::Release);

    t.wait(VOTING_PERIOD);
    t.client.trigger_default_resolution(&dispute_id);

    let dispute = t.client.get_dispute(&dispute_id);
    assert_eq!(dispute.status, DisputeStatus::DefaultResolved);
    let resolution = t.client.get_resolution(&dispute_id).unwrap();
    assert_eq!(resolution.outcome, VoteChoice::Refund);
    assert_eq!((resolution.release_votes, resolution.refund_votes), (0, 0));
    assert_eq!(resolution.fee.total, 100);
}

#[test]
fn test_silent_disputant_loses_unseated_dispute() {
    let env = Env::default();
    let t = setup_arbitration(&env);
    for _ in 0..3 {
        t.onboard_arbitrator();
    }
    t.open_escrow(4, 1_000);
    let dispute_id = t.client.create_dispute(&t.seller, &4);
    t.commit_seeds(dispute_id);
    t.close_ledgers(SELECTION_DELAY);
    // Only the seller opens its commitment.
    t.reveal_seed(dispute_id, &t.seller);
    assert!(matches!(
        t.client.try_finalize_selection(&dispute_id),
        Err(Ok(Error::AwaitingReveal))
    ));

    t.wait(VOTING_PERIOD);
    t.client.trigger_default_resolution(&dispute_id);
    let resolution = t.client.get_resolution(&dispute_id).unwrap();
    assert_eq!(resolution.outcome, VoteChoice::Release);
    assert_eq!(resolution.method, ResolutionMethod::Forfeit);
    assert!(t.client.get_dispute(&dispute_id).panel.is_empty());
}
