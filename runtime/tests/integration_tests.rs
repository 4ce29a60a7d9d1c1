//! End-to-end flows through the runtime: engine, ledger and nullables together.

use flow_governance::{
    EngineConfig, GovernanceError, MachineState, ProposalAction, ProposalId, ProposalStatus,
    VoteChoice,
};
use flow_ledger::SnapshotLedger;
use flow_nullables::{NullOracle, NullStore};
use flow_runtime::{Applied, Call, ContractError, Receipt, Runtime, RuntimeError};
use flow_types::params::DAY;
use flow_types::{Address, Effect, GovernanceParams, OracleError, Point};
use serde_json::json;

const DAO: &str = "KT1dao";
const TOKEN: &str = "KT1token";
const STORE: &str = "KT1store";
const ADMIN: &str = "tz1admin";
const ALICE: &str = "tz1alice";
const BOB: &str = "tz1bob";
const CAROL: &str = "tz1carol";

fn addr(s: &str) -> Address {
    Address::new(s)
}

/// Engine backed by the snapshot ledger, plus a store the engine administers.
fn ledger_runtime() -> Runtime {
    let mut runtime = Runtime::new(EngineConfig::new(addr(DAO), addr(TOKEN)));
    runtime.deploy(addr(TOKEN), SnapshotLedger::new(addr(ADMIN)));
    runtime.deploy(addr(STORE), NullStore::new(addr(DAO)));
    runtime
}

/// Engine backed by a stub oracle reporting `balance` for everyone.
fn stub_runtime(balance: u128) -> Runtime {
    let mut runtime = Runtime::new(EngineConfig::new(addr(DAO), addr(TOKEN)));
    runtime.deploy(addr(TOKEN), NullOracle::new(balance));
    runtime.deploy(addr(STORE), NullStore::new(addr(DAO)));
    runtime.advance(1, 0);
    runtime
}

fn mint(runtime: &mut Runtime, to: &str, value: u128) {
    runtime
        .submit(
            addr(ADMIN),
            addr(TOKEN),
            Call::contract("mint", json!({ "address": to, "value": value })),
        )
        .unwrap();
}

fn transfer(runtime: &mut Runtime, from: &str, to: &str, value: u128) {
    runtime
        .submit(
            addr(from),
            addr(TOKEN),
            Call::contract("transfer", json!({ "from": from, "to": to, "value": value })),
        )
        .unwrap();
}

fn register(
    runtime: &mut Runtime,
    creator: &str,
    action: ProposalAction,
) -> Result<Receipt, RuntimeError> {
    runtime.submit(
        addr(creator),
        addr(DAO),
        Call::RegisterProposal {
            metadata: "ipfs://proposal".into(),
            action,
        },
    )
}

fn vote(
    runtime: &mut Runtime,
    voter: &str,
    proposal_id: ProposalId,
    choice: VoteChoice,
) -> Result<Receipt, RuntimeError> {
    runtime.submit(
        addr(voter),
        addr(DAO),
        Call::Vote {
            proposal_id,
            vote_value: choice.value(),
        },
    )
}

fn end_voting(runtime: &mut Runtime, proposal_id: ProposalId) -> Result<Receipt, RuntimeError> {
    runtime.submit(addr(BOB), addr(DAO), Call::EndVoting { proposal_id })
}

fn execute(runtime: &mut Runtime, proposal_id: ProposalId) -> Result<Receipt, RuntimeError> {
    runtime.submit(addr(BOB), addr(DAO), Call::ExecuteProposal { proposal_id })
}

fn modify_store(value: u64) -> ProposalAction {
    ProposalAction::from_effects(vec![
        Effect::invoke(addr(STORE), "modify_value", value).unwrap()
    ])
}

/// Mints at point 1, registers from `ALICE` at point 2, moves to point 3.
fn ledger_with_proposal(action: ProposalAction) -> (Runtime, ProposalId) {
    let mut runtime = ledger_runtime();
    runtime.advance(1, 0);
    mint(&mut runtime, ALICE, 150_000);
    mint(&mut runtime, BOB, 100_000);
    runtime.advance(1, 60);
    let id = register(&mut runtime, ALICE, action)
        .unwrap()
        .registered
        .unwrap();
    runtime.advance(1, 60);
    (runtime, id)
}

fn pass_voting(runtime: &mut Runtime, id: ProposalId) {
    runtime.advance(1, 2 * DAY as u64);
    let receipt = end_voting(runtime, id).unwrap();
    assert_eq!(receipt.decided, Some(ProposalStatus::Timelocked));
    runtime.advance(1, DAY as u64 + 1);
}

#[test]
fn registration_round_trips_through_the_oracle() {
    let mut runtime = ledger_runtime();
    runtime.advance(1, 0);
    mint(&mut runtime, ALICE, 150_000);
    runtime.advance(1, 60);

    let receipt = register(&mut runtime, ALICE, ProposalAction::noop()).unwrap();

    assert_eq!(receipt.registered, Some(1));
    assert_eq!(
        receipt.applied[1],
        Applied::Snapshot {
            oracle: addr(TOKEN),
            address: addr(ALICE),
            point: Point::new(1),
            balance: 150_000,
        }
    );
    let entrypoints: Vec<_> = receipt.calls().map(|(_, _, name)| name).collect();
    assert_eq!(entrypoints, ["register_proposal", "register_proposal_callback"]);
    let (sender, _, _) = receipt.calls().nth(1).unwrap();
    assert_eq!(sender, &addr(TOKEN));

    let proposal = runtime.engine().proposal(1).unwrap();
    assert_eq!(proposal.origin_point, Point::new(2));
    assert_eq!(proposal.status, ProposalStatus::Voting);
    assert_eq!(runtime.engine().state(), MachineState::Idle);
}

#[test]
fn full_lifecycle_modifies_store() {
    let (mut runtime, id) = ledger_with_proposal(modify_store(42));
    vote(&mut runtime, ALICE, id, VoteChoice::Up).unwrap();
    vote(&mut runtime, BOB, id, VoteChoice::Down).unwrap();

    let proposal = runtime.engine().proposal(id).unwrap();
    assert_eq!(proposal.up_votes, 150_000);
    assert_eq!(proposal.down_votes, 100_000);

    pass_voting(&mut runtime, id);
    let receipt = execute(&mut runtime, id).unwrap();
    assert_eq!(receipt.effects, 1);
    let (sender, target, entrypoint) = receipt.calls().last().unwrap();
    assert_eq!((sender, target, entrypoint), (&addr(DAO), &addr(STORE), "modify_value"));

    let store = runtime.contract_as::<NullStore>(&addr(STORE)).unwrap();
    assert_eq!(store.value(), 42);
    assert_eq!(
        runtime.engine().proposal(id).unwrap().status,
        ProposalStatus::Executed
    );
}

#[test]
fn tokens_acquired_after_origin_carry_no_weight() {
    let (mut runtime, id) = ledger_with_proposal(ProposalAction::noop());
    transfer(&mut runtime, ALICE, CAROL, 100_000);
    runtime.advance(1, 60);

    let err = vote(&mut runtime, CAROL, id, VoteChoice::Up).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Governance(GovernanceError::InvalidVote)
    ));
    assert_eq!(runtime.engine().state(), MachineState::Idle);

    // Alice still votes with her full balance at the origin point.
    vote(&mut runtime, ALICE, id, VoteChoice::Up).unwrap();
    assert_eq!(runtime.engine().proposal(id).unwrap().up_votes, 150_000);
}

#[test]
fn voting_in_the_origin_point_is_not_final() {
    let mut runtime = ledger_runtime();
    runtime.advance(1, 0);
    mint(&mut runtime, ALICE, 150_000);
    runtime.advance(1, 60);
    let id = register(&mut runtime, ALICE, ProposalAction::noop())
        .unwrap()
        .registered
        .unwrap();

    let err = vote(&mut runtime, ALICE, id, VoteChoice::Up).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Oracle(OracleError::BlockNotFinalized { .. })
    ));
    assert!(runtime.engine().pending().is_none());
}

#[test]
fn failed_callback_rolls_back_the_submission() {
    let mut runtime = ledger_runtime();
    runtime.advance(1, 0);
    mint(&mut runtime, ALICE, 49_999);
    runtime.advance(1, 60);

    let err = register(&mut runtime, ALICE, ProposalAction::noop()).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Governance(GovernanceError::NotEnoughTokens {
            balance: 49_999,
            threshold: 50_000
        })
    ));
    assert_eq!(runtime.engine().state(), MachineState::Idle);
    assert_eq!(runtime.engine().proposal_count(), 0);
    assert_eq!(runtime.stats().get("rolled_back"), 1);

    mint(&mut runtime, ALICE, 1);
    runtime.advance(1, 60);
    assert_eq!(
        register(&mut runtime, ALICE, ProposalAction::noop())
            .unwrap()
            .registered,
        Some(1)
    );
}

#[test]
fn second_vote_is_rejected() {
    let (mut runtime, id) = ledger_with_proposal(ProposalAction::noop());
    vote(&mut runtime, BOB, id, VoteChoice::Down).unwrap();
    let err = vote(&mut runtime, BOB, id, VoteChoice::Up).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Governance(GovernanceError::AlreadyVoted { .. })
    ));
    assert_eq!(runtime.engine().proposal(id).unwrap().down_votes, 100_000);
}

#[test]
fn callbacks_cannot_be_spoofed() {
    let (mut runtime, _) = ledger_with_proposal(ProposalAction::noop());
    let err = runtime
        .submit(
            addr(CAROL),
            addr(DAO),
            Call::VoteCallback { balance: 1_000_000 },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Governance(GovernanceError::NotAllowed(sender)) if sender == addr(CAROL)
    ));
}

#[test]
fn failing_effect_keeps_proposal_timelocked() {
    let (mut runtime, id) = ledger_with_proposal(modify_store(7));
    // Hand the store to someone else so the engine can no longer write it.
    runtime
        .submit(addr(ADMIN), addr(STORE), Call::contract("set_admin", json!(ADMIN)))
        .unwrap();
    vote(&mut runtime, ALICE, id, VoteChoice::Up).unwrap();
    vote(&mut runtime, BOB, id, VoteChoice::Up).unwrap();
    pass_voting(&mut runtime, id);

    let err = execute(&mut runtime, id).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Contract(ContractError::NotAllowed(sender)) if sender == addr(DAO)
    ));
    assert_eq!(
        runtime.engine().proposal(id).unwrap().status,
        ProposalStatus::Timelocked
    );
    assert_eq!(
        runtime.contract_as::<NullStore>(&addr(STORE)).unwrap().value(),
        0
    );
}

#[test]
fn rollback_restores_only_the_contracts_a_submission_called() {
    let action = ProposalAction::from_effects(vec![
        Effect::invoke(addr(STORE), "modify_value", 7).unwrap(),
        Effect::invoke(addr(STORE), "reset", 0).unwrap(),
    ]);
    let (mut runtime, id) = ledger_with_proposal(action);
    vote(&mut runtime, ALICE, id, VoteChoice::Up).unwrap();
    vote(&mut runtime, BOB, id, VoteChoice::Up).unwrap();
    pass_voting(&mut runtime, id);

    let copies = runtime.stats().get("contract_copies");
    let err = execute(&mut runtime, id).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Contract(ContractError::UnknownEntrypoint(name)) if name == "reset"
    ));
    // The store was written before the failure and must be put back.
    assert_eq!(
        runtime.contract_as::<NullStore>(&addr(STORE)).unwrap().value(),
        0
    );
    assert_eq!(
        runtime.engine().proposal(id).unwrap().status,
        ProposalStatus::Timelocked
    );
    // Only the store was copied; the ledger was never called.
    assert_eq!(runtime.stats().get("contract_copies"), copies + 1);
    assert_eq!(
        runtime
            .contract_as::<SnapshotLedger>(&addr(TOKEN))
            .unwrap()
            .balance_of(&addr(ALICE)),
        150_000
    );

    // Oracle round trips read the ledger without copying it.
    let copies = runtime.stats().get("contract_copies");
    register(&mut runtime, ALICE, ProposalAction::noop()).unwrap();
    assert_eq!(runtime.stats().get("contract_copies"), copies);
}

#[test]
fn parameters_change_through_an_executed_proposal() {
    let mut runtime = stub_runtime(300_000);
    let params = GovernanceParams {
        quorum_votes: 1_000,
        proposal_threshold: 10,
        ..GovernanceParams::default()
    };

    let err = runtime
        .submit(
            addr(ALICE),
            addr(DAO),
            Call::SetGovernanceParameters {
                params: params.clone(),
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Governance(GovernanceError::NotAllowed(_))
    ));

    let action = ProposalAction::from_effects(vec![Effect::SetGovernanceParameters {
        params: params.clone(),
    }]);
    let id = register(&mut runtime, ALICE, action)
        .unwrap()
        .registered
        .unwrap();
    runtime.advance(1, 60);
    vote(&mut runtime, ALICE, id, VoteChoice::Up).unwrap();
    pass_voting(&mut runtime, id);
    execute(&mut runtime, id).unwrap();

    assert_eq!(runtime.engine().governance_parameters(), &params);
}

#[test]
fn stub_oracle_is_controllable() {
    let mut runtime = stub_runtime(0);
    runtime
        .submit(addr(ADMIN), addr(TOKEN), Call::contract("set_val", json!(50_000)))
        .unwrap();
    let receipt = register(&mut runtime, ALICE, ProposalAction::noop()).unwrap();
    assert_eq!(receipt.registered, Some(1));
}

#[test]
fn quorum_decides_the_outcome() {
    let mut runtime = stub_runtime(100_000);
    let id = register(&mut runtime, ALICE, ProposalAction::noop())
        .unwrap()
        .registered
        .unwrap();
    runtime.advance(1, 60);
    vote(&mut runtime, ALICE, id, VoteChoice::Up).unwrap();
    runtime
        .submit(addr(ADMIN), addr(TOKEN), Call::contract("set_val", json!(99_999)))
        .unwrap();
    vote(&mut runtime, BOB, id, VoteChoice::Down).unwrap();

    runtime.advance(1, 2 * DAY as u64);
    let receipt = end_voting(&mut runtime, id).unwrap();
    assert_eq!(receipt.decided, Some(ProposalStatus::Rejected));
}

#[test]
fn operation_limit_aborts_runaway_submissions() {
    let mut runtime = stub_runtime(60_000).with_operation_limit(2);
    let err = register(&mut runtime, ALICE, ProposalAction::noop()).unwrap_err();
    assert!(matches!(err, RuntimeError::OperationLimit(2)));
    assert_eq!(runtime.engine().state(), MachineState::Idle);
}

#[test]
fn oracle_must_answer_balance_queries() {
    let mut runtime = Runtime::new(EngineConfig::new(addr(DAO), addr(STORE)));
    runtime.advance(1, 0);
    let err = register(&mut runtime, ALICE, ProposalAction::noop()).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownContract(address) if address == addr(STORE)));

    runtime.deploy(addr(STORE), NullStore::new(addr(DAO)));
    let err = register(&mut runtime, ALICE, ProposalAction::noop()).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownOracle(address) if address == addr(STORE)));
    assert!(runtime.engine().pending().is_none());
}

#[test]
fn governance_calls_must_target_the_engine() {
    let mut runtime = ledger_runtime();
    let err = runtime
        .submit(addr(ALICE), addr(TOKEN), Call::EndVoting { proposal_id: 1 })
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnsupportedCall { .. }));

    let err = runtime
        .submit(addr(ALICE), addr(DAO), Call::contract("mint", json!(null)))
        .unwrap_err();
    assert!(matches!(err, RuntimeError::UnsupportedCall { .. }));
}
