//! Replays a scenario against a freshly built runtime.

use crate::config::{OracleKind, SimConfig};
use crate::error::SimError;
use crate::report::{Report, StepOutcome};
use crate::scenario::{Action, Scenario};
use flow_governance::{EngineConfig, ProposalAction};
use flow_ledger::{LedgerCheckpoint, SnapshotLedger};
use flow_nullables::{NullOracle, NullStore};
use flow_runtime::{Call, Receipt, Runtime, RuntimeError};
use flow_types::Address;
use flow_utils::format_period;
use serde_json::json;

/// A runtime wired up from a [`SimConfig`].
pub struct Simulation {
    config: SimConfig,
    runtime: Runtime,
    outcomes: Vec<StepOutcome>,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        let engine = EngineConfig::new(config.dao.clone(), config.oracle_address().clone())
            .with_params(config.governance_params());
        let mut runtime = Runtime::new(engine).with_operation_limit(config.operation_limit);
        tracing::info!(
            dao = %config.dao,
            oracle = %config.oracle_address(),
            voting_period = %format_period(config.governance.voting_period),
            timelock_period = %format_period(config.governance.timelock_period),
            "simulation configured"
        );

        runtime.deploy(config.token.clone(), SnapshotLedger::new(config.admin.clone()));
        if config.oracle.kind == OracleKind::Stub {
            runtime.deploy(
                config.oracle.address.clone(),
                NullOracle::new(config.oracle.balance.into()),
            );
        }
        for store in &config.stores {
            let admin = store.admin.clone().unwrap_or_else(|| config.dao.clone());
            runtime.deploy(store.address.clone(), NullStore::new(admin));
        }

        Self {
            config,
            runtime,
            outcomes: Vec::new(),
        }
    }

    /// Run every step of `scenario` in order.
    ///
    /// Stops at the first step whose outcome contradicts its
    /// `expect_failure` flag.
    pub fn run(&mut self, scenario: &Scenario) -> Result<(), SimError> {
        tracing::info!(scenario = %scenario.name, steps = scenario.steps.len(), "scenario started");
        for (index, step) in scenario.steps.iter().enumerate() {
            let action = step.action.name();
            let result = self.apply(&step.action);
            let outcome = StepOutcome {
                index,
                action,
                expect_failure: step.expect_failure,
                receipt: result.as_ref().ok().cloned().flatten(),
                error: result.as_ref().err().map(ToString::to_string),
            };
            self.outcomes.push(outcome);

            match (result, step.expect_failure) {
                (Ok(_), false) => tracing::info!(index, action, "step applied"),
                (Err(err), true) => {
                    tracing::info!(index, action, error = %err, "step failed as expected")
                }
                (Ok(_), true) => {
                    return Err(SimError::UnexpectedSuccess {
                        index,
                        action: action.to_string(),
                    })
                }
                (Err(source), false) => {
                    return Err(SimError::StepFailed {
                        index,
                        action: action.to_string(),
                        source,
                    })
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, action: &Action) -> Result<Option<Receipt>, RuntimeError> {
        let admin = &self.config.admin;
        let token = self.config.token.clone();
        let dao = self.config.dao.clone();

        let (sender, target, call) = match action {
            Action::Advance { points, seconds } => {
                self.runtime.advance(*points, *seconds);
                return Ok(None);
            }
            Action::Mint { sender, to, value } => (
                sender.clone().unwrap_or_else(|| admin.clone()),
                token,
                Call::contract("mint", json!({ "address": to, "value": value })),
            ),
            Action::Transfer {
                sender,
                from,
                to,
                value,
            } => (
                sender.clone().unwrap_or_else(|| from.clone()),
                token,
                Call::contract("transfer", json!({ "from": from, "to": to, "value": value })),
            ),
            Action::Approve {
                sender,
                spender,
                value,
            } => (
                sender.clone(),
                token,
                Call::contract("approve", json!({ "spender": spender, "value": value })),
            ),
            Action::DisableMint { sender } => (
                sender.clone().unwrap_or_else(|| admin.clone()),
                token,
                Call::contract("disable_mint", serde_json::Value::Null),
            ),
            Action::RegisterProposal {
                sender,
                metadata,
                effects,
            } => (
                sender.clone(),
                dao,
                Call::RegisterProposal {
                    metadata: metadata.clone(),
                    action: ProposalAction::from_effects(effects.clone()),
                },
            ),
            Action::Vote {
                sender,
                proposal_id,
                vote,
            } => (
                sender.clone(),
                dao,
                Call::Vote {
                    proposal_id: *proposal_id,
                    vote_value: vote.value(),
                },
            ),
            Action::EndVoting {
                sender,
                proposal_id,
            } => (
                sender.clone().unwrap_or_else(|| admin.clone()),
                dao,
                Call::EndVoting {
                    proposal_id: *proposal_id,
                },
            ),
            Action::ExecuteProposal {
                sender,
                proposal_id,
            } => (
                sender.clone().unwrap_or_else(|| admin.clone()),
                dao,
                Call::ExecuteProposal {
                    proposal_id: *proposal_id,
                },
            ),
            Action::Call {
                sender,
                target,
                entrypoint,
                payload,
            } => (
                sender.clone(),
                target.clone(),
                Call::contract(entrypoint.clone(), payload.clone()),
            ),
        };
        self.runtime.submit(sender, target, call).map(Some)
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn ledger(&self) -> Result<&SnapshotLedger, SimError> {
        self.runtime
            .contract_as::<SnapshotLedger>(&self.config.token)
            .ok_or_else(|| SimError::MissingLedger(self.config.token.clone()))
    }

    /// Checkpoint the token ledger at the current point.
    pub fn checkpoint(&self) -> Result<LedgerCheckpoint, SimError> {
        Ok(self.ledger()?.checkpoint(self.runtime.level()))
    }

    pub fn report(&self, scenario: &Scenario) -> Result<Report, SimError> {
        let ledger = self.ledger()?;
        let engine = self.runtime.engine();
        Ok(Report {
            scenario: scenario.name.clone(),
            level: self.runtime.level(),
            now: self.runtime.now(),
            state: engine.state(),
            governance: engine.governance_parameters().clone(),
            proposals: engine.proposals().iter().cloned().collect(),
            total_supply: ledger.total_supply(),
            balances: ledger
                .balances()
                .accounts()
                .map(|(address, account)| (address.clone(), account.balance))
                .collect(),
            steps: self.outcomes.clone(),
            stats: self.runtime.stats().clone(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn balance_of(&self, address: &Address) -> Result<u128, SimError> {
        Ok(self.ledger()?.balance_of(address))
    }
}
