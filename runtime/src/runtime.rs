//! The execution environment.

use crate::call::{Applied, Call, Receipt};
use crate::contract::Contract;
use crate::error::RuntimeError;
use flow_governance::{EngineConfig, GovernanceEngine, OracleRequest};
use flow_types::{Address, BalanceOracle, CallContext, Point, Timestamp};
use flow_utils::Counters;
use std::collections::{BTreeMap, VecDeque};

/// Operations a single submission may run before it is aborted.
pub const DEFAULT_OPERATION_LIMIT: usize = 64;

const COUNTERS: &[&str] = &[
    "submissions",
    "rolled_back",
    "operations",
    "oracle_queries",
    "effects",
    "contract_copies",
];

enum Operation {
    Call {
        sender: Address,
        target: Address,
        call: Call,
    },
    Query(OracleRequest),
}

/// One governance engine, its contracts and the clock they share.
///
/// Point and time only move through [`Runtime::advance`].
pub struct Runtime {
    level: Point,
    now: Timestamp,
    engine: GovernanceEngine,
    contracts: BTreeMap<Address, Box<dyn Contract>>,
    operation_limit: usize,
    stats: Counters,
}

impl Runtime {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            level: Point::GENESIS,
            now: Timestamp::EPOCH,
            engine: GovernanceEngine::new(config),
            contracts: BTreeMap::new(),
            operation_limit: DEFAULT_OPERATION_LIMIT,
            stats: Counters::new(COUNTERS),
        }
    }

    pub fn with_operation_limit(mut self, limit: usize) -> Self {
        self.operation_limit = limit;
        self
    }

    /// Deploy `contract` at `address`, replacing whatever was there.
    pub fn deploy(&mut self, address: Address, contract: impl Contract + 'static) {
        tracing::debug!(%address, "contract deployed");
        self.contracts.insert(address, Box::new(contract));
    }

    /// Move the clock forward by `points` and `seconds`.
    pub fn advance(&mut self, points: u64, seconds: u64) {
        self.level = self.level.advance(points);
        self.now = self.now.add_seconds(i64::try_from(seconds).unwrap_or(i64::MAX));
        tracing::debug!(level = %self.level, now = %self.now, "clock advanced");
    }

    /// Run `call` from `sender` against `target`, then every operation it
    /// triggers.
    ///
    /// Nothing changes unless every operation succeeds. The engine is saved
    /// up front and each contract the first time the submission calls it;
    /// oracle queries only read.
    pub fn submit(
        &mut self,
        sender: Address,
        target: Address,
        call: Call,
    ) -> Result<Receipt, RuntimeError> {
        self.stats.increment("submissions");
        let engine = self.engine.clone();
        let mut touched = BTreeMap::new();
        let entrypoint = call.entrypoint().to_string();

        let mut queue = VecDeque::from([Operation::Call {
            sender: sender.clone(),
            target: target.clone(),
            call,
        }]);
        match self.drain(&mut queue, &mut touched) {
            Ok(receipt) => Ok(receipt),
            Err(err) => {
                self.engine = engine;
                self.contracts.extend(touched);
                self.stats.increment("rolled_back");
                tracing::warn!(%sender, %target, %entrypoint, error = %err, "submission rolled back");
                Err(err)
            }
        }
    }

    fn drain(
        &mut self,
        queue: &mut VecDeque<Operation>,
        touched: &mut BTreeMap<Address, Box<dyn Contract>>,
    ) -> Result<Receipt, RuntimeError> {
        let mut receipt = Receipt::default();
        let mut processed = 0;
        while let Some(operation) = queue.pop_front() {
            processed += 1;
            if processed > self.operation_limit {
                return Err(RuntimeError::OperationLimit(self.operation_limit));
            }
            self.stats.increment("operations");
            match operation {
                Operation::Call {
                    sender,
                    target,
                    call,
                } => {
                    receipt.applied.push(Applied::Call {
                        sender: sender.clone(),
                        target: target.clone(),
                        entrypoint: call.entrypoint().to_string(),
                    });
                    if target == *self.engine.address() {
                        self.apply_governance(sender, call, queue, &mut receipt)?;
                    } else {
                        self.apply_contract(sender, target, call, queue, touched)?;
                    }
                }
                Operation::Query(request) => {
                    self.stats.increment("oracle_queries");
                    let balance = self.answer(&request)?;
                    receipt.applied.push(Applied::Snapshot {
                        oracle: request.oracle.clone(),
                        address: request.query.address.clone(),
                        point: request.query.point,
                        balance,
                    });
                    queue.push_back(Operation::Call {
                        sender: request.oracle,
                        target: self.engine.address().clone(),
                        call: Call::callback(request.reply_to, balance),
                    });
                }
            }
        }
        Ok(receipt)
    }

    fn apply_governance(
        &mut self,
        sender: Address,
        call: Call,
        queue: &mut VecDeque<Operation>,
        receipt: &mut Receipt,
    ) -> Result<(), RuntimeError> {
        let ctx = self.context(sender);
        match call {
            Call::RegisterProposal { metadata, action } => {
                let request = self.engine.register_proposal(&ctx, metadata, action)?;
                queue.push_back(Operation::Query(request));
            }
            Call::RegisterProposalCallback { balance } => {
                let id = self.engine.register_proposal_callback(&ctx, balance)?;
                receipt.registered = Some(id);
            }
            Call::Vote {
                proposal_id,
                vote_value,
            } => {
                let request = self.engine.vote(&ctx, proposal_id, vote_value)?;
                queue.push_back(Operation::Query(request));
            }
            Call::VoteCallback { balance } => self.engine.vote_callback(&ctx, balance)?,
            Call::EndVoting { proposal_id } => {
                receipt.decided = Some(self.engine.end_voting(&ctx, proposal_id)?);
            }
            Call::ExecuteProposal { proposal_id } => {
                let effects = self.engine.execute_proposal(&ctx, proposal_id)?;
                self.stats.add("effects", effects.len() as u64);
                receipt.effects += effects.len();
                let engine = self.engine.address().clone();
                for effect in effects {
                    let (target, call) = Call::from_effect(effect, &engine);
                    queue.push_back(Operation::Call {
                        sender: engine.clone(),
                        target,
                        call,
                    });
                }
            }
            Call::SetGovernanceParameters { params } => {
                self.engine.set_governance_parameters(&ctx, params)?
            }
            Call::Contract { entrypoint, .. } => {
                return Err(RuntimeError::UnsupportedCall {
                    target: self.engine.address().clone(),
                    entrypoint,
                })
            }
        }
        Ok(())
    }

    fn apply_contract(
        &mut self,
        sender: Address,
        target: Address,
        call: Call,
        queue: &mut VecDeque<Operation>,
        touched: &mut BTreeMap<Address, Box<dyn Contract>>,
    ) -> Result<(), RuntimeError> {
        let ctx = self.context(sender);
        let (entrypoint, payload) = match call {
            Call::Contract {
                entrypoint,
                payload,
            } => (entrypoint, payload),
            other => {
                return Err(RuntimeError::UnsupportedCall {
                    entrypoint: other.entrypoint().to_string(),
                    target,
                })
            }
        };
        let contract = self
            .contracts
            .get_mut(&target)
            .ok_or_else(|| RuntimeError::UnknownContract(target.clone()))?;
        if !touched.contains_key(&target) {
            touched.insert(target.clone(), contract.clone_box());
            self.stats.increment("contract_copies");
        }
        let effects = contract.call(&ctx, &entrypoint, payload)?;
        for effect in effects {
            let (to, call) = Call::from_effect(effect, self.engine.address());
            queue.push_back(Operation::Call {
                sender: target.clone(),
                target: to,
                call,
            });
        }
        Ok(())
    }

    fn answer(&self, request: &OracleRequest) -> Result<u128, RuntimeError> {
        let oracle = self
            .contracts
            .get(&request.oracle)
            .ok_or_else(|| RuntimeError::UnknownContract(request.oracle.clone()))?
            .balance_oracle()
            .ok_or_else(|| RuntimeError::UnknownOracle(request.oracle.clone()))?;
        let balance = oracle.balance_at(&request.query, self.level)?;
        tracing::debug!(
            address = %request.query.address,
            point = %request.query.point,
            balance,
            "balance snapshot answered"
        );
        Ok(balance)
    }

    fn context(&self, sender: Address) -> CallContext {
        CallContext::new(sender, self.level, self.now)
    }

    pub fn level(&self) -> Point {
        self.level
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn engine(&self) -> &GovernanceEngine {
        &self.engine
    }

    pub fn contract(&self, address: &Address) -> Option<&dyn Contract> {
        self.contracts.get(address).map(|contract| &**contract)
    }

    /// The contract at `address` if it has type `T`.
    pub fn contract_as<T: Contract + 'static>(&self, address: &Address) -> Option<&T> {
        self.contract(address)?.as_any().downcast_ref::<T>()
    }

    pub fn stats(&self) -> &Counters {
        &self.stats
    }
}
