use flow_governance::GovernanceError;
use flow_ledger::LedgerError;
use flow_types::{Address, OracleError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("unknown entry point: {0}")]
    UnknownEntrypoint(String),

    #[error("invalid payload for {entrypoint}: {source}")]
    InvalidPayload {
        entrypoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("sender {0} is not allowed to call this entry point")]
    NotAllowed(Address),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("no contract deployed at {0}")]
    UnknownContract(Address),

    #[error("contract at {0} cannot answer balance queries")]
    UnknownOracle(Address),

    #[error("{entrypoint} cannot be sent to {target}")]
    UnsupportedCall { target: Address, entrypoint: String },

    #[error("submission exceeded {0} operations")]
    OperationLimit(usize),
}
