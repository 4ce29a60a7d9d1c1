use flow_ledger::LedgerError;
use flow_runtime::RuntimeError;
use flow_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("config error: {0}")]
    Config(String),

    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("step {index} ({action}) failed: {source}")]
    StepFailed {
        index: usize,
        action: String,
        #[source]
        source: RuntimeError,
    },

    #[error("step {index} ({action}) succeeded but was expected to fail")]
    UnexpectedSuccess { index: usize, action: String },

    #[error("no snapshot ledger deployed at {0}")]
    MissingLedger(Address),

    #[error("checkpoint error: {0}")]
    Checkpoint(#[from] LedgerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
