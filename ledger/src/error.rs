use flow_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("sender is not the administrator")]
    NotAdmin,

    #[error("{sender} may not move tokens of {owner}")]
    NotAllowed { sender: Address, owner: Address },

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u128, available: u128 },

    #[error("allowance must be reset to zero before it can be changed")]
    UnsafeAllowanceChange,

    #[error("self transfers are not allowed")]
    SelfTransferNotAllowed,

    #[error("minting is disabled")]
    MintingDisabled,

    #[error("arithmetic overflow in ledger computation")]
    Overflow,

    #[error("invalid checkpoint: {0}")]
    Checkpoint(String),
}
