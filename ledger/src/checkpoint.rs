//! Ledger checkpoints: a verifiable export of the whole ledger state.
//!
//! A checkpoint captures live balances, allowances and every holder's balance
//! history at a given point. Its hash is computed deterministically from the
//! content (accounts are kept in address order), so a restored ledger can be
//! checked against the hash it was exported with.

use crate::admin::{AdminGate, MintGate};
use crate::balances::{Account, BalanceStore};
use crate::snapshot::{BalanceHistory, BalanceSnapshot, SnapshotStore};
use crate::{LedgerError, SnapshotLedger};
use flow_types::{Address, Point};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current checkpoint format version.
pub const CHECKPOINT_VERSION: u32 = 1;

/// A ledger checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerCheckpoint {
    /// Blake2b-256 over the checkpoint content.
    pub hash: [u8; 32],
    /// Point at which the checkpoint was taken.
    pub level: Point,
    pub administrator: Address,
    pub minting_disabled: bool,
    pub total_supply: u128,
    /// One entry per holder with a balance, an allowance or a history.
    pub accounts: Vec<AccountCheckpoint>,
    pub version: u32,
}

/// The state of a single holder captured in a checkpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountCheckpoint {
    pub address: Address,
    pub balance: u128,
    pub approvals: Vec<(Address, u128)>,
    pub history: Vec<BalanceSnapshot>,
}

impl LedgerCheckpoint {
    /// Compute the Blake2b-256 hash of this checkpoint deterministically.
    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.level.as_u64().to_le_bytes());
        hasher.update((self.administrator.as_str().len() as u64).to_le_bytes());
        hasher.update(self.administrator.as_str().as_bytes());
        hasher.update([u8::from(self.minting_disabled)]);
        hasher.update(self.total_supply.to_le_bytes());
        for account in &self.accounts {
            hasher.update((account.address.as_str().len() as u64).to_le_bytes());
            hasher.update(account.address.as_str().as_bytes());
            hasher.update(account.balance.to_le_bytes());
            hasher.update((account.approvals.len() as u64).to_le_bytes());
            for (spender, value) in &account.approvals {
                hasher.update((spender.as_str().len() as u64).to_le_bytes());
                hasher.update(spender.as_str().as_bytes());
                hasher.update(value.to_le_bytes());
            }
            hasher.update((account.history.len() as u64).to_le_bytes());
            for snapshot in &account.history {
                hasher.update(snapshot.point.as_u64().to_le_bytes());
                hasher.update(snapshot.balance.to_le_bytes());
            }
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the checkpoint hash matches its content.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Serialize the checkpoint to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Checkpoint(e.to_string()))
    }

    /// Deserialize a checkpoint from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Checkpoint(e.to_string()))
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

impl SnapshotLedger {
    /// Export the full ledger state as of `level`.
    pub fn checkpoint(&self, level: Point) -> LedgerCheckpoint {
        let mut accounts: BTreeMap<&Address, AccountCheckpoint> = BTreeMap::new();
        let blank = |address: &Address| AccountCheckpoint {
            address: address.clone(),
            balance: 0,
            approvals: Vec::new(),
            history: Vec::new(),
        };

        for (address, account) in self.balances.accounts() {
            let entry = accounts.entry(address).or_insert_with(|| blank(address));
            entry.balance = account.balance;
            entry.approvals = account
                .approvals
                .iter()
                .map(|(spender, value)| (spender.clone(), *value))
                .collect();
        }
        for (address, history) in self.snapshots.iter() {
            accounts
                .entry(address)
                .or_insert_with(|| blank(address))
                .history = history.entries().to_vec();
        }

        let mut checkpoint = LedgerCheckpoint {
            hash: [0u8; 32],
            level,
            administrator: self.admin.administrator().clone(),
            minting_disabled: self.mint_gate.is_disabled(),
            total_supply: self.balances.total_supply(),
            accounts: accounts.into_values().collect(),
            version: CHECKPOINT_VERSION,
        };
        checkpoint.hash = checkpoint.compute_hash();
        checkpoint
    }

    /// Rebuild a ledger from a checkpoint, verifying hash and history invariants.
    pub fn restore(checkpoint: &LedgerCheckpoint) -> Result<Self, LedgerError> {
        if checkpoint.version != CHECKPOINT_VERSION {
            return Err(LedgerError::Checkpoint(format!(
                "unsupported version {}",
                checkpoint.version
            )));
        }
        if !checkpoint.verify() {
            return Err(LedgerError::Checkpoint("hash mismatch".into()));
        }

        let mut balances = BalanceStore::new();
        let mut snapshots = SnapshotStore::new();
        let mut supply: u128 = 0;
        for account in &checkpoint.accounts {
            supply = supply
                .checked_add(account.balance)
                .ok_or(LedgerError::Overflow)?;
            balances.insert_account(
                account.address.clone(),
                Account {
                    balance: account.balance,
                    approvals: account.approvals.iter().cloned().collect(),
                },
            );
            if !account.history.is_empty() {
                let history = BalanceHistory::from_entries(account.history.clone()).ok_or_else(
                    || LedgerError::Checkpoint(format!("malformed history for {}", account.address)),
                )?;
                snapshots.insert_history(account.address.clone(), history);
            }
        }
        if supply != checkpoint.total_supply {
            return Err(LedgerError::Checkpoint(format!(
                "total supply {} does not match balances {}",
                checkpoint.total_supply, supply
            )));
        }
        balances.set_total_supply(supply);

        let mut mint_gate = MintGate::default();
        if checkpoint.minting_disabled {
            mint_gate.disable();
        }

        tracing::info!(
            level = %checkpoint.level,
            accounts = checkpoint.account_count(),
            "ledger restored from checkpoint"
        );
        Ok(Self {
            balances,
            snapshots,
            admin: AdminGate::new(checkpoint.administrator.clone()),
            mint_gate,
        })
    }
}
