//! Live balances and allowances.

use crate::LedgerError;
use flow_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A holder's live balance and the allowances it has granted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u128,
    /// spender → remaining allowance.
    pub approvals: BTreeMap<Address, u128>,
}

/// Current balances, allowances and total supply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceStore {
    accounts: BTreeMap<Address, Account>,
    total_supply: u128,
}

impl BalanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, address: &Address) -> u128 {
        self.accounts.get(address).map_or(0, |a| a.balance)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.approval(owner, spender).unwrap_or(0)
    }

    /// The approval entry `owner` granted `spender`, if one was ever made.
    pub fn approval(&self, owner: &Address, spender: &Address) -> Option<u128> {
        self.accounts
            .get(owner)
            .and_then(|a| a.approvals.get(spender))
            .copied()
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.accounts.iter()
    }

    /// Move `value` from `from` to `to`. Returns the new `(from, to)` balances.
    ///
    /// Checks everything before touching state, so a failure leaves the
    /// store unchanged.
    pub fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        value: u128,
    ) -> Result<(u128, u128), LedgerError> {
        let available = self.balance_of(from);
        let from_balance = available
            .checked_sub(value)
            .ok_or(LedgerError::InsufficientBalance {
                needed: value,
                available,
            })?;
        let to_balance = self
            .balance_of(to)
            .checked_add(value)
            .ok_or(LedgerError::Overflow)?;

        self.accounts.entry(from.clone()).or_default().balance = from_balance;
        self.accounts.entry(to.clone()).or_default().balance = to_balance;
        Ok((from_balance, to_balance))
    }

    /// Credit freshly minted tokens. Returns the holder's new balance.
    pub fn credit(&mut self, address: &Address, value: u128) -> Result<u128, LedgerError> {
        let balance = self
            .balance_of(address)
            .checked_add(value)
            .ok_or(LedgerError::Overflow)?;
        let total_supply = self
            .total_supply
            .checked_add(value)
            .ok_or(LedgerError::Overflow)?;

        self.accounts.entry(address.clone()).or_default().balance = balance;
        self.total_supply = total_supply;
        Ok(balance)
    }

    pub fn set_allowance(&mut self, owner: &Address, spender: &Address, value: u128) {
        self.accounts
            .entry(owner.clone())
            .or_default()
            .approvals
            .insert(spender.clone(), value);
    }

    pub(crate) fn insert_account(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    pub(crate) fn set_total_supply(&mut self, total_supply: u128) {
        self.total_supply = total_supply;
    }
}
