//! The snapshot ledger: a token whose every balance change is snapshotted.

use crate::admin::{AdminGate, MintGate};
use crate::balances::BalanceStore;
use crate::snapshot::{BalanceHistory, SnapshotStore};
use crate::LedgerError;
use flow_types::{Address, BalanceOracle, BalanceQuery, CallContext, OracleError, Point};
use serde::{Deserialize, Serialize};

/// Token ledger composed of a balance store, a snapshot store and two gates.
///
/// Every path that changes a live balance records the new balance in the
/// snapshot store at the caller's current point: twice per transfer (sender
/// and recipient), once per mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLedger {
    pub(crate) balances: BalanceStore,
    pub(crate) snapshots: SnapshotStore,
    pub(crate) admin: AdminGate,
    pub(crate) mint_gate: MintGate,
}

impl SnapshotLedger {
    pub fn new(administrator: Address) -> Self {
        Self {
            balances: BalanceStore::new(),
            snapshots: SnapshotStore::new(),
            admin: AdminGate::new(administrator),
            mint_gate: MintGate::default(),
        }
    }

    /// Move `value` tokens from `from` to `to`.
    ///
    /// The sender must be `from` or hold an allowance of at least `value`
    /// from it; the allowance is spent in the latter case.
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        from: &Address,
        to: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        // Third parties need an approval entry, even for a zero value.
        let allowance = if ctx.sender == *from {
            None
        } else {
            match self.balances.approval(from, &ctx.sender) {
                Some(allowance) if allowance >= value => Some(allowance),
                _ => {
                    return Err(LedgerError::NotAllowed {
                        sender: ctx.sender.clone(),
                        owner: from.clone(),
                    })
                }
            }
        };
        if from == to {
            return Err(LedgerError::SelfTransferNotAllowed);
        }

        let (from_balance, to_balance) = self.balances.move_balance(from, to, value)?;
        self.snapshots.record(from, from_balance, ctx.level);
        self.snapshots.record(to, to_balance, ctx.level);

        if let Some(allowance) = allowance {
            self.balances
                .set_allowance(from, &ctx.sender, allowance - value);
        }
        tracing::debug!(%from, %to, value, level = %ctx.level, "transfer applied");
        Ok(())
    }

    /// Grant `spender` an allowance over the sender's tokens.
    ///
    /// An existing non-zero allowance can only be reset to zero, never
    /// changed directly to another non-zero value.
    pub fn approve(
        &mut self,
        ctx: &CallContext,
        spender: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        let already_approved = self.balances.allowance(&ctx.sender, spender);
        if already_approved != 0 && value != 0 {
            return Err(LedgerError::UnsafeAllowanceChange);
        }
        self.balances.set_allowance(&ctx.sender, spender, value);
        Ok(())
    }

    /// Mint `value` new tokens to `address`. Administrator only.
    pub fn mint(
        &mut self,
        ctx: &CallContext,
        address: &Address,
        value: u128,
    ) -> Result<(), LedgerError> {
        self.admin.ensure(&ctx.sender)?;
        self.mint_gate.ensure_enabled()?;

        let balance = self.balances.credit(address, value)?;
        self.snapshots.record(address, balance, ctx.level);
        tracing::info!(%address, value, level = %ctx.level, "tokens minted");
        Ok(())
    }

    /// Permanently disable minting. Administrator only.
    pub fn disable_mint(&mut self, ctx: &CallContext) -> Result<(), LedgerError> {
        self.admin.ensure(&ctx.sender)?;
        self.mint_gate.disable();
        tracing::info!("minting disabled");
        Ok(())
    }

    /// Hand administration to a new address. Administrator only.
    pub fn set_administrator(
        &mut self,
        ctx: &CallContext,
        administrator: Address,
    ) -> Result<(), LedgerError> {
        self.admin.ensure(&ctx.sender)?;
        tracing::info!(from = %self.admin.administrator(), to = %administrator, "administrator changed");
        self.admin.set_administrator(administrator);
        Ok(())
    }

    /// Balance of `address` as of `point`, judged from `current`.
    pub fn balance_at(
        &self,
        address: &Address,
        point: Point,
        current: Point,
    ) -> Result<u128, OracleError> {
        self.snapshots.balance_at(address, point, current)
    }

    pub fn balance_of(&self, address: &Address) -> u128 {
        self.balances.balance_of(address)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.balances.allowance(owner, spender)
    }

    pub fn total_supply(&self) -> u128 {
        self.balances.total_supply()
    }

    pub fn administrator(&self) -> &Address {
        self.admin.administrator()
    }

    pub fn is_minting_disabled(&self) -> bool {
        self.mint_gate.is_disabled()
    }

    pub fn history(&self, address: &Address) -> Option<&BalanceHistory> {
        self.snapshots.history(address)
    }

    pub fn snapshot_count(&self, address: &Address) -> usize {
        self.snapshots.snapshot_count(address)
    }

    pub fn balances(&self) -> &BalanceStore {
        &self.balances
    }

    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }
}

impl BalanceOracle for SnapshotLedger {
    fn balance_at(&self, query: &BalanceQuery, current: Point) -> Result<u128, OracleError> {
        self.snapshots.balance_at(&query.address, query.point, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_types::Timestamp;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    fn ctx(sender: &str, level: u64) -> CallContext {
        CallContext::new(addr(sender), Point::new(level), Timestamp::new(level * 60))
    }

    fn ledger() -> SnapshotLedger {
        SnapshotLedger::new(addr("tz1admin"))
    }

    #[test]
    fn mint_then_periodic_transfers() {
        let mut ledger = ledger();
        ledger.mint(&ctx("tz1admin", 1), &addr("tz1a"), 100).unwrap();
        for level in [2, 4, 6, 8, 10] {
            ledger
                .transfer(&ctx("tz1a", level), &addr("tz1a"), &addr("tz1b"), 10)
                .unwrap();
        }

        let b = addr("tz1b");
        assert_eq!(ledger.snapshot_count(&b), 6);
        assert_eq!(ledger.balance_at(&b, Point::new(5), Point::new(12)).unwrap(), 20);
        assert_eq!(ledger.balance_at(&b, Point::new(11), Point::new(12)).unwrap(), 50);
        assert_eq!(ledger.balance_at(&b, Point::new(1), Point::new(12)).unwrap(), 0);
        assert_eq!(
            ledger.balance_at(&addr("tz1a"), Point::new(7), Point::new(12)).unwrap(),
            70
        );
        assert_eq!(ledger.balance_of(&b), 50);
    }

    #[test]
    fn two_transfers_in_one_point_keep_one_snapshot() {
        let mut ledger = ledger();
        ledger.mint(&ctx("tz1admin", 1), &addr("tz1a"), 100).unwrap();
        ledger
            .transfer(&ctx("tz1a", 3), &addr("tz1a"), &addr("tz1b"), 10)
            .unwrap();
        ledger
            .transfer(&ctx("tz1a", 3), &addr("tz1a"), &addr("tz1b"), 15)
            .unwrap();

        assert_eq!(ledger.snapshot_count(&addr("tz1b")), 2);
        assert_eq!(ledger.snapshot_count(&addr("tz1a")), 3);
        assert_eq!(
            ledger.balance_at(&addr("tz1b"), Point::new(3), Point::new(4)).unwrap(),
            25
        );
    }

    #[test]
    fn mint_requires_admin() {
        let mut ledger = ledger();
        let err = ledger.mint(&ctx("tz1a", 1), &addr("tz1a"), 1).unwrap_err();
        assert!(matches!(err, LedgerError::NotAdmin));
        assert_eq!(ledger.snapshot_count(&addr("tz1a")), 0);
    }

    #[test]
    fn disabled_mint_stays_disabled() {
        let mut ledger = ledger();
        ledger.disable_mint(&ctx("tz1admin", 1)).unwrap();
        let err = ledger.mint(&ctx("tz1admin", 2), &addr("tz1a"), 1).unwrap_err();
        assert!(matches!(err, LedgerError::MintingDisabled));
        assert!(ledger.is_minting_disabled());
    }

    #[test]
    fn self_transfer_is_rejected() {
        let mut ledger = ledger();
        ledger.mint(&ctx("tz1admin", 1), &addr("tz1a"), 10).unwrap();
        let err = ledger
            .transfer(&ctx("tz1a", 2), &addr("tz1a"), &addr("tz1a"), 1)
            .unwrap_err();
        assert!(matches!(err, LedgerError::SelfTransferNotAllowed));
        assert_eq!(ledger.snapshot_count(&addr("tz1a")), 2);
    }

    #[test]
    fn transfer_of_others_tokens_needs_allowance() {
        let mut ledger = ledger();
        ledger.mint(&ctx("tz1admin", 1), &addr("tz1a"), 10).unwrap();

        let err = ledger
            .transfer(&ctx("tz1spender", 2), &addr("tz1a"), &addr("tz1b"), 4)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotAllowed { .. }));

        ledger.approve(&ctx("tz1a", 2), &addr("tz1spender"), 5).unwrap();
        ledger
            .transfer(&ctx("tz1spender", 3), &addr("tz1a"), &addr("tz1b"), 4)
            .unwrap();
        assert_eq!(ledger.allowance(&addr("tz1a"), &addr("tz1spender")), 1);
        assert_eq!(ledger.balance_of(&addr("tz1b")), 4);
    }

    #[test]
    fn zero_value_transfer_by_stranger_is_rejected() {
        let mut ledger = ledger();
        let err = ledger
            .transfer(&ctx("tz1mallory", 3), &addr("tz1victim"), &addr("tz1x"), 0)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotAllowed { .. }));
        assert_eq!(ledger.snapshot_count(&addr("tz1victim")), 0);
        assert_eq!(ledger.snapshot_count(&addr("tz1x")), 0);

        // An existing approval entry, even a spent one, authorises zero.
        ledger.approve(&ctx("tz1victim", 3), &addr("tz1mallory"), 0).unwrap();
        ledger
            .transfer(&ctx("tz1mallory", 3), &addr("tz1victim"), &addr("tz1x"), 0)
            .unwrap();
        assert_eq!(ledger.allowance(&addr("tz1victim"), &addr("tz1mallory")), 0);
    }

    #[test]
    fn allowance_changes_must_pass_through_zero() {
        let mut ledger = ledger();
        ledger.approve(&ctx("tz1a", 1), &addr("tz1s"), 5).unwrap();
        let err = ledger.approve(&ctx("tz1a", 1), &addr("tz1s"), 7).unwrap_err();
        assert!(matches!(err, LedgerError::UnsafeAllowanceChange));
        ledger.approve(&ctx("tz1a", 1), &addr("tz1s"), 0).unwrap();
        ledger.approve(&ctx("tz1a", 1), &addr("tz1s"), 7).unwrap();
        assert_eq!(ledger.allowance(&addr("tz1a"), &addr("tz1s")), 7);
    }

    #[test]
    fn insufficient_balance_leaves_no_snapshot() {
        let mut ledger = ledger();
        ledger.mint(&ctx("tz1admin", 1), &addr("tz1a"), 3).unwrap();
        let err = ledger
            .transfer(&ctx("tz1a", 2), &addr("tz1a"), &addr("tz1b"), 4)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(ledger.snapshot_count(&addr("tz1b")), 0);
    }

    #[test]
    fn administrator_handover() {
        let mut ledger = ledger();
        ledger
            .set_administrator(&ctx("tz1admin", 1), addr("KT1dao"))
            .unwrap();
        assert_eq!(ledger.administrator(), &addr("KT1dao"));
        assert!(matches!(
            ledger.set_administrator(&ctx("tz1admin", 1), addr("tz1admin")),
            Err(LedgerError::NotAdmin)
        ));
    }

    #[test]
    fn oracle_matches_direct_query() {
        let mut ledger = ledger();
        ledger.mint(&ctx("tz1admin", 1), &addr("tz1a"), 9).unwrap();
        let query = BalanceQuery {
            address: addr("tz1a"),
            point: Point::new(1),
        };
        assert_eq!(BalanceOracle::balance_at(&ledger, &query, Point::new(2)).unwrap(), 9);
        assert!(BalanceOracle::balance_at(&ledger, &query, Point::new(1)).is_err());
    }
}
