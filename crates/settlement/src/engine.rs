//! Settlement computation: expand → consolidate → net → sort.
//!
//! Rounding rules are part of the output contract:
//! - each expense's share is rounded once (`round2(amount / n)`), so drift
//!   across many small expenses is accepted and never corrected;
//! - pair totals are re-rounded after every addition, not once at the end;
//! - anything at or below [`SETTLED_TOLERANCE`] counts as settled.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use tabshare_core::{Entity, ExpenseId, Money, ParticipantId};
use tabshare_ledger::Expense;

use crate::collation::CollationKey;
use crate::directory::ParticipantDirectory;

/// Amounts whose absolute value does not exceed this are treated as settled.
pub const SETTLED_TOLERANCE: Money = Money::CENT;

/// Raw debt: one split member owing the payer their share of one expense.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
    pub expense: ExpenseId,
}

/// Sum of all raw debts for one ordered pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedDebt {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// A settlement transfer: `from` pays `to` the (positive) `amount`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDebt {
    pub from: ParticipantId,
    pub to: ParticipantId,
    pub amount: Money,
}

/// Consolidated debts keyed by ordered `(from, to)` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedDebts {
    by_pair: BTreeMap<(ParticipantId, ParticipantId), Money>,
}

impl ConsolidatedDebts {
    /// Add one raw debt, re-rounding the running total.
    pub fn accumulate(&mut self, debt: &Debt) {
        let total = self.by_pair.entry((debt.from, debt.to)).or_insert(Money::ZERO);
        *total = (*total + debt.amount).round2();
    }

    pub fn get(&self, from: ParticipantId, to: ParticipantId) -> Option<Money> {
        self.by_pair.get(&(from, to)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = ConsolidatedDebt> + '_ {
        self.by_pair
            .iter()
            .map(|(&(from, to), &amount)| ConsolidatedDebt { from, to, amount })
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }
}

/// Step 1: one raw debt per (expense, split member other than the payer).
pub fn expand(expenses: &[Expense]) -> Vec<Debt> {
    let mut debts = Vec::new();
    for expense in expenses {
        let per_person = expense.per_person();
        for &member in expense.split_between() {
            if member != expense.paid_by() {
                debts.push(Debt {
                    from: member,
                    to: expense.paid_by(),
                    amount: per_person,
                    expense: *expense.id(),
                });
            }
        }
    }
    debts
}

/// Step 2: group raw debts by ordered pair with incremental rounding.
pub fn consolidate(debts: &[Debt]) -> ConsolidatedDebts {
    let mut consolidated = ConsolidatedDebts::default();
    for debt in debts {
        consolidated.accumulate(debt);
    }
    consolidated
}

/// Step 3: cancel mutual debts; drop anything within the settled tolerance.
///
/// The result is unordered; see [`sort_settlements`].
pub fn net(consolidated: &ConsolidatedDebts) -> Vec<NetDebt> {
    let mut settlements = Vec::new();
    let mut processed: HashSet<(ParticipantId, ParticipantId)> = HashSet::new();

    for debt in consolidated.iter() {
        let forward = (debt.from, debt.to);
        let reverse = (debt.to, debt.from);
        if processed.contains(&forward) || processed.contains(&reverse) {
            continue;
        }

        match consolidated.get(debt.to, debt.from) {
            Some(reverse_amount) => {
                let net_amount = (debt.amount - reverse_amount).round2();
                if net_amount.abs() > SETTLED_TOLERANCE {
                    let (from, to) = if net_amount.is_positive() {
                        (debt.from, debt.to)
                    } else {
                        (debt.to, debt.from)
                    };
                    settlements.push(NetDebt {
                        from,
                        to,
                        amount: net_amount.abs(),
                    });
                }
                processed.insert(forward);
                processed.insert(reverse);
            }
            None => {
                if debt.amount > SETTLED_TOLERANCE {
                    settlements.push(NetDebt {
                        from: debt.from,
                        to: debt.to,
                        amount: debt.amount,
                    });
                }
                processed.insert(forward);
            }
        }
    }

    settlements
}

/// Step 4: order by debtor name, then creditor name.
///
/// Names compare by [`CollationKey`] (case- and accent-insensitive first);
/// ties between participants sharing a name fall back to their ids so the
/// order is still total.
pub fn sort_settlements<D>(settlements: &mut [NetDebt], directory: &D)
where
    D: ParticipantDirectory + ?Sized,
{
    let key =
        |id: ParticipantId| CollationKey::new(directory.display_name(id).unwrap_or_default());
    settlements.sort_by_cached_key(|d| (key(d.from), key(d.to), d.from, d.to));
}

/// Settlement transfers for `expenses`, sorted by participant names.
///
/// Pure and idempotent; inputs are assumed to satisfy the ledger invariants.
pub fn compute_settlements<D>(expenses: &[Expense], directory: &D) -> Vec<NetDebt>
where
    D: ParticipantDirectory + ?Sized,
{
    let consolidated = consolidate(&expand(expenses));
    let mut settlements = net(&consolidated);
    sort_settlements(&mut settlements, directory);
    settlements
}
