//! Per-expense share breakdown and session total.

use serde::{Deserialize, Serialize};

use tabshare_core::{Entity, ExpenseId, Money, ParticipantId};
use tabshare_ledger::Expense;

/// One participant's share of an expense.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLine {
    pub participant: ParticipantId,
    pub share: Money,
}

/// How one expense divides among its split members.
///
/// Every line shows the same rounded share; the lines are not reconciled to
/// the amount (10.00 split three ways lists 3.33 three times, totalling 9.99).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub expense_id: ExpenseId,
    pub amount: Money,
    pub per_person: Money,
    pub lines: Vec<ShareLine>,
}

impl ExpenseBreakdown {
    pub fn share_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of the displayed (rounded) shares.
    pub fn displayed_total(&self) -> Money {
        self.lines.iter().map(|l| l.share).sum()
    }

    /// `amount - displayed_total()`; left unassigned.
    pub fn rounding_drift(&self) -> Money {
        self.amount - self.displayed_total()
    }
}

pub fn breakdown(expense: &Expense) -> ExpenseBreakdown {
    let per_person = expense.per_person();
    ExpenseBreakdown {
        expense_id: *expense.id(),
        amount: expense.amount(),
        per_person,
        lines: expense
            .split_between()
            .iter()
            .map(|&participant| ShareLine {
                participant,
                share: per_person,
            })
            .collect(),
    }
}

/// Unrounded sum of every expense amount; round only for display.
pub fn total_amount(expenses: &[Expense]) -> Money {
    expenses.iter().map(Expense::amount).sum()
}
