use core::fmt::Write;

use tabshare_session::SessionSnapshot;

use crate::config::ReportConfig;
use crate::{generated_on, people};

pub const NO_EXPENSES: &str = "No expenses recorded.";
pub const ALL_SETTLED: &str = "All settled up!";

/// Plain-text summary: expenses with their breakdown, the total, then who
/// owes whom.
pub fn render_text(snapshot: &SessionSnapshot, config: &ReportConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", config.title);
    let _ = writeln!(out, "Generated on: {}", generated_on(snapshot, config));
    let _ = writeln!(out);

    heading(&mut out, &format!("Expenses ({})", snapshot.expenses.len()));
    if snapshot.expenses.is_empty() {
        let _ = writeln!(out, "{NO_EXPENSES}");
    }
    for expense in &snapshot.expenses {
        let _ = writeln!(out, "{}", expense.description);
        let _ = writeln!(out, "  Paid by: {}", expense.paid_by.name);
        let _ = writeln!(out, "  Total: {}", config.money(expense.amount));
        let _ = writeln!(
            out,
            "  Split between {} ({} each)",
            people(expense.shares.len()),
            config.money(expense.per_person)
        );
        for line in &expense.shares {
            let _ = writeln!(out, "    {}: {}", line.participant.name, config.money(line.share));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Total expenses: {}", config.money(snapshot.total_amount));
    let _ = writeln!(out);

    heading(&mut out, "Who owes whom");
    if snapshot.settlements.is_empty() {
        let _ = writeln!(out, "{ALL_SETTLED}");
    }
    for s in &snapshot.settlements {
        let _ = writeln!(out, "{} -> {}: {}", s.from.name, s.to.name, config.money(s.amount));
    }

    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
}
