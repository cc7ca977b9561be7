//! Printable HTML summary (open in a browser, print to PDF).

use std::borrow::Cow;
use std::fmt::Write;

use tabshare_session::{ExpenseView, SessionSnapshot};

use crate::config::ReportConfig;
use crate::text::{ALL_SETTLED, NO_EXPENSES};
use crate::{generated_on, people};

const STYLE: &str = "\
body { font-family: -apple-system, 'Segoe UI', Arial, sans-serif; padding: 40px; color: #1f2937; }
h1 { color: #4f46e5; margin-bottom: 10px; }
h2 { margin: 30px 0 15px; border-bottom: 2px solid #4f46e5; padding-bottom: 8px; }
.date { color: #6b7280; font-size: 14px; }
.expense { margin-bottom: 20px; padding: 15px; background: #f9fafb; border-left: 4px solid #4f46e5; }
.shares { display: grid; grid-template-columns: repeat(2, 1fr); gap: 8px; }
.total { background: #eef2ff; padding: 15px; text-align: center; font-size: 18px; }
.debt { margin-bottom: 15px; padding: 15px; background: #d1fae5; border-left: 4px solid #10b981; }
.empty { text-align: center; color: #6b7280; padding: 40px 0; }
@media print { body { padding: 20px; } }
";

/// Self-contained HTML document. Every user-supplied string is escaped.
pub fn render_html(snapshot: &SessionSnapshot, config: &ReportConfig) -> String {
    let title = escape_html(&config.title);
    let mut out = String::new();

    let _ = writeln!(out, "<!DOCTYPE html>");
    let _ = writeln!(out, "<html>\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(out, "<title>{title}</title>\n<style>\n{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(out, "<header>\n<h1>{title}</h1>");
    let _ = writeln!(
        out,
        "<p class=\"date\">Generated on: {}</p>\n</header>",
        escape_html(&generated_on(snapshot, config))
    );

    let _ = writeln!(out, "<h2>Expenses ({})</h2>", snapshot.expenses.len());
    if snapshot.expenses.is_empty() {
        let _ = writeln!(out, "<p class=\"empty\">{NO_EXPENSES}</p>");
    }
    for expense in &snapshot.expenses {
        write_expense(&mut out, expense, config);
    }

    let _ = writeln!(
        out,
        "<div class=\"total\">Total expenses: <strong>{}</strong></div>",
        escape_html(&config.money(snapshot.total_amount))
    );

    let _ = writeln!(out, "<h2>Who owes whom</h2>");
    if snapshot.settlements.is_empty() {
        let _ = writeln!(out, "<p class=\"empty\">{ALL_SETTLED}</p>");
    }
    for s in &snapshot.settlements {
        let _ = writeln!(
            out,
            "<div class=\"debt\"><strong>{}</strong> &rarr; <strong>{}</strong>: {}</div>",
            escape_html(&s.from.name),
            escape_html(&s.to.name),
            escape_html(&config.money(s.amount))
        );
    }

    let _ = writeln!(out, "</body>\n</html>");
    out
}

fn write_expense(out: &mut String, expense: &ExpenseView, config: &ReportConfig) {
    let _ = writeln!(out, "<section class=\"expense\">");
    let _ = writeln!(out, "<h3>{}</h3>", escape_html(&expense.description));
    let _ = writeln!(out, "<p>Paid by: <strong>{}</strong></p>", escape_html(&expense.paid_by.name));
    let _ = writeln!(
        out,
        "<p>Total: <strong>{}</strong></p>",
        escape_html(&config.money(expense.amount))
    );
    let _ = writeln!(
        out,
        "<p>Split between {} ({} each)</p>",
        people(expense.shares.len()),
        escape_html(&config.money(expense.per_person))
    );
    let _ = writeln!(out, "<div class=\"shares\">");
    for line in &expense.shares {
        let _ = writeln!(
            out,
            "<div>{}: <strong>{}</strong></div>",
            escape_html(&line.participant.name),
            escape_html(&config.money(line.share))
        );
    }
    let _ = writeln!(out, "</div>\n</section>");
}

fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut result = String::with_capacity(s.len() + 10);
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
