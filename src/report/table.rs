//! Renderer-agnostic report tables. The same table prints as aligned text
//! or exports as CSV for charting elsewhere.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::io::Write;

use super::aggregate::{CategoryTotal, FilteredRecords, MonthlySummary, PeriodComparison};
use crate::models::{Category, Month, User};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Amount(Decimal),
    /// Share of a whole, 0-100.
    Percent(Decimal),
}

impl Cell {
    fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Amount(a) => format_amount(*a),
            Self::Percent(p) => format!("{:.1}%", p),
        }
    }

    fn raw(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Amount(a) => a.normalize().to_string(),
            Self::Percent(p) => format!("{:.1}", p),
        }
    }

    fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReportTable {
    pub(crate) title: String,
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<Cell>>,
}

impl ReportTable {
    fn new(title: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let abs = val.abs();
    let formatted = format!("{abs:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{with_commas}.{dec_part}")
    } else {
        format!("{with_commas}.{dec_part}")
    }
}

// ── Builders ──────────────────────────────────────────────────

pub(crate) fn summary_table(rows: &[MonthlySummary]) -> ReportTable {
    let mut table = ReportTable::new("Monthly Summary", &["Month", "Income", "Expenses", "Savings"]);
    for r in rows {
        table.rows.push(vec![
            Cell::Text(r.month.to_string()),
            Cell::Amount(r.income),
            Cell::Amount(r.expenses),
            Cell::Amount(r.savings),
        ]);
    }
    table
}

/// Breakdown with each category's share of the month, the data behind a pie chart.
pub(crate) fn breakdown_table(month: Month, rows: &[CategoryTotal]) -> ReportTable {
    let mut table = ReportTable::new(
        format!("Expenses by Category ({month})"),
        &["Category", "Total", "Share"],
    );
    let sum: Decimal = rows.iter().map(|r| r.total).sum();
    for r in rows {
        let share = if sum.is_zero() {
            Decimal::ZERO
        } else {
            r.total * Decimal::ONE_HUNDRED / sum
        };
        table.rows.push(vec![
            Cell::Text(r.category.clone()),
            Cell::Amount(r.total),
            Cell::Percent(share),
        ]);
    }
    table
}

pub(crate) fn top_table(month: Month, rows: &[CategoryTotal]) -> ReportTable {
    let mut table = ReportTable::new(
        format!("Top {} Expense Categories ({month})", rows.len()),
        &["Rank", "Category", "Total"],
    );
    for (i, r) in rows.iter().enumerate() {
        table.rows.push(vec![
            Cell::Text((i + 1).to_string()),
            Cell::Text(r.category.clone()),
            Cell::Amount(r.total),
        ]);
    }
    table
}

pub(crate) fn records_table(title: impl Into<String>, records: &FilteredRecords) -> ReportTable {
    match records {
        FilteredRecords::Income(rows) => {
            let mut table = ReportTable::new(title, &["ID", "Date", "Source", "Amount"]);
            for r in rows {
                table.rows.push(vec![
                    Cell::Text(r.id.to_string()),
                    Cell::Text(r.date.to_string()),
                    Cell::Text(r.source.clone()),
                    Cell::Amount(r.amount),
                ]);
            }
            table
        }
        FilteredRecords::Expenses(rows) => {
            let mut table = ReportTable::new(title, &["ID", "Date", "Category", "Amount"]);
            for r in rows {
                table.rows.push(vec![
                    Cell::Text(r.id.to_string()),
                    Cell::Text(r.date.to_string()),
                    Cell::Text(r.category.clone()),
                    Cell::Amount(r.amount),
                ]);
            }
            table
        }
    }
}

pub(crate) fn comparison_table(cmp: &PeriodComparison) -> ReportTable {
    let a = cmp.month_a.to_string();
    let b = cmp.month_b.to_string();
    let mut table = ReportTable::new(
        format!("Income vs Expenses: {a} vs {b}"),
        &["Type", a.as_str(), b.as_str()],
    );
    table.rows.push(vec![
        Cell::Text("Income".into()),
        Cell::Amount(cmp.income.a),
        Cell::Amount(cmp.income.b),
    ]);
    table.rows.push(vec![
        Cell::Text("Expenses".into()),
        Cell::Amount(cmp.expense.a),
        Cell::Amount(cmp.expense.b),
    ]);
    table
}

pub(crate) fn users_table(users: &[User]) -> ReportTable {
    let mut table = ReportTable::new("Users", &["ID", "Name", "Email"]);
    for u in users {
        table.rows.push(vec![
            Cell::Text(u.id.to_string()),
            Cell::Text(u.name.clone()),
            Cell::Text(u.email.clone()),
        ]);
    }
    table
}

pub(crate) fn categories_table(categories: &[Category]) -> ReportTable {
    let mut table = ReportTable::new("Categories", &["ID", "Name"]);
    for c in categories {
        table
            .rows
            .push(vec![Cell::Text(c.id.to_string()), Cell::Text(c.name.clone())]);
    }
    table
}

// ── Output ────────────────────────────────────────────────────

/// Print a table with padded columns; numbers are right-aligned.
pub(crate) fn render_text(table: &ReportTable, out: &mut impl Write) -> Result<()> {
    let rendered: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(Cell::display).collect())
        .collect();

    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    writeln!(out, "{}", table.title)?;
    let header: Vec<String> = table
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{h:<w$}"))
        .collect();
    writeln!(out, "{}", header.join("  ").trim_end())?;
    let total_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    writeln!(out, "{}", "─".repeat(total_width))?;

    for (cells, row) in rendered.iter().zip(&table.rows) {
        let line: Vec<String> = cells
            .iter()
            .zip(row)
            .zip(&widths)
            .map(|((text, cell), &w)| {
                if cell.is_numeric() {
                    format!("{text:>w$}")
                } else {
                    format!("{text:<w$}")
                }
            })
            .collect();
        writeln!(out, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}

/// Write the header row and every data row as CSV. Amounts keep their full
/// precision, without separators or padding.
pub(crate) fn write_csv(table: &ReportTable, out: impl Write) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(&table.headers)
        .context("Failed to write CSV header")?;
    for row in &table.rows {
        wtr.write_record(row.iter().map(Cell::raw))
            .context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
