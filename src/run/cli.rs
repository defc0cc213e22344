use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use super::prompt::Prompter;
use crate::config::Config;
use crate::ledger;
use crate::models::CategoryRequest;
use crate::report::{self, ReportTable};
use crate::store::Store;
use crate::validate::{resolve_user, validate_month};

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Add or list users
    #[command(subcommand)]
    User(UserCommand),

    /// Add or list expense categories
    #[command(subcommand)]
    Category(CategoryCommand),

    /// Record income
    #[command(subcommand)]
    Income(IncomeCommand),

    /// Record expenses
    #[command(subcommand)]
    Expense(ExpenseCommand),

    /// Summaries, breakdowns and comparisons
    #[command(subcommand)]
    Report(ReportCommand),

    /// Show the config file and database in use
    Config,
}

#[derive(Subcommand)]
pub(crate) enum UserCommand {
    /// Add a user
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// List all users
    List,
}

#[derive(Subcommand)]
pub(crate) enum CategoryCommand {
    /// Add a category
    Add { name: String },
    /// List all categories
    List,
}

#[derive(Subcommand)]
pub(crate) enum IncomeCommand {
    /// Add an income record; missing fields are asked for
    Add {
        #[arg(long, short)]
        user: Option<i64>,
        #[arg(long, short, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long, short)]
        source: Option<String>,
        /// YYYY-MM-DD
        #[arg(long, short)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub(crate) enum ExpenseCommand {
    /// Add an expense record; missing fields are asked for
    Add {
        #[arg(long, short)]
        user: Option<i64>,
        #[arg(long, short, allow_hyphen_values = true)]
        amount: Option<String>,
        /// Existing category ID
        #[arg(long, short, conflicts_with = "new_category")]
        category: Option<i64>,
        /// Create (or reuse) a category by name
        #[arg(long)]
        new_category: Option<String>,
        /// YYYY-MM-DD
        #[arg(long, short)]
        date: Option<String>,
    },
}

#[derive(Args)]
pub(crate) struct OutputArgs {
    /// Write the report as CSV to this file ("-" for stdout)
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum ReportCommand {
    /// Income, expenses and savings for every month
    #[command(alias = "trend")]
    Summary {
        #[arg(long, short)]
        user: i64,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Expense totals per category for one month
    Breakdown {
        #[arg(long, short)]
        user: i64,
        /// YYYY-MM
        #[arg(long, short)]
        month: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Largest expense categories for one month
    Top {
        #[arg(long, short)]
        user: i64,
        /// YYYY-MM
        #[arg(long, short)]
        month: String,
        /// Number of categories (default from config, 3)
        #[arg(short)]
        n: Option<usize>,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Income or expense records for a day, month or year
    Filter {
        #[arg(long, short)]
        user: i64,
        /// income or expense
        #[arg(long, short)]
        kind: String,
        /// day, month or year
        #[arg(long = "by", short = 'b')]
        granularity: String,
        /// YYYY-MM-DD, YYYY-MM or YYYY
        #[arg(long, short)]
        value: String,
        #[command(flatten)]
        out: OutputArgs,
    },
    /// Income and expenses of two months side by side
    Compare {
        #[arg(long, short)]
        user: i64,
        /// YYYY-MM
        month_a: String,
        /// YYYY-MM
        month_b: String,
        #[command(flatten)]
        out: OutputArgs,
    },
}

pub(crate) fn as_cli(
    command: Command,
    store: &mut impl Store,
    config: &Config,
    db_path: &Path,
) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    execute(command, store, config, db_path, &mut prompter, &mut io::stdout())
}

pub(crate) fn execute<R: BufRead, W: Write>(
    command: Command,
    store: &mut impl Store,
    config: &Config,
    db_path: &Path,
    prompter: &mut Prompter<R, W>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::User(cmd) => cli_user(cmd, store, out),
        Command::Category(cmd) => cli_category(cmd, store, out),
        Command::Income(IncomeCommand::Add {
            user,
            amount,
            source,
            date,
        }) => {
            let user_id = match user {
                Some(id) => id,
                None => prompter.ask_user(store)?.id,
            };
            let amount = match amount {
                Some(a) => a,
                None => prompter.ask_amount()?,
            };
            let source = match source {
                Some(s) => s,
                None => prompter.ask_text("Source")?,
            };
            let date = match date {
                Some(d) => d,
                None => prompter.ask_date()?,
            };
            let rec = ledger::record_income(store, user_id, &amount, &source, &date)?;
            writeln!(
                out,
                "Added income {}: {} from '{}' on {}",
                rec.id,
                report::format_amount(rec.amount),
                rec.source,
                rec.date
            )?;
            Ok(())
        }
        Command::Expense(ExpenseCommand::Add {
            user,
            amount,
            category,
            new_category,
            date,
        }) => {
            let user_id = match user {
                Some(id) => id,
                None => prompter.ask_user(store)?.id,
            };
            let amount = match amount {
                Some(a) => a,
                None => prompter.ask_amount()?,
            };
            let request = match (category, new_category) {
                (Some(id), _) => CategoryRequest::UseExisting(id),
                (None, Some(name)) => CategoryRequest::CreateNew(name),
                (None, None) => prompter.ask_category(store)?,
            };
            let date = match date {
                Some(d) => d,
                None => prompter.ask_date()?,
            };
            let rec = ledger::record_expense(store, user_id, &amount, &request, &date)?;
            writeln!(
                out,
                "Added expense {}: {} in '{}' on {}",
                rec.id,
                report::format_amount(rec.amount),
                rec.category,
                rec.date
            )?;
            Ok(())
        }
        Command::Report(cmd) => cli_report(cmd, store, config, out),
        Command::Config => {
            match &config.source {
                Some(path) => writeln!(out, "Config file: {}", path.display())?,
                None => writeln!(out, "Config file: (none, using defaults)")?,
            }
            writeln!(out, "Database:    {}", db_path.display())?;
            writeln!(out, "Top categories shown: {}", config.top_categories)?;
            Ok(())
        }
    }
}

fn cli_user(cmd: UserCommand, store: &mut impl Store, out: &mut impl Write) -> Result<()> {
    match cmd {
        UserCommand::Add { name, email } => {
            let user = ledger::add_user(store, &name, &email)?;
            writeln!(out, "Added user {}: {user}", user.id)?;
        }
        UserCommand::List => {
            let users = ledger::list_users(store)?;
            if users.is_empty() {
                writeln!(out, "No users found. Add one with `fintrack user add`.")?;
            } else {
                report::render_text(&report::users_table(&users), out)?;
            }
        }
    }
    Ok(())
}

fn cli_category(cmd: CategoryCommand, store: &mut impl Store, out: &mut impl Write) -> Result<()> {
    match cmd {
        CategoryCommand::Add { name } => {
            let category = ledger::add_category(store, &name)?;
            writeln!(out, "Added category {}: {category}", category.id)?;
        }
        CategoryCommand::List => {
            let categories = ledger::list_categories(store)?;
            if categories.is_empty() {
                writeln!(out, "No categories found.")?;
            } else {
                report::render_text(&report::categories_table(&categories), out)?;
            }
        }
    }
    Ok(())
}

fn cli_report(
    cmd: ReportCommand,
    store: &mut impl Store,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        ReportCommand::Summary { user, out: dest } => {
            let user = resolve_user(store, user)?;
            let rows = report::monthly_summary(store, &user)?;
            emit(&report::summary_table(&rows), &dest, out)
        }
        ReportCommand::Breakdown {
            user,
            month,
            out: dest,
        } => {
            let user = resolve_user(store, user)?;
            let month = validate_month(&month)?;
            let rows = report::category_breakdown(store, &user, month)?;
            emit(&report::breakdown_table(month, &rows), &dest, out)
        }
        ReportCommand::Top {
            user,
            month,
            n,
            out: dest,
        } => {
            let user = resolve_user(store, user)?;
            let month = validate_month(&month)?;
            let n = n.unwrap_or(config.top_categories);
            let rows = report::top_categories(store, &user, month, n)?;
            emit(&report::top_table(month, &rows), &dest, out)
        }
        ReportCommand::Filter {
            user,
            kind,
            granularity,
            value,
            out: dest,
        } => {
            let user = resolve_user(store, user)?;
            let records = report::filter_records(store, &user, &kind, &granularity, &value)?;
            let title = format!(
                "{} records for {} {} ({})",
                records.kind(),
                granularity.trim().to_lowercase(),
                value.trim(),
                records.len()
            );
            emit(&report::records_table(title, &records), &dest, out)
        }
        ReportCommand::Compare {
            user,
            month_a,
            month_b,
            out: dest,
        } => {
            let user = resolve_user(store, user)?;
            let cmp = report::compare_periods(
                store,
                &user,
                validate_month(&month_a)?,
                validate_month(&month_b)?,
            )?;
            emit(&report::comparison_table(&cmp), &dest, out)
        }
    }
}

/// Print the table, or write it as CSV when an output path was given.
fn emit(table: &ReportTable, dest: &OutputArgs, out: &mut impl Write) -> Result<()> {
    match dest.output.as_deref() {
        Some(path) if path == Path::new("-") => report::write_csv(table, out),
        Some(path) => {
            let path = super::shellexpand(path);
            let file = std::fs::File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            report::write_csv(table, file)?;
            writeln!(
                out,
                "Wrote {} rows to {}",
                table.rows.len(),
                path.display()
            )?;
            Ok(())
        }
        None if table.is_empty() => {
            writeln!(out, "{}", table.title)?;
            writeln!(out, "No records found.")?;
            Ok(())
        }
        None => report::render_text(table, out),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
