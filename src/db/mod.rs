mod schema;

use anyhow::Context;
use chrono::NaiveDate;
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FinanceError, Result};
use crate::models::*;
use crate::store::Store;

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        debug!("opening database at {}", path.display());
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> anyhow::Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            info!("created schema version {}", schema::CURRENT_VERSION);
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            info!(
                "migrated schema from version {current} to {}",
                schema::CURRENT_VERSION
            );
        }

        Ok(())
    }

    fn exists(&self, sql: &str, params: &[&dyn ToSql]) -> Result<bool> {
        Ok(self.conn.query_row(sql, params, |row| row.get(0))?)
    }
}

/// Amounts are stored as TEXT so cents survive the round trip exactly.
fn amount_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    Decimal::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

fn category_from_row(row: &Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn income_from_row(row: &Row<'_>) -> rusqlite::Result<IncomeRecord> {
    Ok(IncomeRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: amount_at(row, 2)?,
        source: row.get(3)?,
        date: row.get(4)?,
    })
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<ExpenseRecord> {
    Ok(ExpenseRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: amount_at(row, 2)?,
        category_id: row.get(3)?,
        category: row.get(4)?,
        date: row.get(5)?,
    })
}

const INCOME_COLUMNS: &str = "SELECT id, user_id, amount, source, date FROM income";
const EXPENSE_COLUMNS: &str = "SELECT e.id, e.user_id, e.amount, e.category_id, c.name, e.date
     FROM expenses e JOIN categories c ON e.category_id = c.id";

impl Store for Database {
    // ── Users ─────────────────────────────────────────────────

    fn insert_user(&mut self, name: &str, email: &str) -> Result<User> {
        if self.exists(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
            params![email],
        )? {
            return Err(FinanceError::DuplicateEmail(email.to_string()));
        }
        self.conn.execute(
            "INSERT INTO users (name, email, created_at) VALUES (?1, ?2, ?3)",
            params![name, email, chrono::Utc::now().to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("added user {id} <{email}>");
        Ok(User {
            id,
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    fn get_users(&self) -> Result<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM users ORDER BY id")?;
        let rows = stmt.query_map([], user_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1",
                params![id],
                user_from_row,
            )
            .optional()?)
    }

    // ── Categories ────────────────────────────────────────────

    fn insert_category(&mut self, name: &str) -> Result<Category> {
        if self.exists(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE name = ?1)",
            params![name],
        )? {
            return Err(FinanceError::DuplicateCategory(name.to_string()));
        }
        self.conn
            .execute("INSERT INTO categories (name) VALUES (?1)", params![name])?;
        let id = self.conn.last_insert_rowid();
        info!("added category {id} '{name}'");
        Ok(Category {
            id,
            name: name.to_string(),
        })
    }

    fn get_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM categories ORDER BY name")?;
        let rows = stmt.query_map([], category_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?1",
                params![id],
                category_from_row,
            )
            .optional()?)
    }

    fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE name = ?1",
                params![name],
                category_from_row,
            )
            .optional()?)
    }

    // ── Records ───────────────────────────────────────────────

    fn insert_income(
        &mut self,
        user_id: i64,
        amount: Decimal,
        source: &str,
        date: NaiveDate,
    ) -> Result<IncomeRecord> {
        if self.get_user_by_id(user_id)?.is_none() {
            return Err(FinanceError::UnknownUser(user_id));
        }
        self.conn.execute(
            "INSERT INTO income (user_id, amount, source, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                amount.to_string(),
                source,
                date,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("added income {id}: user {user_id}, {amount} on {date}");
        Ok(IncomeRecord {
            id,
            user_id,
            amount,
            source: source.to_string(),
            date,
        })
    }

    fn insert_expense(
        &mut self,
        user_id: i64,
        amount: Decimal,
        category_id: i64,
        date: NaiveDate,
    ) -> Result<ExpenseRecord> {
        if self.get_user_by_id(user_id)?.is_none() {
            return Err(FinanceError::UnknownUser(user_id));
        }
        let category = self
            .get_category_by_id(category_id)?
            .ok_or(FinanceError::UnknownCategory(category_id))?;
        self.conn.execute(
            "INSERT INTO expenses (user_id, amount, category_id, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                amount.to_string(),
                category_id,
                date,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(
            "added expense {id}: user {user_id}, {amount} in '{}' on {date}",
            category.name
        );
        Ok(ExpenseRecord {
            id,
            user_id,
            amount,
            category_id,
            category: category.name,
            date,
        })
    }

    fn get_income(&self, user_id: i64, period: Option<Period>) -> Result<Vec<IncomeRecord>> {
        let mut sql = format!("{INCOME_COLUMNS} WHERE user_id = ?1");
        let mut param_values: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];
        if let Some(p) = period {
            sql.push_str(" AND date LIKE ?2");
            param_values.push(Box::new(p.like_pattern()));
        }
        sql.push_str(" ORDER BY date, id");
        debug!("income query for user {user_id}, period {period:?}");

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), income_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn get_expenses(&self, user_id: i64, period: Option<Period>) -> Result<Vec<ExpenseRecord>> {
        let mut sql = format!("{EXPENSE_COLUMNS} WHERE e.user_id = ?1");
        let mut param_values: Vec<Box<dyn ToSql>> = vec![Box::new(user_id)];
        if let Some(p) = period {
            sql.push_str(" AND e.date LIKE ?2");
            param_values.push(Box::new(p.like_pattern()));
        }
        sql.push_str(" ORDER BY e.date, e.id");
        debug!("expense query for user {user_id}, period {period:?}");

        let params_ref: Vec<&dyn ToSql> = param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Rollups ───────────────────────────────────────────────

    fn get_monthly_totals(&self, user_id: i64, kind: RecordKind) -> Result<Vec<(Month, Decimal)>> {
        let table = match kind {
            RecordKind::Income => "income",
            RecordKind::Expense => "expenses",
        };
        let mut stmt = self.conn.prepare(&format!(
            "SELECT date, amount FROM {table} WHERE user_id = ?1"
        ))?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok((Month::of(row.get::<_, NaiveDate>(0)?), amount_at(row, 1)?))
        })?;

        // SQL SUM over TEXT goes through REAL; fold in Decimal instead.
        let mut totals: BTreeMap<Month, Decimal> = BTreeMap::new();
        for row in rows {
            let (month, amount) = row?;
            *totals.entry(month).or_default() += amount;
        }
        Ok(totals.into_iter().collect())
    }

    fn get_category_totals(&self, user_id: i64, month: Month) -> Result<Vec<(String, Decimal)>> {
        let mut stmt = self.conn.prepare(
            "SELECT c.name, e.amount
             FROM expenses e
             JOIN categories c ON e.category_id = c.id
             WHERE e.user_id = ?1 AND e.date LIKE ?2",
        )?;
        let rows = stmt.query_map(
            params![user_id, Period::Month(month).like_pattern()],
            |row| Ok((row.get::<_, String>(0)?, amount_at(row, 1)?)),
        )?;

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in rows {
            let (name, amount) = row?;
            *totals.entry(name).or_default() += amount;
        }
        Ok(totals.into_iter().collect())
    }
}

#[cfg(test)]
mod tests;
