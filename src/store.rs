//! The record store seam. Every operation takes the store as an explicit
//! argument, so the SQLite database can be swapped for an in-memory fake.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::*;

#[cfg(test)]
pub(crate) mod memory;

pub(crate) trait Store {
    // ── Users ──

    /// Fails with `DuplicateEmail` if the email is taken; no row is written.
    fn insert_user(&mut self, name: &str, email: &str) -> Result<User>;
    fn get_users(&self) -> Result<Vec<User>>;
    fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    // ── Categories ──

    /// Fails with `DuplicateCategory` if the name is taken; no row is written.
    fn insert_category(&mut self, name: &str) -> Result<Category>;
    fn get_categories(&self) -> Result<Vec<Category>>;
    fn get_category_by_id(&self, id: i64) -> Result<Option<Category>>;
    fn get_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    // ── Records ──

    fn insert_income(
        &mut self,
        user_id: i64,
        amount: Decimal,
        source: &str,
        date: NaiveDate,
    ) -> Result<IncomeRecord>;

    fn insert_expense(
        &mut self,
        user_id: i64,
        amount: Decimal,
        category_id: i64,
        date: NaiveDate,
    ) -> Result<ExpenseRecord>;

    /// Income rows for a user, optionally restricted to a period, ordered by date then id.
    fn get_income(&self, user_id: i64, period: Option<Period>) -> Result<Vec<IncomeRecord>>;

    /// Expense rows for a user, optionally restricted to a period, ordered by date then id.
    fn get_expenses(&self, user_id: i64, period: Option<Period>) -> Result<Vec<ExpenseRecord>>;

    // ── Rollups ──

    /// Sum of one record kind per calendar month, ascending by month.
    fn get_monthly_totals(&self, user_id: i64, kind: RecordKind) -> Result<Vec<(Month, Decimal)>>;

    /// Sum of expenses per category name within one month, in no particular order.
    fn get_category_totals(&self, user_id: i64, month: Month) -> Result<Vec<(String, Decimal)>>;
}
