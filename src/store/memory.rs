use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::Store;
use crate::error::{FinanceError, Result};
use crate::models::*;

/// In-memory store for tests. Mirrors the SQLite store's constraints.
#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    users: Vec<User>,
    categories: Vec<Category>,
    income: Vec<IncomeRecord>,
    expenses: Vec<ExpenseRecord>,
    next_id: i64,
}

fn in_period(period: Option<Period>, date: NaiveDate) -> bool {
    match period {
        None => true,
        Some(Period::Day(d)) => d == date,
        Some(Period::Month(m)) => Month::of(date) == m,
        Some(Period::Year(y)) => date.year() == y,
    }
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_user(&self, user_id: i64) -> Result<()> {
        if self.users.iter().any(|u| u.id == user_id) {
            Ok(())
        } else {
            Err(FinanceError::UnknownUser(user_id))
        }
    }
}

impl Store for MemoryStore {
    fn insert_user(&mut self, name: &str, email: &str) -> Result<User> {
        if self
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(FinanceError::DuplicateEmail(email.to_string()));
        }
        let user = User {
            id: self.next_id(),
            name: name.to_string(),
            email: email.to_string(),
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn get_users(&self) -> Result<Vec<User>> {
        Ok(self.users.clone())
    }

    fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    fn insert_category(&mut self, name: &str) -> Result<Category> {
        if Category::find_by_name(&self.categories, name).is_some() {
            return Err(FinanceError::DuplicateCategory(name.to_string()));
        }
        let category = Category {
            id: self.next_id(),
            name: name.to_string(),
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    fn get_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.categories.clone();
        categories.sort_by_key(|c| c.name.to_ascii_lowercase());
        Ok(categories)
    }

    fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        Ok(Category::find_by_id(&self.categories, id).cloned())
    }

    fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        Ok(Category::find_by_name(&self.categories, name).cloned())
    }

    fn insert_income(
        &mut self,
        user_id: i64,
        amount: Decimal,
        source: &str,
        date: NaiveDate,
    ) -> Result<IncomeRecord> {
        self.require_user(user_id)?;
        let record = IncomeRecord {
            id: self.next_id(),
            user_id,
            amount,
            source: source.to_string(),
            date,
        };
        self.income.push(record.clone());
        Ok(record)
    }

    fn insert_expense(
        &mut self,
        user_id: i64,
        amount: Decimal,
        category_id: i64,
        date: NaiveDate,
    ) -> Result<ExpenseRecord> {
        self.require_user(user_id)?;
        let category = Category::find_by_id(&self.categories, category_id)
            .ok_or(FinanceError::UnknownCategory(category_id))?
            .name
            .clone();
        let record = ExpenseRecord {
            id: self.next_id(),
            user_id,
            amount,
            category_id,
            category,
            date,
        };
        self.expenses.push(record.clone());
        Ok(record)
    }

    fn get_income(&self, user_id: i64, period: Option<Period>) -> Result<Vec<IncomeRecord>> {
        let mut rows: Vec<IncomeRecord> = self
            .income
            .iter()
            .filter(|r| r.user_id == user_id && in_period(period, r.date))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.date, r.id));
        Ok(rows)
    }

    fn get_expenses(&self, user_id: i64, period: Option<Period>) -> Result<Vec<ExpenseRecord>> {
        let mut rows: Vec<ExpenseRecord> = self
            .expenses
            .iter()
            .filter(|r| r.user_id == user_id && in_period(period, r.date))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.date, r.id));
        Ok(rows)
    }

    fn get_monthly_totals(&self, user_id: i64, kind: RecordKind) -> Result<Vec<(Month, Decimal)>> {
        let dated: Vec<(NaiveDate, Decimal)> = match kind {
            RecordKind::Income => self
                .get_income(user_id, None)?
                .into_iter()
                .map(|r| (r.date, r.amount))
                .collect(),
            RecordKind::Expense => self
                .get_expenses(user_id, None)?
                .into_iter()
                .map(|r| (r.date, r.amount))
                .collect(),
        };
        let mut totals: BTreeMap<Month, Decimal> = BTreeMap::new();
        for (date, amount) in dated {
            *totals.entry(Month::of(date)).or_default() += amount;
        }
        Ok(totals.into_iter().collect())
    }

    fn get_category_totals(&self, user_id: i64, month: Month) -> Result<Vec<(String, Decimal)>> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for r in self.get_expenses(user_id, Some(Period::Month(month)))? {
            *totals.entry(r.category).or_default() += r.amount;
        }
        Ok(totals.into_iter().collect())
    }
}
