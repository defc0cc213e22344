//! Creation and listing of users, categories and records. Every write goes
//! through the validators first; nothing is written on a validation error.

use crate::error::Result;
use crate::models::*;
use crate::store::Store;
use crate::validate::{
    resolve_category, resolve_user, validate_amount, validate_date, validate_name,
};

pub(crate) fn add_user(store: &mut impl Store, name: &str, email: &str) -> Result<User> {
    let name = validate_name("User name", name)?;
    let email = validate_name("Email", email)?;
    store.insert_user(&name, &email)
}

pub(crate) fn list_users(store: &impl Store) -> Result<Vec<User>> {
    store.get_users()
}

pub(crate) fn add_category(store: &mut impl Store, name: &str) -> Result<Category> {
    let name = validate_name("Category name", name)?;
    store.insert_category(&name)
}

pub(crate) fn list_categories(store: &impl Store) -> Result<Vec<Category>> {
    store.get_categories()
}

pub(crate) fn record_income(
    store: &mut impl Store,
    user_id: i64,
    amount: &str,
    source: &str,
    date: &str,
) -> Result<IncomeRecord> {
    let user = resolve_user(store, user_id)?;
    let amount = validate_amount(amount)?;
    let date = validate_date(date)?;
    store.insert_income(user.id, amount, source.trim(), date)
}

/// The category is resolved (or created) only after every other field has
/// validated, so a bad amount never leaves a stray category behind.
pub(crate) fn record_expense(
    store: &mut impl Store,
    user_id: i64,
    amount: &str,
    category: &CategoryRequest,
    date: &str,
) -> Result<ExpenseRecord> {
    let user = resolve_user(store, user_id)?;
    let amount = validate_amount(amount)?;
    let date = validate_date(date)?;
    let category = resolve_category(store, category)?;
    store.insert_expense(user.id, amount, category.id, date)
}
