//! Pure input validation. Each function either returns the parsed value or a
//! typed error; re-asking is left to the interactive prompt.

use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{FinanceError, Result};
use crate::models::{parse_date, Category, CategoryRequest, Month, User};
use crate::store::Store;

/// Largest accepted amount. Monthly and category sums of capped amounts stay
/// far inside `Decimal`'s range.
const MAX_AMOUNT: i64 = 1_000_000_000_000;

/// Parse a strictly positive decimal amount, at most `MAX_AMOUNT`. Accepts
/// plain (`12.50`) and scientific (`1.5e2`) notation; digit separators are
/// rejected.
pub(crate) fn validate_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let invalid = || FinanceError::InvalidAmount(trimmed.to_string());
    if trimmed.contains('_') {
        return Err(invalid());
    }
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid())?;
    if amount <= Decimal::ZERO || amount > Decimal::from(MAX_AMOUNT) {
        return Err(invalid());
    }
    Ok(amount.normalize())
}

pub(crate) fn validate_date(raw: &str) -> Result<NaiveDate> {
    parse_date(raw)
}

pub(crate) fn validate_month(raw: &str) -> Result<Month> {
    Month::from_str(raw)
}

/// Trim a required text field; blank input fails with `EmptyName`.
pub(crate) fn validate_name(field: &'static str, raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::EmptyName(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn parse_id(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse()
        .map_err(|_| FinanceError::InvalidId(trimmed.to_string()))
}

pub(crate) fn resolve_user(store: &impl Store, id: i64) -> Result<User> {
    store
        .get_user_by_id(id)?
        .ok_or(FinanceError::UnknownUser(id))
}

/// Resolve an existing category, or create one by name. Creating a name that
/// already exists returns the existing row.
pub(crate) fn resolve_category(
    store: &mut impl Store,
    request: &CategoryRequest,
) -> Result<Category> {
    match request {
        CategoryRequest::UseExisting(id) => store
            .get_category_by_id(*id)?
            .ok_or(FinanceError::UnknownCategory(*id)),
        CategoryRequest::CreateNew(raw) => {
            let name = validate_name("Category name", raw)?;
            if let Some(existing) = store.get_category_by_name(&name)? {
                info!("category '{}' already exists, reusing id {}", existing.name, existing.id);
                return Ok(existing);
            }
            store.insert_category(&name)
        }
    }
}
