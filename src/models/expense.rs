use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub category_id: i64,
    /// Joined from `categories` for display; not stored on the row.
    pub category: String,
    pub date: NaiveDate,
}
