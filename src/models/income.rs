use chrono::NaiveDate;
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeRecord {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub source: String,
    pub date: NaiveDate,
}
