mod category;
mod expense;
mod income;
mod period;
mod user;

pub use category::{Category, CategoryRequest};
pub use expense::ExpenseRecord;
pub use income::IncomeRecord;
pub use period::{parse_date, Granularity, Month, Period, RecordKind};
pub use user::User;
