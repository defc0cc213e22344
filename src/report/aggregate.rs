use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::Result;
use crate::models::*;
use crate::store::Store;

pub(crate) const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthlySummary {
    pub(crate) month: Month,
    pub(crate) income: Decimal,
    pub(crate) expenses: Decimal,
    pub(crate) savings: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CategoryTotal {
    pub(crate) category: String,
    pub(crate) total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FilteredRecords {
    Income(Vec<IncomeRecord>),
    Expenses(Vec<ExpenseRecord>),
}

impl FilteredRecords {
    pub(crate) fn kind(&self) -> RecordKind {
        match self {
            Self::Income(_) => RecordKind::Income,
            Self::Expenses(_) => RecordKind::Expense,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Income(rows) => rows.len(),
            Self::Expenses(rows) => rows.len(),
        }
    }
}

/// Totals for the same measure in two months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PeriodPair {
    pub(crate) a: Decimal,
    pub(crate) b: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PeriodComparison {
    pub(crate) month_a: Month,
    pub(crate) month_b: Month,
    pub(crate) income: PeriodPair,
    pub(crate) expense: PeriodPair,
}

/// Income, expenses and savings per month, oldest first. A month with only
/// one kind of record gets zero for the other.
pub(crate) fn monthly_summary(store: &impl Store, user: &User) -> Result<Vec<MonthlySummary>> {
    let mut months: BTreeMap<Month, (Decimal, Decimal)> = BTreeMap::new();
    for (month, total) in store.get_monthly_totals(user.id, RecordKind::Income)? {
        months.entry(month).or_default().0 += total;
    }
    for (month, total) in store.get_monthly_totals(user.id, RecordKind::Expense)? {
        months.entry(month).or_default().1 += total;
    }

    Ok(months
        .into_iter()
        .map(|(month, (income, expenses))| MonthlySummary {
            month,
            income,
            expenses,
            savings: income - expenses,
        })
        .collect())
}

/// Expense totals per category for one month, ordered by category name.
pub(crate) fn category_breakdown(
    store: &impl Store,
    user: &User,
    month: Month,
) -> Result<Vec<CategoryTotal>> {
    let mut totals: Vec<CategoryTotal> = store
        .get_category_totals(user.id, month)?
        .into_iter()
        .map(|(category, total)| CategoryTotal { category, total })
        .collect();
    totals.sort_by(|a, b| a.category.cmp(&b.category));
    Ok(totals)
}

/// The `n` largest categories of a month. Equal totals are ordered by name.
pub(crate) fn top_categories(
    store: &impl Store,
    user: &User,
    month: Month,
    n: usize,
) -> Result<Vec<CategoryTotal>> {
    let mut totals = category_breakdown(store, user, month)?;
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    totals.truncate(n);
    Ok(totals)
}

/// Income or expense rows whose date falls in the period described by
/// `granularity` (day, month, year) and `value`.
pub(crate) fn filter_records(
    store: &impl Store,
    user: &User,
    kind: &str,
    granularity: &str,
    value: &str,
) -> Result<FilteredRecords> {
    let kind = RecordKind::from_str(kind)?;
    let granularity = Granularity::from_str(granularity)?;
    let period = Period::parse(granularity, value)?;
    debug!("filtering {kind} records of user {} for {period}", user.id);

    Ok(match kind {
        RecordKind::Income => FilteredRecords::Income(store.get_income(user.id, Some(period))?),
        RecordKind::Expense => {
            FilteredRecords::Expenses(store.get_expenses(user.id, Some(period))?)
        }
    })
}

/// Income and expense totals for two months side by side. Months without
/// records compare as zero.
pub(crate) fn compare_periods(
    store: &impl Store,
    user: &User,
    month_a: Month,
    month_b: Month,
) -> Result<PeriodComparison> {
    let pair = |kind: RecordKind| -> Result<PeriodPair> {
        let totals: BTreeMap<Month, Decimal> =
            store.get_monthly_totals(user.id, kind)?.into_iter().collect();
        Ok(PeriodPair {
            a: totals.get(&month_a).copied().unwrap_or_default(),
            b: totals.get(&month_b).copied().unwrap_or_default(),
        })
    };

    Ok(PeriodComparison {
        month_a,
        month_b,
        income: pair(RecordKind::Income)?,
        expense: pair(RecordKind::Expense)?,
    })
}
