#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal_macros::dec;

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

fn db_with_user() -> (Database, i64) {
    let mut db = Database::open_in_memory().unwrap();
    let user = db.insert_user("Ada", "ada@example.com").unwrap();
    (db, user.id)
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_users().unwrap().is_empty());
    assert!(db.get_categories().unwrap().is_empty());
}

#[test]
fn test_reopen_file_database_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fintrack.db");
    {
        let mut db = Database::open(&path).unwrap();
        db.insert_user("Ada", "ada@example.com").unwrap();
    }
    let db = Database::open(&path).unwrap();
    assert_eq!(db.get_users().unwrap().len(), 1);
}

// ── Users ─────────────────────────────────────────────────────

#[test]
fn test_user_insert_and_lookup() {
    let (db, id) = db_with_user();
    let user = db.get_user_by_id(id).unwrap().unwrap();
    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");
    assert!(db.get_user_by_id(99999).unwrap().is_none());
}

#[test]
fn test_duplicate_email_rejected_without_row() {
    let (mut db, _) = db_with_user();
    let err = db.insert_user("Other Ada", "ADA@example.com").unwrap_err();
    assert!(matches!(err, FinanceError::DuplicateEmail(_)));
    assert_eq!(db.get_users().unwrap().len(), 1);
}

#[test]
fn test_users_ordered_by_id() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_user("Zed", "zed@example.com").unwrap();
    db.insert_user("Amy", "amy@example.com").unwrap();
    let names: Vec<String> = db.get_users().unwrap().into_iter().map(|u| u.name).collect();
    assert_eq!(names, ["Zed", "Amy"]);
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_categories_sorted_by_name() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_category("Rent").unwrap();
    db.insert_category("Food").unwrap();
    db.insert_category("Travel").unwrap();
    let names: Vec<String> = db
        .get_categories()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Food", "Rent", "Travel"]);
}

#[test]
fn test_duplicate_category_rejected() {
    let mut db = Database::open_in_memory().unwrap();
    db.insert_category("Food").unwrap();
    let err = db.insert_category("food").unwrap_err();
    assert!(matches!(err, FinanceError::DuplicateCategory(_)));
    assert_eq!(db.get_categories().unwrap().len(), 1);
}

#[test]
fn test_category_lookup_by_name_ignores_case() {
    let mut db = Database::open_in_memory().unwrap();
    let food = db.insert_category("Food").unwrap();
    assert_eq!(db.get_category_by_name("FOOD").unwrap(), Some(food.clone()));
    assert_eq!(db.get_category_by_id(food.id).unwrap(), Some(food));
    assert!(db.get_category_by_name("Fuel").unwrap().is_none());
}

// ── Records ───────────────────────────────────────────────────

#[test]
fn test_income_round_trip_keeps_exact_amount() {
    let (mut db, user) = db_with_user();
    db.insert_income(user, dec!(1234.56), "Salary", date("2024-01-31"))
        .unwrap();
    let rows = db.get_income(user, None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, dec!(1234.56));
    assert_eq!(rows[0].source, "Salary");
    assert_eq!(rows[0].date, date("2024-01-31"));
}

#[test]
fn test_insert_income_unknown_user() {
    let mut db = Database::open_in_memory().unwrap();
    let err = db
        .insert_income(42, dec!(10), "Gift", date("2024-01-01"))
        .unwrap_err();
    assert_eq!(err, FinanceError::UnknownUser(42));
}

#[test]
fn test_insert_expense_unknown_category() {
    let (mut db, user) = db_with_user();
    let err = db
        .insert_expense(user, dec!(10), 7, date("2024-01-01"))
        .unwrap_err();
    assert_eq!(err, FinanceError::UnknownCategory(7));
    assert!(db.get_expenses(user, None).unwrap().is_empty());
}

#[test]
fn test_expense_rows_carry_category_name() {
    let (mut db, user) = db_with_user();
    let food = db.insert_category("Food").unwrap();
    db.insert_expense(user, dec!(12.50), food.id, date("2024-02-03"))
        .unwrap();
    let rows = db.get_expenses(user, None).unwrap();
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].category_id, food.id);
}

#[test]
fn test_records_filtered_by_period() {
    let (mut db, user) = db_with_user();
    for d in ["2024-01-31", "2024-02-01", "2024-02-29", "2025-02-01"] {
        db.insert_income(user, dec!(1), "x", date(d)).unwrap();
    }

    let feb = Period::parse(Granularity::Month, "2024-02").unwrap();
    let dates: Vec<String> = db
        .get_income(user, Some(feb))
        .unwrap()
        .iter()
        .map(|r| r.date.to_string())
        .collect();
    assert_eq!(dates, ["2024-02-01", "2024-02-29"]);

    let year = Period::parse(Granularity::Year, "2024").unwrap();
    assert_eq!(db.get_income(user, Some(year)).unwrap().len(), 3);

    let day = Period::parse(Granularity::Day, "2025-02-01").unwrap();
    assert_eq!(db.get_income(user, Some(day)).unwrap().len(), 1);
}

#[test]
fn test_records_scoped_to_user() {
    let (mut db, ada) = db_with_user();
    let bob = db.insert_user("Bob", "bob@example.com").unwrap().id;
    db.insert_income(ada, dec!(5), "a", date("2024-01-01")).unwrap();
    db.insert_income(bob, dec!(7), "b", date("2024-01-01")).unwrap();
    let rows = db.get_income(bob, None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, dec!(7));
}

#[test]
fn test_records_ordered_by_date() {
    let (mut db, user) = db_with_user();
    db.insert_income(user, dec!(1), "late", date("2024-03-01")).unwrap();
    db.insert_income(user, dec!(2), "early", date("2024-01-01")).unwrap();
    let sources: Vec<String> = db
        .get_income(user, None)
        .unwrap()
        .into_iter()
        .map(|r| r.source)
        .collect();
    assert_eq!(sources, ["early", "late"]);
}

// ── Rollups ───────────────────────────────────────────────────

#[test]
fn test_monthly_totals_exact_decimal_sum() {
    let (mut db, user) = db_with_user();
    db.insert_income(user, dec!(0.1), "a", date("2024-01-02")).unwrap();
    db.insert_income(user, dec!(0.2), "b", date("2024-01-20")).unwrap();
    db.insert_income(user, dec!(5), "c", date("2023-12-24")).unwrap();

    let totals = db.get_monthly_totals(user, RecordKind::Income).unwrap();
    assert_eq!(
        totals,
        vec![
            ("2023-12".parse().unwrap(), dec!(5)),
            ("2024-01".parse().unwrap(), dec!(0.3)),
        ]
    );
    assert!(db
        .get_monthly_totals(user, RecordKind::Expense)
        .unwrap()
        .is_empty());
}

#[test]
fn test_category_totals_for_month() {
    let (mut db, user) = db_with_user();
    let food = db.insert_category("Food").unwrap().id;
    let rent = db.insert_category("Rent").unwrap().id;
    db.insert_expense(user, dec!(10), food, date("2024-02-01")).unwrap();
    db.insert_expense(user, dec!(15), food, date("2024-02-15")).unwrap();
    db.insert_expense(user, dec!(900), rent, date("2024-02-01")).unwrap();
    db.insert_expense(user, dec!(99), food, date("2024-03-01")).unwrap();

    let mut totals = db
        .get_category_totals(user, "2024-02".parse().unwrap())
        .unwrap();
    totals.sort();
    assert_eq!(
        totals,
        vec![("Food".to_string(), dec!(25)), ("Rent".to_string(), dec!(900))]
    );
}
