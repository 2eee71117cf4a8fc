//! Tests for the on-disk database pool and migrations.

use budgeteer::date_utils::Month;
use budgeteer::db::queries::{recurring_transactions, settings, users};
use budgeteer::db::{create_pool, migrations};
use budgeteer::models::{NewBudgetSettings, NewRecurringTransaction};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_migrations_are_applied_once() {
    let dir = TempDir::new().unwrap();
    let pool = create_pool(&dir.path().join("nested").join("budgeteer.db")).unwrap();
    let conn = pool.get().unwrap();

    let applied = migrations::run_migrations(&conn, Path::new("migrations")).unwrap();
    assert!(applied > 0);
    let applied = migrations::run_migrations(&conn, Path::new("migrations")).unwrap();
    assert_eq!(applied, 0);
}

#[test]
fn test_data_survives_reopening() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budgeteer.db");

    {
        let pool = create_pool(&path).unwrap();
        let conn = pool.get().unwrap();
        migrations::run_migrations(&conn, Path::new("migrations")).unwrap();
        let user_id = users::create_user(&conn, "Ada", "Tester", "+15550001", "hash").unwrap();
        settings::replace_settings(
            &conn,
            user_id,
            &NewBudgetSettings {
                income_cents: 300_000,
                needs_percentage: 0.5,
                wants_percentage: 0.3,
                savings_percentage: 0.2,
                effective_at: Month::new(2024, 12).unwrap(),
            },
        )
        .unwrap();
        recurring_transactions::create_recurring_transaction(
            &conn,
            user_id,
            &NewRecurringTransaction {
                name: "Rent".into(),
                category: "Needs".into(),
                price_cents: 120_000,
                effective_at: Month::new(2024, 12).unwrap(),
            },
        )
        .unwrap();
    }

    let pool = create_pool(&path).unwrap();
    let conn = pool.get().unwrap();
    let user = users::get_user_by_phone(&conn, "+15550001").unwrap().unwrap();

    let stored = settings::get_settings_effective_in(&conn, user.id, Month::new(2025, 3).unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.income_cents, 300_000);
    assert_eq!(stored.effective_at, Month::new(2024, 12).unwrap());

    let december = Month::new(2024, 12).unwrap().window();
    let recurring =
        recurring_transactions::list_recurring_transactions(&conn, user.id, Some(december.start))
            .unwrap();
    assert!(recurring.is_empty());
    let recurring =
        recurring_transactions::list_recurring_transactions(&conn, user.id, Some(december.end))
            .unwrap();
    assert_eq!(recurring.len(), 1);
}
