//! End-to-end service flows over the in-memory store.

use chrono::NaiveDate;
use kakei_core::{
    Error, FixedCostDraft, NewScheduleEntry, Recurrence, ScheduleKind, TransactionDraft, View,
    month_end,
};
use kakei_store::{MemoryStore, ScheduleStore, Service};

fn service() -> Service<MemoryStore> {
    Service::with_owner(MemoryStore::new(), "owner-1")
}

async fn seed_categories(svc: &mut Service<MemoryStore>, names: &[&str]) -> Vec<String> {
    let mut ids = Vec::new();
    for name in names {
        svc.add_category(name).await.unwrap();
    }
    for cat in svc.list_categories().await.unwrap() {
        ids.push(cat.id);
    }
    ids
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn upsert_same_cell_twice_keeps_latest_amount() {
    let mut svc = service();
    let ids = seed_categories(&mut svc, &["Food"]).await;

    svc.update_budget(2024, 2, &ids[0], "100").await.unwrap();
    svc.update_budget(2024, 2, &ids[0], "900").await.unwrap();

    let grid = svc.budget_grid(2024).await.unwrap();
    assert_eq!(grid.amount(&ids[0], 2), Some(900));
}

#[tokio::test]
async fn fill_year_writes_twelve_cells_on_month_end_keys() {
    let mut svc = service();
    let ids = seed_categories(&mut svc, &["Rent"]).await;

    svc.fill_year_budget(2024, &ids[0], "80,000").await.unwrap();

    let grid = svc.budget_grid(2024).await.unwrap();
    for month in 1..=12 {
        assert_eq!(grid.amount(&ids[0], month), Some(80000), "month {month}");
    }
    // Leap-year February keys on the 29th, same as the single-cell path.
    assert_eq!(month_end(2024, 2), NaiveDate::from_ymd_opt(2024, 2, 29));
}

#[tokio::test]
async fn grid_contains_every_category_with_zero_defaults() {
    let mut svc = service();
    let ids = seed_categories(&mut svc, &["Food", "Rent", "Utilities"]).await;
    svc.update_budget(2024, 6, &ids[1], "500").await.unwrap();

    let grid = svc.budget_grid(2024).await.unwrap();
    assert_eq!(grid.rows.len(), 3);
    assert_eq!(grid.amount(&ids[0], 6), Some(0));
    assert_eq!(grid.amount(&ids[1], 6), Some(500));
    assert_eq!(grid.amount(&ids[2], 1), Some(0));
}

#[tokio::test]
async fn reorder_persists_and_reads_back_in_new_order() {
    let mut svc = service();
    let ids = seed_categories(&mut svc, &["A", "B", "C"]).await;

    let new_order = vec![ids[1].clone(), ids[0].clone(), ids[2].clone()];
    let mutation = svc.reorder_categories(&new_order).await.unwrap();
    assert!(mutation.stale.contains(&View::Categories));

    let names: Vec<String> = svc
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[tokio::test]
async fn failed_reorder_restores_prior_positions() {
    let store = MemoryStore::new();
    store.fail_sort_order_for("cat-3");
    let mut svc = Service::with_owner(store, "owner-1");
    let ids = seed_categories(&mut svc, &["A", "B", "C"]).await;
    assert_eq!(ids[2], "cat-3");

    let new_order = vec![ids[2].clone(), ids[1].clone(), ids[0].clone()];
    let err = svc.reorder_categories(&new_order).await.unwrap_err();
    assert!(matches!(err, Error::Persistence(_)));

    // Committed writes were compensated; the original order stands.
    let names: Vec<String> = svc
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn dashboard_summary_matches_the_spent_and_budgeted_numbers() {
    let mut svc = service();
    let ids = seed_categories(&mut svc, &["Food", "Hobby"]).await;

    svc.update_budget(2024, 5, &ids[0], "1000").await.unwrap();
    svc.add_transaction(TransactionDraft {
        date: Some(date(2024, 5, 10)),
        amount: 250,
        description: Some("groceries".to_string()),
        category_id: Some(ids[0].clone()),
    })
    .await
    .unwrap();
    svc.add_transaction(TransactionDraft {
        date: Some(date(2024, 5, 12)),
        amount: 500,
        description: None,
        category_id: Some(ids[1].clone()),
    })
    .await
    .unwrap();

    let dashboard = svc.dashboard(2024, 5).await.unwrap();
    assert_eq!(dashboard.summary.len(), 2);

    let food = &dashboard.summary[0];
    assert_eq!(food.budgeted, 1000);
    assert_eq!(food.spent, 250);
    assert_eq!(food.remaining, 750);
    assert_eq!(food.percentage, 25);

    // No budget: percentage stays 0, no division by zero.
    let hobby = &dashboard.summary[1];
    assert_eq!(hobby.budgeted, 0);
    assert_eq!(hobby.spent, 500);
    assert_eq!(hobby.percentage, 0);

    assert_eq!(dashboard.recent.len(), 2);
    assert_eq!(dashboard.recent[0].date, date(2024, 5, 12));
}

#[tokio::test]
async fn dashboard_reflects_inserts_after_invalidation() {
    let mut svc = service();
    let ids = seed_categories(&mut svc, &["Food"]).await;
    svc.update_budget(2024, 5, &ids[0], "1000").await.unwrap();

    let before = svc.dashboard(2024, 5).await.unwrap();
    assert_eq!(before.summary[0].spent, 0);

    svc.add_transaction(TransactionDraft {
        date: Some(date(2024, 5, 20)),
        amount: 400,
        description: None,
        category_id: Some(ids[0].clone()),
    })
    .await
    .unwrap();

    let after = svc.dashboard(2024, 5).await.unwrap();
    assert_eq!(after.summary[0].spent, 400);
}

#[tokio::test]
async fn mutations_without_an_owner_fail_auth() {
    let mut svc = Service::new(MemoryStore::new());
    let err = svc.update_budget(2024, 5, "c1", "100").await.unwrap_err();
    assert!(matches!(err, Error::AuthRequired));

    let err = svc.add_category("Food").await.unwrap_err();
    assert!(matches!(err, Error::AuthRequired));
}

#[tokio::test]
async fn transaction_validation_reports_every_bad_field() {
    let mut svc = service();
    let err = svc
        .add_transaction(TransactionDraft {
            date: None,
            amount: 0,
            description: None,
            category_id: None,
        })
        .await
        .unwrap_err();

    match err {
        Error::Validation(fields) => {
            let names: Vec<&str> = fields.iter().map(|f| f.field).collect();
            assert_eq!(names, vec!["date", "amount"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn editing_and_deleting_transactions() {
    let mut svc = service();
    seed_categories(&mut svc, &["Food"]).await;

    svc.add_transaction(TransactionDraft {
        date: Some(date(2024, 5, 10)),
        amount: 300,
        description: Some("lunch".to_string()),
        category_id: None,
    })
    .await
    .unwrap();

    let listed = svc.list_transactions(2024, 5).await.unwrap();
    assert_eq!(listed.len(), 1);
    let id = listed[0].id.clone();

    svc.update_transaction(
        &id,
        TransactionDraft {
            date: Some(date(2024, 5, 11)),
            amount: 450,
            description: Some("dinner".to_string()),
            category_id: None,
        },
    )
    .await
    .unwrap();

    let listed = svc.list_transactions(2024, 5).await.unwrap();
    assert_eq!(listed[0].amount, 450);
    assert_eq!(listed[0].description.as_deref(), Some("dinner"));

    svc.delete_transaction(&id).await.unwrap();
    assert!(svc.list_transactions(2024, 5).await.unwrap().is_empty());
}

#[tokio::test]
async fn fixed_cost_lifecycle_and_due_projection() {
    let mut svc = service();
    let ids = seed_categories(&mut svc, &["Housing"]).await;

    svc.add_fixed_cost(FixedCostDraft {
        description: "Rent".to_string(),
        amount: 80000,
        category_id: Some(ids[0].clone()),
        recurrence: Some(Recurrence::Monthly),
        execution_day: 27,
    })
    .await
    .unwrap();

    let costs = svc.list_fixed_costs().await.unwrap();
    assert_eq!(costs.len(), 1);
    assert_eq!(costs[0].description, "Rent");

    let due = svc.due_fixed_costs(date(2024, 5, 27)).await.unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].amount, 80000);
    assert!(svc.due_fixed_costs(date(2024, 5, 26)).await.unwrap().is_empty());

    let id = costs[0].id.clone();
    svc.delete_fixed_cost(&id).await.unwrap();
    assert!(svc.list_fixed_costs().await.unwrap().is_empty());
}

#[tokio::test]
async fn register_holidays_replaces_the_set_and_spares_other_entries() {
    let store = MemoryStore::new();
    store
        .insert_schedules(&[NewScheduleEntry {
            date: date(2024, 5, 4),
            title: "Dentist".to_string(),
            kind: ScheduleKind::Other,
        }])
        .await
        .unwrap();
    let mut svc = Service::with_owner(store, "owner-1");

    svc.register_holidays(&[date(2024, 1, 1), date(2024, 1, 8)], "New Year")
        .await
        .unwrap();
    assert_eq!(svc.holiday_dates().await.unwrap().len(), 2);

    // Second registration replaces the first wholesale.
    svc.register_holidays(&[date(2024, 5, 3)], "Golden Week")
        .await
        .unwrap();
    let dates = svc.holiday_dates().await.unwrap();
    assert_eq!(dates, vec![date(2024, 5, 3)]);

    // Empty set clears every holiday but leaves other kinds alone.
    svc.register_holidays(&[], "").await.unwrap();
    assert!(svc.holiday_dates().await.unwrap().is_empty());

    let remaining = svc.list_schedules().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].kind, ScheduleKind::Other);
    assert_eq!(remaining[0].title, "Dentist");
}
