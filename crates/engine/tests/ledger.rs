use chrono::{TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, Statement};

use engine::{Engine, EngineError, TransactionCmd, TransactionKind, WalletKind};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for user in ["alice", "mallory"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![user.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder().database(db).build().await.unwrap();
    engine.new_ledger("alice", None).await.unwrap();
    engine
}

fn cmd(amount_minor: i64, kind: TransactionKind, wallet: WalletKind, category: &str) -> TransactionCmd {
    TransactionCmd::new("alice", amount_minor, kind, wallet, category, Utc::now())
}

#[tokio::test]
async fn deposits_and_expenses_move_the_right_balances() {
    let engine = engine_with_db().await;

    engine
        .apply_transaction(cmd(100_000, TransactionKind::Deposit, WalletKind::Pocket, "Salary"))
        .await
        .unwrap();
    engine
        .apply_transaction(cmd(500_000, TransactionKind::Deposit, WalletKind::Vault, "Savings"))
        .await
        .unwrap();
    engine
        .apply_transaction(cmd(30_000, TransactionKind::Expense, WalletKind::Pocket, "Food"))
        .await
        .unwrap();

    let snapshot = engine.ledger_snapshot("alice", 50).await.unwrap();
    assert_eq!(snapshot.ledger.pocket_balance_minor, 70_000);
    assert_eq!(snapshot.ledger.vault_balance_minor, 500_000);
    assert_eq!(snapshot.ledger.spent_today_minor, 30_000);
}

#[tokio::test]
async fn vault_deposit_does_not_touch_the_daily_counter() {
    let engine = engine_with_db().await;

    engine
        .apply_transaction(cmd(30_000, TransactionKind::Expense, WalletKind::Pocket, "Food"))
        .await
        .unwrap();
    engine
        .apply_transaction(cmd(500_000, TransactionKind::Deposit, WalletKind::Vault, "Savings"))
        .await
        .unwrap();

    let snapshot = engine.ledger_snapshot("alice", 50).await.unwrap();
    assert_eq!(snapshot.ledger.spent_today_minor, 30_000);
}

#[tokio::test]
async fn balances_have_no_floor() {
    let engine = engine_with_db().await;

    engine
        .apply_transaction(cmd(50_000, TransactionKind::Expense, WalletKind::Pocket, "Rent"))
        .await
        .unwrap();

    let snapshot = engine.ledger_snapshot("alice", 50).await.unwrap();
    assert_eq!(snapshot.ledger.pocket_balance_minor, -50_000);
}

#[tokio::test]
async fn vault_expense_skips_counter_and_quick_add() {
    let engine = engine_with_db().await;

    engine
        .apply_transaction(cmd(20_000, TransactionKind::Expense, WalletKind::Vault, "Laptop"))
        .await
        .unwrap();

    let snapshot = engine.ledger_snapshot("alice", 50).await.unwrap();
    assert_eq!(snapshot.ledger.vault_balance_minor, -20_000);
    assert_eq!(snapshot.ledger.spent_today_minor, 0);
    assert!(snapshot.quick_add_items.is_empty());
}

#[tokio::test]
async fn quick_add_dedup_is_case_insensitive_and_last_expense_wins() {
    let engine = engine_with_db().await;

    engine
        .apply_transaction(cmd(30_000, TransactionKind::Expense, WalletKind::Pocket, "Food"))
        .await
        .unwrap();
    engine
        .apply_transaction(cmd(45_000, TransactionKind::Expense, WalletKind::Pocket, "food"))
        .await
        .unwrap();
    engine
        .apply_transaction(cmd(5_000, TransactionKind::Expense, WalletKind::Pocket, "Transport"))
        .await
        .unwrap();

    let snapshot = engine.ledger_snapshot("alice", 50).await.unwrap();
    let items = &snapshot.quick_add_items;
    assert_eq!(items.len(), 2);
    // First-seen casing and position survive; the amount is the most recent.
    assert_eq!(items[0].name, "Food");
    assert_eq!(items[0].amount_minor, 45_000);
    assert_eq!(items[0].position, 1);
    assert_eq!(items[1].name, "Transport");
    assert_eq!(items[1].position, 2);
}

#[tokio::test]
async fn snapshot_lists_recent_transactions_newest_first_and_bounded() {
    let engine = engine_with_db().await;

    for (seconds, category) in [(100, "First"), (200, "Second"), (300, "Third")] {
        engine
            .apply_transaction(TransactionCmd::new(
                "alice",
                1_000,
                TransactionKind::Deposit,
                WalletKind::Pocket,
                category,
                Utc.timestamp_opt(seconds, 0).unwrap(),
            ))
            .await
            .unwrap();
    }

    let snapshot = engine.ledger_snapshot("alice", 2).await.unwrap();
    let categories: Vec<&str> = snapshot
        .recent_transactions
        .iter()
        .map(|tx| tx.category.as_str())
        .collect();
    assert_eq!(categories, vec!["Third", "Second"]);
}

#[tokio::test]
async fn set_daily_limit_replaces_only_the_limit() {
    let engine = engine_with_db().await;

    engine
        .apply_transaction(cmd(30_000, TransactionKind::Expense, WalletKind::Pocket, "Food"))
        .await
        .unwrap();

    let ledger = engine.set_daily_limit("alice", 150_000).await.unwrap();
    assert_eq!(ledger.daily_limit_minor, 150_000);
    assert_eq!(ledger.spent_today_minor, 30_000);

    assert_eq!(
        engine.set_daily_limit("alice", -1).await,
        Err(EngineError::InvalidArgument(
            "daily limit must be >= 0".to_string()
        ))
    );
    assert!(engine.set_daily_limit("alice", 0).await.is_ok());
}

#[tokio::test]
async fn reset_daily_spend_zeroes_only_the_counter() {
    let engine = engine_with_db().await;

    engine
        .apply_transaction(cmd(30_000, TransactionKind::Expense, WalletKind::Pocket, "Food"))
        .await
        .unwrap();

    let ledger = engine.reset_daily_spend("alice").await.unwrap();
    assert_eq!(ledger.spent_today_minor, 0);
    assert_eq!(ledger.pocket_balance_minor, -30_000);
}

#[tokio::test]
async fn unknown_user_fails_with_not_found() {
    let engine = engine_with_db().await;

    let result = engine
        .apply_transaction(TransactionCmd::new(
            "nobody",
            1_000,
            TransactionKind::Deposit,
            WalletKind::Pocket,
            "Salary",
            Utc::now(),
        ))
        .await;
    assert!(matches!(result, Err(EngineError::KeyNotFound(_))));

    assert!(matches!(
        engine.ledger_snapshot("nobody", 50).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let engine = engine_with_db().await;

    for amount in [0, -500] {
        let result = engine
            .apply_transaction(cmd(amount, TransactionKind::Expense, WalletKind::Pocket, "Food"))
            .await;
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    // Nothing was recorded by the rejected calls.
    let snapshot = engine.ledger_snapshot("alice", 50).await.unwrap();
    assert!(snapshot.recent_transactions.is_empty());
    assert_eq!(snapshot.ledger.pocket_balance_minor, 0);
}

#[tokio::test]
async fn a_second_ledger_for_the_same_user_is_rejected() {
    let engine = engine_with_db().await;

    assert_eq!(
        engine.new_ledger("alice", None).await,
        Err(EngineError::ExistingKey("alice".to_string()))
    );
}
