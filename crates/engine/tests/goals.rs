use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, Statement};
use uuid::Uuid;

use engine::{
    Engine, EngineError, Goal, GoalNewCmd, ReorderDirection, TransactionCmd, TransactionKind,
    WalletKind,
};
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

async fn add_goal(engine: &Engine, name: &str, target_minor: i64) -> Goal {
    engine
        .add_goal(GoalNewCmd::new("alice", name, target_minor))
        .await
        .unwrap()
}

async fn deposit_vault(engine: &Engine, amount_minor: i64) {
    engine
        .apply_transaction(TransactionCmd::new(
            "alice",
            amount_minor,
            TransactionKind::Deposit,
            WalletKind::Vault,
            "Savings",
            Utc::now(),
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn goals_are_appended_at_the_back_of_the_queue() {
    let engine = engine_with_db().await;

    let first = add_goal(&engine, "Laptop", 100_000).await;
    let second = add_goal(&engine, "Trip", 50_000).await;
    let third = add_goal(&engine, "Camera", 80_000).await;

    assert_eq!(first.priority, 1);
    assert_eq!(second.priority, 2);
    assert_eq!(third.priority, 3);
    assert!(!first.is_completed);
}

#[tokio::test]
async fn priorities_stay_a_permutation_under_add_and_reorder() {
    let engine = engine_with_db().await;

    let mut ids = Vec::new();
    for (name, target) in [("A", 10), ("B", 20), ("C", 30), ("D", 40)] {
        ids.push(add_goal(&engine, name, target).await.id);
    }

    for (goal_id, direction) in [
        (ids[3], ReorderDirection::Up),
        (ids[0], ReorderDirection::Down),
        (ids[3], ReorderDirection::Up),
        (ids[1], ReorderDirection::Down),
    ] {
        engine
            .reorder_goal("alice", goal_id, direction)
            .await
            .unwrap();
    }

    let goals = engine.list_goals("alice").await.unwrap();
    let priorities: BTreeSet<i32> = goals.iter().map(|g| g.priority).collect();
    assert_eq!(priorities, (1..=4).collect::<BTreeSet<i32>>());
}

#[tokio::test]
async fn waterfall_funds_priority_one_first() {
    let engine = engine_with_db().await;
    deposit_vault(&engine, 120_000).await;

    add_goal(&engine, "Laptop", 100_000).await;
    add_goal(&engine, "Trip", 50_000).await;

    let funded = engine.goals_with_funding("alice").await.unwrap();
    assert_eq!(funded[0].goal.name, "Laptop");
    assert_eq!(funded[0].saved_amount_minor, 100_000);
    assert_eq!(funded[1].goal.name, "Trip");
    assert_eq!(funded[1].saved_amount_minor, 20_000);
}

#[tokio::test]
async fn reorder_swaps_neighbors_and_funding_follows() {
    let engine = engine_with_db().await;
    deposit_vault(&engine, 120_000).await;

    add_goal(&engine, "Laptop", 100_000).await;
    let trip = add_goal(&engine, "Trip", 50_000).await;

    let reordered = engine
        .reorder_goal("alice", trip.id, ReorderDirection::Up)
        .await
        .unwrap();
    assert_eq!(reordered[0].name, "Trip");
    assert_eq!(reordered[0].priority, 1);
    assert_eq!(reordered[1].name, "Laptop");
    assert_eq!(reordered[1].priority, 2);

    let funded = engine.goals_with_funding("alice").await.unwrap();
    assert_eq!(funded[0].goal.name, "Trip");
    assert_eq!(funded[0].saved_amount_minor, 50_000);
    assert_eq!(funded[1].saved_amount_minor, 70_000);
}

#[tokio::test]
async fn reorder_up_then_down_restores_the_original_ranking() {
    let engine = engine_with_db().await;

    add_goal(&engine, "A", 10_000).await;
    let b = add_goal(&engine, "B", 20_000).await;
    add_goal(&engine, "C", 30_000).await;
    let before = engine.list_goals("alice").await.unwrap();

    engine
        .reorder_goal("alice", b.id, ReorderDirection::Up)
        .await
        .unwrap();
    let after = engine
        .reorder_goal("alice", b.id, ReorderDirection::Down)
        .await
        .unwrap();

    let before_ranking: Vec<(Uuid, i32)> = before.iter().map(|g| (g.id, g.priority)).collect();
    let after_ranking: Vec<(Uuid, i32)> = after.iter().map(|g| (g.id, g.priority)).collect();
    assert_eq!(before_ranking, after_ranking);
}

#[tokio::test]
async fn moving_the_top_goal_up_fails_and_changes_nothing() {
    let engine = engine_with_db().await;

    let top = add_goal(&engine, "Laptop", 100_000).await;
    add_goal(&engine, "Trip", 50_000).await;

    let result = engine
        .reorder_goal("alice", top.id, ReorderDirection::Up)
        .await;
    assert!(matches!(result, Err(EngineError::InvalidMove(_))));

    let goals = engine.list_goals("alice").await.unwrap();
    assert_eq!(goals[0].id, top.id);
    assert_eq!(goals[0].priority, 1);
}

#[tokio::test]
async fn moving_the_last_goal_down_is_a_silent_noop() {
    let engine = engine_with_db().await;

    add_goal(&engine, "Laptop", 100_000).await;
    let last = add_goal(&engine, "Trip", 50_000).await;

    let goals = engine
        .reorder_goal("alice", last.id, ReorderDirection::Down)
        .await
        .unwrap();
    assert_eq!(goals[1].id, last.id);
    assert_eq!(goals[1].priority, 2);
}

#[tokio::test]
async fn removal_leaves_a_gap_and_reorder_into_the_gap_is_a_noop() {
    let engine = engine_with_db().await;

    add_goal(&engine, "A", 10_000).await;
    let b = add_goal(&engine, "B", 20_000).await;
    let c = add_goal(&engine, "C", 30_000).await;

    engine.remove_goal("alice", b.id).await.unwrap();

    // Survivors keep priorities {1, 3}; moving C up targets the empty slot 2
    // and finds no swap partner.
    let goals = engine
        .reorder_goal("alice", c.id, ReorderDirection::Up)
        .await
        .unwrap();
    let priorities: Vec<i32> = goals.iter().map(|g| g.priority).collect();
    assert_eq!(priorities, vec![1, 3]);
    assert_eq!(goals[1].id, c.id);
}

#[tokio::test]
async fn completion_flag_flips_without_touching_priority_or_funding() {
    let engine = engine_with_db().await;
    deposit_vault(&engine, 50_000).await;

    let goal = add_goal(&engine, "Laptop", 100_000).await;
    let updated = engine
        .set_goal_completed("alice", goal.id, true)
        .await
        .unwrap();
    assert!(updated.is_completed);
    assert_eq!(updated.priority, 1);

    // The allocator funds by priority regardless of completion.
    let funded = engine.goals_with_funding("alice").await.unwrap();
    assert_eq!(funded[0].saved_amount_minor, 50_000);
}

#[tokio::test]
async fn goal_operations_enforce_ownership() {
    let engine = engine_with_db().await;
    let goal = add_goal(&engine, "Laptop", 100_000).await;

    assert!(matches!(
        engine.set_goal_completed("mallory", goal.id, true).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.remove_goal("mallory", goal.id).await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine
            .reorder_goal("mallory", goal.id, ReorderDirection::Down)
            .await,
        Err(EngineError::Forbidden(_))
    ));

    // Nothing leaked through.
    let goals = engine.list_goals("alice").await.unwrap();
    assert_eq!(goals.len(), 1);
    assert!(!goals[0].is_completed);
}

#[tokio::test]
async fn missing_goal_fails_with_not_found() {
    let engine = engine_with_db().await;

    let unknown = Uuid::new_v4();
    assert!(matches!(
        engine.set_goal_completed("alice", unknown, true).await,
        Err(EngineError::KeyNotFound(_))
    ));
    assert!(matches!(
        engine.remove_goal("alice", unknown).await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn negative_vault_balance_funds_nothing() {
    let engine = engine_with_db().await;

    engine
        .apply_transaction(TransactionCmd::new(
            "alice",
            10_000,
            TransactionKind::Expense,
            WalletKind::Vault,
            "Redemption",
            Utc::now(),
        ))
        .await
        .unwrap();
    add_goal(&engine, "Laptop", 100_000).await;
    add_goal(&engine, "Trip", 50_000).await;

    let funded = engine.goals_with_funding("alice").await.unwrap();
    assert!(funded.iter().all(|f| f.saved_amount_minor == 0));
}

#[tokio::test]
async fn invalid_goal_arguments_are_rejected() {
    let engine = engine_with_db().await;

    assert!(matches!(
        engine.add_goal(GoalNewCmd::new("alice", "Laptop", 0)).await,
        Err(EngineError::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.add_goal(GoalNewCmd::new("alice", "   ", 10_000)).await,
        Err(EngineError::InvalidArgument(_))
    ));
    assert!(matches!(
        engine.add_goal(GoalNewCmd::new("nobody", "Laptop", 10_000)).await,
        Err(EngineError::KeyNotFound(_))
    ));
}
