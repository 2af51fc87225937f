//! Wallet API endpoints

use api_types::wallet::{
    DailyLimitUpdate, LedgerView, QuickAddItemView, TransactionKind as ApiKind, TransactionNew,
    TransactionView, WalletKind as ApiWallet, WalletSnapshot,
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::{FixedOffset, Utc};

use crate::{ServerError, server::ServerState, user};

/// Bound on the history returned with the wallet screen.
const RECENT_TRANSACTIONS_LIMIT: u64 = 50;

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Deposit => ApiKind::Deposit,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_kind_to_engine(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Deposit => engine::TransactionKind::Deposit,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_wallet(wallet: engine::WalletKind) -> ApiWallet {
    match wallet {
        engine::WalletKind::Pocket => ApiWallet::Pocket,
        engine::WalletKind::Vault => ApiWallet::Vault,
    }
}

fn map_wallet_to_engine(wallet: ApiWallet) -> engine::WalletKind {
    match wallet {
        ApiWallet::Pocket => engine::WalletKind::Pocket,
        ApiWallet::Vault => engine::WalletKind::Vault,
    }
}

fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Lkr => api_types::Currency::Lkr,
    }
}

fn map_ledger(ledger: engine::Ledger) -> LedgerView {
    LedgerView {
        pocket_balance_minor: ledger.pocket_balance_minor,
        vault_balance_minor: ledger.vault_balance_minor,
        daily_limit_minor: ledger.daily_limit_minor,
        spent_today_minor: ledger.spent_today_minor,
        currency: map_currency(ledger.currency),
    }
}

fn map_transaction(tx: engine::Transaction, utc: FixedOffset) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        wallet: map_wallet(tx.wallet),
        amount_minor: tx.amount_minor,
        category: tx.category,
        note: tx.note,
        occurred_at: tx.occurred_at.with_timezone(&utc),
    }
}

fn utc_offset() -> Result<FixedOffset, ServerError> {
    FixedOffset::east_opt(0).ok_or_else(|| ServerError::Generic("invalid UTC offset".to_string()))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<WalletSnapshot>, ServerError> {
    let snapshot = state
        .engine
        .ledger_snapshot(&user.username, RECENT_TRANSACTIONS_LIMIT)
        .await?;
    let utc = utc_offset()?;

    Ok(Json(WalletSnapshot {
        pocket_balance_minor: snapshot.ledger.pocket_balance_minor,
        vault_balance_minor: snapshot.ledger.vault_balance_minor,
        daily_limit_minor: snapshot.ledger.daily_limit_minor,
        spent_today_minor: snapshot.ledger.spent_today_minor,
        currency: map_currency(snapshot.ledger.currency),
        quick_add_items: snapshot
            .quick_add_items
            .into_iter()
            .map(|item| QuickAddItemView {
                name: item.name,
                amount_minor: item.amount_minor,
                icon: item.icon,
            })
            .collect(),
        transactions: snapshot
            .recent_transactions
            .into_iter()
            .map(|tx| map_transaction(tx, utc))
            .collect(),
    }))
}

pub async fn transaction_new(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let occurred_at = payload
        .occurred_at
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now);

    let mut cmd = engine::TransactionCmd::new(
        user.username.clone(),
        payload.amount_minor,
        map_kind_to_engine(payload.kind),
        map_wallet_to_engine(payload.wallet),
        payload.category,
        occurred_at,
    );
    if let Some(note) = payload.note {
        cmd = cmd.note(note);
    }

    let tx = state.engine.apply_transaction(cmd).await?;
    let utc = utc_offset()?;

    Ok((StatusCode::CREATED, Json(map_transaction(tx, utc))))
}

pub async fn set_limit(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DailyLimitUpdate>,
) -> Result<Json<LedgerView>, ServerError> {
    let ledger = state
        .engine
        .set_daily_limit(&user.username, payload.limit_minor)
        .await?;

    Ok(Json(map_ledger(ledger)))
}

pub async fn reset_day(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<LedgerView>, ServerError> {
    let ledger = state.engine.reset_daily_spend(&user.username).await?;

    Ok(Json(map_ledger(ledger)))
}
