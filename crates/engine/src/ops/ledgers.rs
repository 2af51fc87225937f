use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*, sea_query::Expr,
};

use crate::{
    Currency, EngineError, Ledger, LedgerSnapshot, QuickAddItem, ResultEngine, Transaction,
    TransactionKind, WalletKind, commands::TransactionCmd, ledgers, quick_add, transactions,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Creates the ledger record for a freshly registered user.
    ///
    /// Every other ledger and goal operation requires this row to exist.
    pub async fn new_ledger(
        &self,
        user_id: &str,
        currency: Option<Currency>,
    ) -> ResultEngine<Ledger> {
        let user_id = normalize_required_name(user_id, "user")?;
        with_tx!(self, |db_tx| {
            let exists = ledgers::Entity::find_by_id(user_id.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(user_id));
            }

            let ledger = Ledger::new(user_id, currency.unwrap_or_default());
            ledgers::ActiveModel::from(&ledger).insert(&db_tx).await?;
            Ok(ledger)
        })
    }

    /// Records a deposit or expense and applies its effects to the ledger.
    ///
    /// The balance change, the daily spend counter, the quick-add upsert and
    /// the log append all land in one database transaction; a reader never
    /// observes them half-applied. Balances have no floor and may go
    /// negative.
    pub async fn apply_transaction(&self, cmd: TransactionCmd) -> ResultEngine<Transaction> {
        let category = normalize_required_name(&cmd.category, "category")?;
        let note = normalize_optional_text(cmd.note.as_deref());
        let tx = Transaction::new(
            cmd.user_id.clone(),
            cmd.kind,
            cmd.wallet,
            cmd.amount_minor,
            category.clone(),
            note,
            cmd.occurred_at,
        )?;

        with_tx!(self, |db_tx| {
            let ledger = self.require_ledger(&db_tx, &cmd.user_id).await?;

            let mut active = ledgers::ActiveModel {
                user_id: ActiveValue::Set(ledger.user_id.clone()),
                ..Default::default()
            };
            match (cmd.kind, cmd.wallet) {
                (TransactionKind::Deposit, WalletKind::Pocket) => {
                    active.pocket_balance_minor =
                        ActiveValue::Set(ledger.pocket_balance_minor + cmd.amount_minor);
                }
                (TransactionKind::Deposit, WalletKind::Vault) => {
                    active.vault_balance_minor =
                        ActiveValue::Set(ledger.vault_balance_minor + cmd.amount_minor);
                }
                (TransactionKind::Expense, WalletKind::Pocket) => {
                    active.pocket_balance_minor =
                        ActiveValue::Set(ledger.pocket_balance_minor - cmd.amount_minor);
                    active.spent_today_minor =
                        ActiveValue::Set(ledger.spent_today_minor + cmd.amount_minor);
                }
                // Vault expenses (goal redemption) leave the daily counter
                // and the quick-add list untouched.
                (TransactionKind::Expense, WalletKind::Vault) => {
                    active.vault_balance_minor =
                        ActiveValue::Set(ledger.vault_balance_minor - cmd.amount_minor);
                }
            }
            active.update(&db_tx).await?;

            if cmd.kind == TransactionKind::Expense && cmd.wallet == WalletKind::Pocket {
                self.upsert_quick_add(&db_tx, &cmd.user_id, &category, cmd.amount_minor)
                    .await?;
            }

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    /// Case-insensitive upsert of the quick-add shortcut for a category.
    ///
    /// Last expense wins: an existing entry keeps its first-seen casing and
    /// position, only the stored amount is replaced.
    async fn upsert_quick_add(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        category: &str,
        amount_minor: i64,
    ) -> ResultEngine<()> {
        let existing = quick_add::Entity::find()
            .filter(quick_add::Column::UserId.eq(user_id.to_string()))
            .filter(Expr::cust("LOWER(name)").eq(category.to_lowercase()))
            .one(db_tx)
            .await?;

        match existing {
            Some(model) => {
                let active = quick_add::ActiveModel {
                    id: ActiveValue::Set(model.id),
                    amount_minor: ActiveValue::Set(amount_minor),
                    ..Default::default()
                };
                active.update(db_tx).await?;
            }
            None => {
                let next_position = quick_add::Entity::find()
                    .filter(quick_add::Column::UserId.eq(user_id.to_string()))
                    .order_by_desc(quick_add::Column::Position)
                    .one(db_tx)
                    .await?
                    .map_or(1, |model| model.position + 1);

                let item = QuickAddItem::new(category.to_string(), amount_minor, next_position);
                let mut active = quick_add::ActiveModel::from(&item);
                active.user_id = ActiveValue::Set(user_id.to_string());
                active.insert(db_tx).await?;
            }
        }
        Ok(())
    }

    /// Replaces the daily pocket ceiling. `spent_today` is not recomputed.
    pub async fn set_daily_limit(&self, user_id: &str, limit_minor: i64) -> ResultEngine<Ledger> {
        if limit_minor < 0 {
            return Err(EngineError::InvalidArgument(
                "daily limit must be >= 0".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let ledger = self.require_ledger(&db_tx, user_id).await?;
            let active = ledgers::ActiveModel {
                user_id: ActiveValue::Set(ledger.user_id),
                daily_limit_minor: ActiveValue::Set(limit_minor),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Ledger::try_from(updated)
        })
    }

    /// Zeroes the daily spend counter.
    ///
    /// Nothing in the engine calls this implicitly; day-boundary scheduling
    /// (and the timezone it is keyed to) belongs to the deployment.
    pub async fn reset_daily_spend(&self, user_id: &str) -> ResultEngine<Ledger> {
        with_tx!(self, |db_tx| {
            let ledger = self.require_ledger(&db_tx, user_id).await?;
            let active = ledgers::ActiveModel {
                user_id: ActiveValue::Set(ledger.user_id),
                spent_today_minor: ActiveValue::Set(0),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Ledger::try_from(updated)
        })
    }

    /// Reads balances, quick-add shortcuts and recent history from one
    /// consistent snapshot.
    ///
    /// Transactions come back most-recent-first, at most `limit` of them.
    pub async fn ledger_snapshot(&self, user_id: &str, limit: u64) -> ResultEngine<LedgerSnapshot> {
        with_tx!(self, |db_tx| {
            let ledger_model = self.require_ledger(&db_tx, user_id).await?;
            let ledger = Ledger::try_from(ledger_model)?;

            let item_models = quick_add::Entity::find()
                .filter(quick_add::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(quick_add::Column::Position)
                .all(&db_tx)
                .await?;
            let mut quick_add_items = Vec::with_capacity(item_models.len());
            for model in item_models {
                quick_add_items.push(QuickAddItem::try_from(model)?);
            }

            let tx_models = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .order_by_desc(transactions::Column::OccurredAt)
                .limit(limit)
                .all(&db_tx)
                .await?;
            let mut recent_transactions = Vec::with_capacity(tx_models.len());
            for model in tx_models {
                recent_transactions.push(Transaction::try_from(model)?);
            }

            Ok(LedgerSnapshot {
                ledger,
                quick_add_items,
                recent_transactions,
            })
        })
    }
}
