use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, goals, ledgers};

use super::Engine;

impl Engine {
    /// Look up a user's ledger row, failing with `KeyNotFound` when no
    /// ledger was ever created for that user.
    pub(super) async fn require_ledger(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<ledgers::Model> {
        ledgers::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("no ledger for user '{user_id}'")))
    }

    /// Resolve a goal and verify the caller owns it.
    ///
    /// The engine trusts the authenticated `user_id` it is handed; ownership
    /// is checked against the record, not the session.
    pub(super) async fn require_goal_owned(
        &self,
        db: &DatabaseTransaction,
        goal_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<goals::Model> {
        let model = goals::Entity::find_by_id(goal_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("goal not exists".to_string()))?;
        if model.user_id != user_id {
            return Err(EngineError::Forbidden(format!(
                "goal {goal_id} belongs to another user"
            )));
        }
        Ok(model)
    }
}
