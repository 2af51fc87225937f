use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    EngineError, FundedGoal, Goal, ReorderDirection, ResultEngine, commands::GoalNewCmd, funding,
    goals,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Creates a goal at the back of the priority queue.
    ///
    /// Priorities of a user's goals stay a gapless `1..N` permutation under
    /// insert and reorder, so `count + 1` is the next free slot.
    pub async fn add_goal(&self, cmd: GoalNewCmd) -> ResultEngine<Goal> {
        let name = normalize_required_name(&cmd.name, "goal")?;
        with_tx!(self, |db_tx| {
            self.require_ledger(&db_tx, &cmd.user_id).await?;

            let count = goals::Entity::find()
                .filter(goals::Column::UserId.eq(cmd.user_id.clone()))
                .count(&db_tx)
                .await?;
            let priority = i32::try_from(count + 1)
                .map_err(|_| EngineError::InvalidArgument("too many goals".to_string()))?;

            let goal = Goal::new(
                cmd.user_id.clone(),
                name,
                cmd.target_amount_minor,
                priority,
                cmd.deadline,
            )?;
            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Flips only the completion flag; the priority rank is untouched.
    pub async fn set_goal_completed(
        &self,
        user_id: &str,
        goal_id: Uuid,
        is_completed: bool,
    ) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal_owned(&db_tx, goal_id, user_id).await?;
            let active = goals::ActiveModel {
                id: ActiveValue::Set(model.id),
                is_completed: ActiveValue::Set(is_completed),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Goal::try_from(updated)
        })
    }

    /// Deletes a goal.
    ///
    /// Remaining priorities are not renumbered: the permutation can be left
    /// with a gap, and a later reorder next to that gap is a no-op.
    pub async fn remove_goal(&self, user_id: &str, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal_owned(&db_tx, goal_id, user_id).await?;
            goals::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Swaps a goal with its neighbor one step up or down the ranking.
    ///
    /// Moving up from priority 1 fails with `InvalidMove` and changes
    /// nothing. A missing swap partner (past the end, or a gap left by a
    /// deletion) is not an error: the ranking is returned unchanged.
    pub async fn reorder_goal(
        &self,
        user_id: &str,
        goal_id: Uuid,
        direction: ReorderDirection,
    ) -> ResultEngine<Vec<Goal>> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal_owned(&db_tx, goal_id, user_id).await?;
            let current_priority = model.priority;
            let target_priority = match direction {
                ReorderDirection::Up => current_priority - 1,
                ReorderDirection::Down => current_priority + 1,
            };
            if target_priority < 1 {
                return Err(EngineError::InvalidMove(format!(
                    "goal '{}' is already at the top",
                    model.name
                )));
            }

            let swap = goals::Entity::find()
                .filter(goals::Column::UserId.eq(user_id.to_string()))
                .filter(goals::Column::Priority.eq(target_priority))
                .one(&db_tx)
                .await?;

            if let Some(swap_model) = swap {
                // Two-record swap; both updates commit together or not at all.
                let active = goals::ActiveModel {
                    id: ActiveValue::Set(swap_model.id),
                    priority: ActiveValue::Set(current_priority),
                    ..Default::default()
                };
                active.update(&db_tx).await?;

                let active = goals::ActiveModel {
                    id: ActiveValue::Set(model.id),
                    priority: ActiveValue::Set(target_priority),
                    ..Default::default()
                };
                active.update(&db_tx).await?;
            }

            self.goals_sorted(&db_tx, user_id).await
        })
    }

    async fn goals_sorted(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<Vec<Goal>> {
        let models = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(goals::Column::Priority)
            .all(db_tx)
            .await?;
        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(Goal::try_from(model)?);
        }
        Ok(out)
    }

    /// Returns a user's goals, priority ascending.
    pub async fn list_goals(&self, user_id: &str) -> ResultEngine<Vec<Goal>> {
        with_tx!(self, |db_tx| self.goals_sorted(&db_tx, user_id).await)
    }

    /// Runs the waterfall allocator over a consistent snapshot.
    ///
    /// Goal list and vault balance are read inside the same transaction, so
    /// funded amounts can never mix states from two different mutations.
    pub async fn goals_with_funding(&self, user_id: &str) -> ResultEngine<Vec<FundedGoal>> {
        with_tx!(self, |db_tx| {
            let ledger = self.require_ledger(&db_tx, user_id).await?;
            let goals = self.goals_sorted(&db_tx, user_id).await?;
            Ok(funding::allocate(goals, ledger.vault_balance_minor))
        })
    }
}
