//! Savings goals and their strict priority ranking.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Direction for an adjacent-swap reorder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderDirection {
    Up,
    Down,
}

/// A named savings target with a priority rank.
///
/// Priority 1 is funded first. For a given user the priorities of live goals
/// form a permutation of `1..N` under insert and reorder; deleting a goal
/// leaves a gap (survivors are not renumbered), and an adjacent reorder into
/// a gap is a no-op.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub priority: i32,
    pub is_completed: bool,
    pub deadline: Option<NaiveDate>,
}

impl Goal {
    pub fn new(
        user_id: String,
        name: String,
        target_amount_minor: i64,
        priority: i32,
        deadline: Option<NaiveDate>,
    ) -> ResultEngine<Self> {
        if target_amount_minor <= 0 {
            return Err(EngineError::InvalidArgument(
                "target_amount_minor must be > 0".to_string(),
            ));
        }
        if priority < 1 {
            return Err(EngineError::InvalidArgument(
                "priority must be >= 1".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            target_amount_minor,
            priority,
            is_completed: false,
            deadline,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub priority: i32,
    pub is_completed: bool,
    pub deadline: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_amount_minor: ActiveValue::Set(goal.target_amount_minor),
            priority: ActiveValue::Set(goal.priority),
            is_completed: ActiveValue::Set(goal.is_completed),
            deadline: ActiveValue::Set(goal.deadline),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("goal not exists".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            target_amount_minor: model.target_amount_minor,
            priority: model.priority,
            is_completed: model.is_completed,
            deadline: model.deadline,
        })
    }
}
