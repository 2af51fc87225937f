//! Quick-add shortcuts derived from spending history.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Icon identifier a category gets when it is first remembered.
///
/// Opaque to the engine; the presentation layer resolves it.
pub const DEFAULT_QUICK_ADD_ICON: &str = "pricetag";

/// A remembered category+amount shortcut.
///
/// At most one item exists per distinct case-insensitive category name.
/// Recording another pocket expense for the same category overwrites the
/// stored amount (last expense wins) while keeping the first-seen casing
/// and position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAddItem {
    pub id: Uuid,
    pub name: String,
    pub amount_minor: i64,
    pub icon: String,
    pub position: i32,
}

impl QuickAddItem {
    pub fn new(name: String, amount_minor: i64, position: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            amount_minor,
            icon: DEFAULT_QUICK_ADD_ICON.to_string(),
            position,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quick_add_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub amount_minor: i64,
    pub icon: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&QuickAddItem> for ActiveModel {
    fn from(item: &QuickAddItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            user_id: ActiveValue::NotSet,
            name: ActiveValue::Set(item.name.clone()),
            amount_minor: ActiveValue::Set(item.amount_minor),
            icon: ActiveValue::Set(item.icon.clone()),
            position: ActiveValue::Set(item.position),
        }
    }
}

impl TryFrom<Model> for QuickAddItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidArgument("invalid quick-add id".to_string()))?,
            name: model.name,
            amount_minor: model.amount_minor,
            icon: model.icon,
            position: model.position,
        })
    }
}
