//! The module contains the definition of a user and registration.

use api_types::user::RegisterUser;
use axum::{Json, extract::State, http::StatusCode};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn map_currency(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Lkr => engine::Currency::Lkr,
    }
}

/// Creates the user row and its ledger.
///
/// The only unauthenticated route. Credentials are stored for the Basic-auth
/// lookup; session and token handling live outside this service.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterUser>,
) -> Result<StatusCode, ServerError> {
    let username = payload.username.trim().to_string();
    if username.is_empty() || payload.password.is_empty() {
        return Err(ServerError::Generic(
            "username and password are required".to_string(),
        ));
    }

    let exists = Entity::find_by_id(username.clone())
        .one(&state.db)
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?
        .is_some();
    if exists {
        return Err(ServerError::Engine(engine::EngineError::ExistingKey(
            username,
        )));
    }

    let user = ActiveModel {
        username: ActiveValue::Set(username.clone()),
        password: ActiveValue::Set(payload.password),
    };
    user.insert(&state.db)
        .await
        .map_err(|err| ServerError::Generic(err.to_string()))?;

    state
        .engine
        .new_ledger(&username, payload.currency.map(map_currency))
        .await?;

    Ok(StatusCode::CREATED)
}
