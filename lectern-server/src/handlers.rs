use axum::{
    extract::{Path, Query, State},
    Json,
};
use lectern_api::{
    Actor, AuthToken, ContextId, Intent, NewActor, Outcome, SortOrder, ThreadView, Uuid,
};

use crate::{extractors::*, Directory, Error, Threads};

pub async fn admin_create_actor(
    AdminAuth: AdminAuth,
    State(directory): State<Directory>,
    Json(data): Json<NewActor>,
) -> Result<Json<AuthToken>, Error> {
    let (token, _) = directory.create(data).await?;
    Ok(Json(token))
}

pub async fn whoami(Auth(actor): Auth) -> Json<Actor> {
    Json(actor)
}

#[derive(Debug, serde::Deserialize)]
pub struct ThreadParams {
    #[serde(default)]
    pub order: SortOrder,
}

pub async fn fetch_thread(
    Auth(actor): Auth,
    State(threads): State<Threads>,
    Path(context): Path<Uuid>,
    Query(params): Query<ThreadParams>,
) -> Result<Json<ThreadView>, Error> {
    Ok(Json(
        threads
            .view(ContextId(context), &actor, params.order)
            .await?,
    ))
}

pub async fn submit_intent(
    Auth(actor): Auth,
    State(threads): State<Threads>,
    Path(context): Path<Uuid>,
    Json(intent): Json<Intent>,
) -> Result<Json<Outcome>, Error> {
    tracing::debug!(user = ?actor.id, ?context, intent = intent.name(), "received intent");
    Ok(Json(
        threads
            .submit(ContextId(context), &actor, intent)
            .await?,
    ))
}

pub async fn fetch_flagged(
    Auth(actor): Auth,
    State(threads): State<Threads>,
    Path(context): Path<Uuid>,
) -> Result<Json<ThreadView>, Error> {
    Ok(Json(threads.flagged(ContextId(context), &actor).await?))
}
