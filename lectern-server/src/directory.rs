use std::{collections::HashMap, sync::Arc};

use lectern_api::{Actor, AuthToken, NewActor, UserId, Uuid};
use tokio::sync::RwLock;

use crate::Error;

/// Actors known to this server, by session token
#[derive(Clone, Debug, Default)]
pub struct Directory(Arc<RwLock<HashMap<AuthToken, Actor>>>);

impl Directory {
    pub fn new() -> Directory {
        Directory::default()
    }

    pub async fn create(&self, data: NewActor) -> Result<(AuthToken, Actor), Error> {
        data.validate()?;
        let actor = data.into_actor(UserId(Uuid::new_v4()));
        let token = AuthToken(Uuid::new_v4());
        self.0.write().await.insert(token, actor.clone());
        tracing::info!(user = ?actor.id, role = %actor.role, "created actor");
        Ok((token, actor))
    }

    pub async fn resolve(&self, token: &AuthToken) -> Result<Actor, Error> {
        self.0
            .read()
            .await
            .get(token)
            .cloned()
            .ok_or_else(Error::forbidden)
    }
}
