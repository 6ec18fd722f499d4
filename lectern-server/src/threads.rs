use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use lectern_api::{Actor, ContextId, Intent, Outcome, SortOrder, ThreadView};
use lectern_engine::{Limits, SystemClock, Thread, ThreadStore};
use tokio::sync::{Mutex, OnceCell, RwLock};

use crate::{Error, ThreadBackend};

type SharedStore = Arc<Mutex<ThreadStore<SystemClock>>>;

/// Every thread currently hosted by this server
///
/// All intents on one context go through that context's mutex, so that
/// changing and persisting a thread is a single critical section. A context
/// is loaded at most once, without holding up the other contexts.
#[derive(Clone)]
pub struct Threads {
    stores: Arc<RwLock<HashMap<ContextId, Arc<OnceCell<SharedStore>>>>>,
    backend: Arc<dyn ThreadBackend>,
    limits: Limits,
}

impl Threads {
    pub fn new(backend: Arc<dyn ThreadBackend>, limits: Limits) -> Threads {
        Threads {
            stores: Arc::new(RwLock::new(HashMap::new())),
            backend,
            limits,
        }
    }

    async fn slot_for(&self, context: ContextId) -> Arc<OnceCell<SharedStore>> {
        if let Some(slot) = self.stores.read().await.get(&context) {
            return slot.clone();
        }
        self.stores.write().await.entry(context).or_default().clone()
    }

    async fn store_for(&self, context: ContextId) -> Result<SharedStore, Error> {
        let slot = self.slot_for(context).await;
        // a failed load leaves the slot empty, for the next request to retry
        let store = slot
            .get_or_try_init(|| async {
                let thread = self
                    .backend
                    .load(context)
                    .await
                    .with_context(|| format!("loading thread {context:?}"))?
                    .unwrap_or_else(|| Thread::new(context));
                tracing::debug!(?context, num_comments = thread.len(), "hosting thread");
                let store = ThreadStore::new(thread, SystemClock).with_limits(self.limits);
                Ok::<_, Error>(Arc::new(Mutex::new(store)))
            })
            .await?;
        Ok(store.clone())
    }

    pub async fn submit(
        &self,
        context: ContextId,
        actor: &Actor,
        intent: Intent,
    ) -> Result<Outcome, Error> {
        let store = self.store_for(context).await?;
        let mut store = store.lock().await;
        // the hosted thread only changes once the backend has the new one
        let mut next = store.clone();
        let outcome = next.apply(actor, intent)?;
        self.backend
            .persist(next.thread())
            .await
            .with_context(|| format!("persisting thread {context:?}"))?;
        *store = next;
        Ok(outcome)
    }

    pub async fn view(
        &self,
        context: ContextId,
        actor: &Actor,
        order: SortOrder,
    ) -> Result<ThreadView, Error> {
        let store = self.store_for(context).await?;
        let store = store.lock().await;
        Ok(store.view(actor, order))
    }

    /// The flagged comments of `context`, each with its replies
    pub async fn flagged(&self, context: ContextId, actor: &Actor) -> Result<ThreadView, Error> {
        let store = self.store_for(context).await?;
        let store = store.lock().await;
        Ok(ThreadView {
            context,
            comments: store.flagged(actor)?,
        })
    }
}
