use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use lectern_api::ContextId;
use lectern_engine::Thread;
use tokio::sync::RwLock;

/// Durable home of the threads, between the requests that load and change them
#[async_trait]
pub trait ThreadBackend: Send + Sync {
    async fn load(&self, context: ContextId) -> anyhow::Result<Option<Thread>>;
    async fn persist(&self, thread: &Thread) -> anyhow::Result<()>;
}

/// Keeps every thread in memory, serialized the same way a database would store it
#[derive(Debug, Default)]
pub struct MemoryBackend(RwLock<HashMap<ContextId, Vec<u8>>>);

#[async_trait]
impl ThreadBackend for MemoryBackend {
    async fn load(&self, context: ContextId) -> anyhow::Result<Option<Thread>> {
        match self.0.read().await.get(&context) {
            None => Ok(None),
            Some(json) => Ok(Some(
                serde_json::from_slice(json)
                    .with_context(|| format!("deserializing thread {context:?}"))?,
            )),
        }
    }

    async fn persist(&self, thread: &Thread) -> anyhow::Result<()> {
        let json = serde_json::to_vec(thread)
            .with_context(|| format!("serializing thread {:?}", thread.context))?;
        self.0.write().await.insert(thread.context, json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lectern_api::{Actor, Role, UserId, Uuid};
    use lectern_engine::{SystemClock, ThreadStore};

    use super::*;

    #[tokio::test]
    async fn persisted_threads_load_back() {
        let backend = MemoryBackend::default();
        let context = ContextId(Uuid::new_v4());
        assert!(backend.load(context).await.unwrap().is_none());

        let alice = Actor::new(UserId(Uuid::new_v4()), "alice", Role::Learner);
        let mut store = ThreadStore::new(Thread::new(context), SystemClock);
        let c = store.add_comment(&alice, "hello").unwrap();
        store.reply(&alice, &c.id, "replying to myself").unwrap();
        store.toggle_like(&alice, &c.id).unwrap();
        store.report(&alice, &c.id, "testing").unwrap();
        backend.persist(store.thread()).await.unwrap();

        let loaded = backend.load(context).await.unwrap().unwrap();
        assert_eq!(&loaded, store.thread());
        assert!(backend.load(ContextId(Uuid::new_v4())).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deep_reply_chains_load_back() {
        let backend = MemoryBackend::default();
        let context = ContextId(Uuid::new_v4());
        let alice = Actor::new(UserId(Uuid::new_v4()), "alice", Role::Learner);
        let mut store = ThreadStore::new(Thread::new(context), SystemClock);
        let mut parent = store.add_comment(&alice, "0").unwrap().id;
        for i in 1..250 {
            parent = store.reply(&alice, &parent, &i.to_string()).unwrap().id;
        }
        backend.persist(store.thread()).await.unwrap();

        let loaded = backend.load(context).await.unwrap().unwrap();
        assert_eq!(loaded.len(), 250);
        assert_eq!(loaded.get(&parent).unwrap().body, "249");
        assert_eq!(&loaded, store.thread());
    }
}
