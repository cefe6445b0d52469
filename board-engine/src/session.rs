//! Board session
//!
//! Runs a [`ContentEngine`] in its own task and feeds it operations
//! through a bounded queue, one at a time, in arrival order. Concurrent
//! callers therefore never compute against a stale mirror.
//! Dropping every handle closes the queue and stops the worker.

use std::sync::Arc;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Category, CategoryId, OwnerId, Topic, TopicId};
use tokio::sync::{mpsc, oneshot};

use crate::config::SessionConfig;
use crate::engine::{BoardSnapshot, CategoryAdded, ContentEngine, SessionState, SnapshotHandle};
use crate::store::ContentStore;

type Reply<T> = oneshot::Sender<AppResult<T>>;

/// Operations accepted by the session worker
enum Command {
    Load { owner: OwnerId, reply: Reply<()> },
    Teardown { reply: Reply<()> },
    Normalize { reply: Reply<usize> },
    AddCategory { name: String, reply: Reply<CategoryAdded> },
    RenameCategory { id: CategoryId, name: String, reply: Reply<Category> },
    DeleteCategory { id: CategoryId, reply: Reply<usize> },
    ReorderCategories { ids: Vec<CategoryId>, reply: Reply<()> },
    AddTopic { category_id: CategoryId, title: String, reply: Reply<Topic> },
    RenameTopic { id: TopicId, title: String, reply: Reply<Topic> },
    ToggleCompletion { id: TopicId, reply: Reply<Topic> },
    DeleteTopic { id: TopicId, reply: Reply<()> },
    MoveTopic { id: TopicId, target_category_id: CategoryId, target_index: i32, reply: Reply<()> },
    ReorderTopics { category_id: CategoryId, ids: Vec<TopicId>, reply: Reply<()> },
}

/// Cloneable handle to a running board session
#[derive(Clone)]
pub struct BoardSession {
    tx: mpsc::Sender<Command>,
    snapshot: SnapshotHandle,
}

impl std::fmt::Debug for BoardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("BoardSession")
            .field("state", &snapshot.state)
            .field("owner", &snapshot.owner)
            .field("closed", &self.tx.is_closed())
            .finish()
    }
}

impl BoardSession {
    /// Spawn the worker on the current tokio runtime
    pub fn spawn<S: ContentStore + 'static>(store: S, config: SessionConfig) -> Self {
        let engine = ContentEngine::new(store);
        let snapshot = engine.snapshot_handle();
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));

        tokio::spawn(SessionWorker { engine }.run(rx));

        Self { tx, snapshot }
    }

    /// Latest published board state; never waits for the queue
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn state(&self) -> SessionState {
        self.snapshot().state
    }

    pub async fn load(&self, owner: OwnerId) -> AppResult<()> {
        self.request(|reply| Command::Load { owner, reply }).await
    }

    pub async fn teardown(&self) -> AppResult<()> {
        self.request(|reply| Command::Teardown { reply }).await
    }

    pub async fn normalize_orders(&self) -> AppResult<usize> {
        self.request(|reply| Command::Normalize { reply }).await
    }

    pub async fn add_category(&self, name: impl Into<String>) -> AppResult<CategoryAdded> {
        let name = name.into();
        self.request(|reply| Command::AddCategory { name, reply }).await
    }

    pub async fn rename_category(
        &self,
        id: CategoryId,
        name: impl Into<String>,
    ) -> AppResult<Category> {
        let name = name.into();
        self.request(|reply| Command::RenameCategory { id, name, reply })
            .await
    }

    pub async fn delete_category(&self, id: CategoryId) -> AppResult<usize> {
        self.request(|reply| Command::DeleteCategory { id, reply }).await
    }

    pub async fn reorder_categories(&self, ids: Vec<CategoryId>) -> AppResult<()> {
        self.request(|reply| Command::ReorderCategories { ids, reply })
            .await
    }

    pub async fn add_topic(
        &self,
        category_id: CategoryId,
        title: impl Into<String>,
    ) -> AppResult<Topic> {
        let title = title.into();
        self.request(|reply| Command::AddTopic {
            category_id,
            title,
            reply,
        })
        .await
    }

    pub async fn rename_topic(&self, id: TopicId, title: impl Into<String>) -> AppResult<Topic> {
        let title = title.into();
        self.request(|reply| Command::RenameTopic { id, title, reply })
            .await
    }

    pub async fn toggle_completion(&self, id: TopicId) -> AppResult<Topic> {
        self.request(|reply| Command::ToggleCompletion { id, reply })
            .await
    }

    pub async fn delete_topic(&self, id: TopicId) -> AppResult<()> {
        self.request(|reply| Command::DeleteTopic { id, reply }).await
    }

    pub async fn move_topic(
        &self,
        id: TopicId,
        target_category_id: CategoryId,
        target_index: i32,
    ) -> AppResult<()> {
        self.request(|reply| Command::MoveTopic {
            id,
            target_category_id,
            target_index,
            reply,
        })
        .await
    }

    pub async fn reorder_topics_within_category(
        &self,
        category_id: CategoryId,
        ids: Vec<TopicId>,
    ) -> AppResult<()> {
        self.request(|reply| Command::ReorderTopics {
            category_id,
            ids,
            reply,
        })
        .await
    }

    /// Enqueue a command and wait for its reply
    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> Command) -> AppResult<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| AppError::new(ErrorCode::SessionClosed))?;
        rx.await
            .map_err(|_| AppError::new(ErrorCode::SessionClosed))?
    }
}

// =============================================================================
// Worker
// =============================================================================

struct SessionWorker<S: ContentStore> {
    engine: ContentEngine<S>,
}

impl<S: ContentStore> SessionWorker<S> {
    /// Run until every handle is dropped
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        tracing::info!("Board session worker started");

        while let Some(command) = rx.recv().await {
            self.handle(command).await;
        }

        self.engine.teardown();
        tracing::info!("Board session channel closed, worker stopping");
    }

    async fn handle(&mut self, command: Command) {
        let engine = &mut self.engine;
        // a dropped receiver only means the caller stopped waiting
        match command {
            Command::Load { owner, reply } => {
                let _ = reply.send(engine.load(owner).await);
            }
            Command::Teardown { reply } => {
                engine.teardown();
                let _ = reply.send(Ok(()));
            }
            Command::Normalize { reply } => {
                let _ = reply.send(engine.normalize_orders().await);
            }
            Command::AddCategory { name, reply } => {
                let _ = reply.send(engine.add_category(&name).await);
            }
            Command::RenameCategory { id, name, reply } => {
                let _ = reply.send(engine.rename_category(id, &name).await);
            }
            Command::DeleteCategory { id, reply } => {
                let _ = reply.send(engine.delete_category(id).await);
            }
            Command::ReorderCategories { ids, reply } => {
                let _ = reply.send(engine.reorder_categories(&ids).await);
            }
            Command::AddTopic {
                category_id,
                title,
                reply,
            } => {
                let _ = reply.send(engine.add_topic(category_id, &title).await);
            }
            Command::RenameTopic { id, title, reply } => {
                let _ = reply.send(engine.rename_topic(id, &title).await);
            }
            Command::ToggleCompletion { id, reply } => {
                let _ = reply.send(engine.toggle_completion(id).await);
            }
            Command::DeleteTopic { id, reply } => {
                let _ = reply.send(engine.delete_topic(id).await);
            }
            Command::MoveTopic {
                id,
                target_category_id,
                target_index,
                reply,
            } => {
                let _ = reply.send(engine.move_topic(id, target_category_id, target_index).await);
            }
            Command::ReorderTopics {
                category_id,
                ids,
                reply,
            } => {
                let _ = reply.send(
                    engine
                        .reorder_topics_within_category(category_id, &ids)
                        .await,
                );
            }
        }
    }
}
