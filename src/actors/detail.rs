use crate::actors::call_result;
use crate::error::{ExplorerError, Result};
use crate::github::RepositoryApi;
use crate::types::{Issue, RepositoryDetail};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Owns the transient state of the repository detail screen.
pub struct RepositoryDetailActor;

pub struct DetailArgs {
    pub api: Arc<dyn RepositoryApi>,
    pub updates: watch::Sender<DetailView>,
}

pub struct DetailState {
    api: Arc<dyn RepositoryApi>,
    view: DetailView,
    updates: watch::Sender<DetailView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl SectionStatus {
    pub fn is_settled(self) -> bool {
        matches!(self, SectionStatus::Loaded | SectionStatus::Failed)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetailView {
    /// Bumped on every activation; results from older activations are dropped.
    pub generation: u64,
    pub full_name: Option<String>,
    pub repository: Option<RepositoryDetail>,
    pub issues: Vec<Issue>,
    pub repository_status: SectionStatus,
    pub issues_status: SectionStatus,
}

impl DetailView {
    pub fn is_settled(&self) -> bool {
        self.repository_status.is_settled() && self.issues_status.is_settled()
    }
}

#[derive(Debug)]
pub enum DetailMessage {
    /// Activate the screen for a repository; replies with the activation's generation
    Open {
        full_name: String,
        force: bool,
        reply: RpcReplyPort<u64>,
    },
    RepositoryLoaded {
        generation: u64,
        result: Result<RepositoryDetail>,
    },
    IssuesLoaded {
        generation: u64,
        result: Result<Vec<Issue>>,
    },
    GetView(RpcReplyPort<DetailView>),
}

#[ractor::async_trait]
impl Actor for RepositoryDetailActor {
    type Msg = DetailMessage;
    type State = DetailState;
    type Arguments = DetailArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> std::result::Result<Self::State, ActorProcessingErr> {
        Ok(DetailState {
            api: args.api,
            view: DetailView::default(),
            updates: args.updates,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        match message {
            DetailMessage::Open {
                full_name,
                force,
                reply,
            } => {
                if !force && state.view.full_name.as_deref() == Some(full_name.as_str()) {
                    let _ = reply.send(state.view.generation);
                    return Ok(());
                }

                let generation = state.view.generation + 1;
                info!(generation, %full_name, "opening repository");

                state.view = DetailView {
                    generation,
                    full_name: Some(full_name.clone()),
                    repository_status: SectionStatus::Loading,
                    issues_status: SectionStatus::Loading,
                    ..DetailView::default()
                };
                state.updates.send_replace(state.view.clone());

                // Both requests run independently; neither waits for the other
                let api = state.api.clone();
                let actor = myself.clone();
                let name = full_name.clone();
                tokio::spawn(async move {
                    let result = api.repository(&name).await;
                    if actor
                        .send_message(DetailMessage::RepositoryLoaded { generation, result })
                        .is_err()
                    {
                        debug!(generation, "detail screen gone before repository arrived");
                    }
                });

                let api = state.api.clone();
                tokio::spawn(async move {
                    let result = api.issues(&full_name).await;
                    if myself
                        .send_message(DetailMessage::IssuesLoaded { generation, result })
                        .is_err()
                    {
                        debug!(generation, "detail screen gone before issues arrived");
                    }
                });

                let _ = reply.send(generation);
            }

            DetailMessage::RepositoryLoaded { generation, result } => {
                if generation != state.view.generation {
                    debug!(generation, current = state.view.generation, "discarding stale repository response");
                    return Ok(());
                }
                match result {
                    Ok(repository) => {
                        state.view.repository = Some(repository);
                        state.view.repository_status = SectionStatus::Loaded;
                    }
                    Err(e) => {
                        warn!(generation, full_name = ?state.view.full_name, "repository request failed: {}", e);
                        state.view.repository_status = SectionStatus::Failed;
                    }
                }
                state.updates.send_replace(state.view.clone());
            }

            DetailMessage::IssuesLoaded { generation, result } => {
                if generation != state.view.generation {
                    debug!(generation, current = state.view.generation, "discarding stale issues response");
                    return Ok(());
                }
                match result {
                    Ok(issues) => {
                        state.view.issues = issues;
                        state.view.issues_status = SectionStatus::Loaded;
                    }
                    Err(e) => {
                        warn!(generation, full_name = ?state.view.full_name, "issues request failed: {}", e);
                        state.view.issues_status = SectionStatus::Failed;
                    }
                }
                state.updates.send_replace(state.view.clone());
            }

            DetailMessage::GetView(reply) => {
                if !reply.is_closed() {
                    let _ = reply.send(state.view.clone());
                }
            }
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct DetailHandle {
    actor: ActorRef<DetailMessage>,
    updates: watch::Receiver<DetailView>,
}

impl DetailHandle {
    pub async fn spawn(api: Arc<dyn RepositoryApi>) -> Result<Self> {
        let (sender, updates) = watch::channel(DetailView::default());
        let args = DetailArgs {
            api,
            updates: sender,
        };

        let (actor, _handle) = Actor::spawn(None, RepositoryDetailActor, args)
            .await
            .map_err(|e| ExplorerError::Actor(format!("Failed to start detail screen: {}", e)))?;
        Ok(Self { actor, updates })
    }

    /// Activate the screen for `full_name`. Re-opening the repository already
    /// on screen keeps its state.
    pub async fn open(&self, full_name: impl Into<String>) -> Result<u64> {
        self.open_with(full_name.into(), false).await
    }

    /// Activate the screen and refetch even if `full_name` is already shown.
    pub async fn reload(&self, full_name: impl Into<String>) -> Result<u64> {
        self.open_with(full_name.into(), true).await
    }

    async fn open_with(&self, full_name: String, force: bool) -> Result<u64> {
        call_result(
            "open repository",
            self.actor
                .call(
                    |reply| DetailMessage::Open {
                        full_name,
                        force,
                        reply,
                    },
                    None,
                )
                .await,
        )
    }

    pub async fn view(&self) -> Result<DetailView> {
        call_result("detail view", self.actor.call(DetailMessage::GetView, None).await)
    }

    /// Receiver that sees every change to the view as it happens.
    pub fn subscribe(&self) -> watch::Receiver<DetailView> {
        self.updates.clone()
    }

    /// Wait until both requests of activation `generation` have completed.
    pub async fn settled(&self, generation: u64) -> Result<DetailView> {
        let mut updates = self.subscribe();
        loop {
            {
                let view = updates.borrow_and_update();
                if view.generation > generation {
                    return Err(ExplorerError::Actor(format!(
                        "activation {} was replaced by {}",
                        generation, view.generation
                    )));
                }
                if view.generation == generation && view.is_settled() {
                    return Ok(view.clone());
                }
            }
            updates
                .changed()
                .await
                .map_err(|_| ExplorerError::Actor("detail screen stopped".to_string()))?;
        }
    }

    pub fn stop(&self) {
        self.actor.stop(Some("Shutdown requested".to_string()));
    }
}
