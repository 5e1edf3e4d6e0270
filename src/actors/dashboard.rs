use crate::actors::call_result;
use crate::error::{ExplorerError, FailureKind, Result};
use crate::github::RepositoryApi;
use crate::messages::Messages;
use crate::store::RepositoryStore;
use crate::types::RepositoryRef;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Owns the repository list and the lookup form.
pub struct Dashboard;

pub struct DashboardArgs {
    pub store: RepositoryStore,
    pub api: Arc<dyn RepositoryApi>,
    pub messages: Messages,
}

pub struct DashboardState {
    store: RepositoryStore,
    api: Arc<dyn RepositoryApi>,
    messages: Messages,
    input: String,
    error: Option<String>,
    phase: LookupPhase,
    /// Token of the most recent submission; older outcomes leave the form alone.
    latest_submission: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupPhase {
    Idle,
    Fetching,
}

/// Snapshot of the list screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub repositories: Vec<RepositoryRef>,
    pub input: String,
    pub error: Option<String>,
    pub phase: LookupPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LookupOutcome {
    Added { repository: RepositoryRef },
    EmptyInput { message: String },
    Failed { kind: FailureKind, message: String },
    /// The lookup succeeded but the list could not be written back.
    PersistFailed { error: String },
}

#[derive(Debug)]
pub enum DashboardMessage {
    /// The user submitted the lookup form
    Submit(String, RpcReplyPort<LookupOutcome>),
    /// A lookup spawned by `Submit` came back
    LookupFinished {
        submission: u64,
        result: Result<RepositoryRef>,
        reply: RpcReplyPort<LookupOutcome>,
    },
    GetView(RpcReplyPort<DashboardView>),
}

#[ractor::async_trait]
impl Actor for Dashboard {
    type Msg = DashboardMessage;
    type State = DashboardState;
    type Arguments = DashboardArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> std::result::Result<Self::State, ActorProcessingErr> {
        debug!(
            repositories = args.store.repositories().len(),
            "dashboard starting"
        );

        Ok(DashboardState {
            store: args.store,
            api: args.api,
            messages: args.messages,
            input: String::new(),
            error: None,
            phase: LookupPhase::Idle,
            latest_submission: 0,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> std::result::Result<(), ActorProcessingErr> {
        match message {
            DashboardMessage::Submit(input, reply) => {
                state.latest_submission += 1;
                let submission = state.latest_submission;
                state.input = input;

                let full_name = state.input.trim().to_string();
                if full_name.is_empty() {
                    let message = state.messages.empty_input.to_string();
                    state.error = Some(message.clone());
                    state.phase = LookupPhase::Idle;
                    send_reply(reply, LookupOutcome::EmptyInput { message });
                    return Ok(());
                }

                state.phase = LookupPhase::Fetching;
                debug!(submission, %full_name, "looking up repository");

                let api = state.api.clone();
                tokio::spawn(async move {
                    let result = api.lookup_repository(&full_name).await;
                    if let Err(e) = myself.send_message(DashboardMessage::LookupFinished {
                        submission,
                        result,
                        reply,
                    }) {
                        error!("Failed to deliver lookup result for {}: {}", full_name, e);
                    }
                });
            }

            DashboardMessage::LookupFinished {
                submission,
                result,
                reply,
            } => {
                let is_latest = submission == state.latest_submission;
                let outcome = match result {
                    Ok(repository) => match state.store.add(repository.clone()).await {
                        Ok(list) => {
                            info!(
                                full_name = %repository.full_name,
                                repositories = list.len(),
                                "repository added"
                            );
                            if is_latest {
                                state.input.clear();
                                state.error = None;
                            }
                            LookupOutcome::Added { repository }
                        }
                        Err(e) => {
                            error!(full_name = %repository.full_name, "Failed to persist repository list: {}", e);
                            LookupOutcome::PersistFailed {
                                error: e.to_string(),
                            }
                        }
                    },
                    Err(e) => {
                        let kind = e.kind();
                        warn!(submission, ?kind, "repository lookup failed: {}", e);
                        let message = state.messages.for_failure(kind).to_string();
                        if is_latest {
                            state.error = Some(message.clone());
                        }
                        LookupOutcome::Failed { kind, message }
                    }
                };

                if is_latest {
                    state.phase = LookupPhase::Idle;
                } else {
                    debug!(submission, latest = state.latest_submission, "stale lookup left the form untouched");
                }
                send_reply(reply, outcome);
            }

            DashboardMessage::GetView(reply) => {
                send_reply(
                    reply,
                    DashboardView {
                        repositories: state.store.repositories().to_vec(),
                        input: state.input.clone(),
                        error: state.error.clone(),
                        phase: state.phase,
                        diagnostic: state.store.diagnostic().map(str::to_string),
                    },
                );
            }
        }

        Ok(())
    }
}

fn send_reply<T>(reply: RpcReplyPort<T>, value: T) {
    if !reply.is_closed() {
        let _ = reply.send(value);
    }
}

#[derive(Clone)]
pub struct DashboardHandle {
    actor: ActorRef<DashboardMessage>,
}

impl DashboardHandle {
    pub async fn spawn(args: DashboardArgs) -> Result<Self> {
        let (actor, _handle) = Actor::spawn(None, Dashboard, args)
            .await
            .map_err(|e| ExplorerError::Actor(format!("Failed to start dashboard: {}", e)))?;
        Ok(Self { actor })
    }

    /// Submit the lookup form and wait for that submission's outcome.
    pub async fn submit(&self, input: impl Into<String>) -> Result<LookupOutcome> {
        let input = input.into();
        call_result(
            "submit",
            self.actor
                .call(|reply| DashboardMessage::Submit(input, reply), None)
                .await,
        )
    }

    pub async fn view(&self) -> Result<DashboardView> {
        call_result(
            "dashboard view",
            self.actor.call(DashboardMessage::GetView, None).await,
        )
    }

    pub fn stop(&self) {
        self.actor.stop(Some("Shutdown requested".to_string()));
    }
}
