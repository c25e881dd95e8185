use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;

use super::last_result::LastResultStore;
use super::render::{plan_delivery, render_history, render_report, Delivery, HISTORY_PAGE_SIZE};
use super::state::SessionStore;
use super::texts;
use super::transport::{
    ChatTransport, InboundEvent, Menu, MessageRef, CALLBACK_LIST_HISTORY, CALLBACK_NEW_ANALYSIS,
    CALLBACK_SAVE_ANALYSIS,
};
use crate::agents::errors::AgentError;
use crate::agents::orchestrator::Orchestrator;
use crate::domain::repositories::AnalysisRepository;
use crate::domain::session::SessionState;

/// Deadline of one background analysis, independent of the triggering update
pub const DEFAULT_BACKGROUND_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// How long shutdown waits for running analyses before aborting them
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy)]
pub struct HandlerConfig {
    pub analysis_timeout: Duration,
    pub history_page_size: i64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            analysis_timeout: DEFAULT_BACKGROUND_TIMEOUT,
            history_page_size: HISTORY_PAGE_SIZE,
        }
    }
}

/// Background analyses and the users they belong to
#[derive(Default)]
struct BackgroundTasks {
    set: JoinSet<()>,
    in_flight: HashSet<i64>,
}

/// Reacts to user actions and drives the per-user session state
///
/// Cheap to clone; every clone shares the same stores and task set.
#[derive(Clone)]
pub struct RequestHandler {
    transport: Arc<dyn ChatTransport>,
    repository: Arc<dyn AnalysisRepository>,
    orchestrator: Arc<Orchestrator>,
    sessions: Arc<dyn SessionStore>,
    last_results: Arc<dyn LastResultStore>,
    tasks: Arc<Mutex<BackgroundTasks>>,
    config: HandlerConfig,
}

impl RequestHandler {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        repository: Arc<dyn AnalysisRepository>,
        orchestrator: Arc<Orchestrator>,
        sessions: Arc<dyn SessionStore>,
        last_results: Arc<dyn LastResultStore>,
        config: HandlerConfig,
    ) -> Self {
        Self {
            transport,
            repository,
            orchestrator,
            sessions,
            last_results,
            tasks: Arc::new(Mutex::new(BackgroundTasks::default())),
            config,
        }
    }

    /// Process one inbound event. Failures are reported to the user and
    /// logged, never returned.
    pub async fn handle(&self, event: InboundEvent) {
        tracing::debug!(user_id = event.user_id(), ?event, "Inbound event");

        match event {
            InboundEvent::Command {
                user_id,
                chat_id,
                command,
            } => match command.as_str() {
                "start" => {
                    self.send(chat_id, texts::GREETING, Some(Menu::Main)).await;
                }
                "new" => self.ask_for_idea(user_id, chat_id).await,
                "list" => self.show_history(chat_id).await,
                "cancel" => {
                    self.sessions.set(user_id, SessionState::Idle);
                    self.send(chat_id, texts::CANCELLED, None).await;
                }
                _ => {
                    self.send(chat_id, texts::UNKNOWN_COMMAND, None).await;
                }
            },

            InboundEvent::Text {
                user_id,
                chat_id,
                text,
            } => {
                let label = text.trim();
                if texts::NEW_ANALYSIS_LABELS.contains(&label) {
                    self.ask_for_idea(user_id, chat_id).await;
                } else if texts::HISTORY_LABELS.contains(&label) {
                    self.show_history(chat_id).await;
                } else {
                    self.submit_idea(user_id, chat_id, text).await;
                }
            }

            InboundEvent::Callback {
                user_id,
                chat_id,
                callback_id,
                data,
            } => {
                match data.as_str() {
                    CALLBACK_NEW_ANALYSIS => self.ask_for_idea(user_id, chat_id).await,
                    CALLBACK_SAVE_ANALYSIS => self.save_last_analysis(user_id, chat_id).await,
                    CALLBACK_LIST_HISTORY => self.show_history(chat_id).await,
                    other => tracing::debug!(user_id, data = other, "Unknown callback"),
                }

                if let Err(e) = self.transport.answer_callback(&callback_id).await {
                    tracing::warn!(error = %e, "Failed to answer callback");
                }
            }
        }
    }

    /// Current session state of `user_id`
    pub fn state(&self, user_id: i64) -> SessionState {
        self.sessions.get(user_id)
    }

    /// Number of analyses currently running
    pub fn in_flight(&self) -> usize {
        self.lock_tasks().in_flight.len()
    }

    /// Wait up to `grace` for running analyses, then abort the rest
    pub async fn shutdown(&self, grace: Duration) {
        let mut set = std::mem::take(&mut self.lock_tasks().set);
        if set.is_empty() {
            return;
        }

        tracing::info!(running = set.len(), "Waiting for background analyses");
        let drained = tokio::time::timeout(grace, async {
            while set.join_next().await.is_some() {}
        })
        .await;

        if drained.is_err() {
            tracing::warn!(remaining = set.len(), "Aborting unfinished analyses");
            set.shutdown().await;
            self.lock_tasks().in_flight.clear();
        }
    }

    async fn ask_for_idea(&self, user_id: i64, chat_id: i64) {
        self.sessions.set(user_id, SessionState::WaitingForIdea);
        self.send(chat_id, texts::ASK_FOR_IDEA, None).await;
    }

    async fn submit_idea(&self, user_id: i64, chat_id: i64, idea: String) {
        match self.sessions.get(user_id) {
            SessionState::Processing => {
                self.send(chat_id, texts::ALREADY_PROCESSING, None).await;
                return;
            }
            state if !state.accepts_idea() => {
                self.send(chat_id, texts::PRESS_NEW_ANALYSIS, Some(Menu::Main))
                    .await;
                return;
            }
            _ => {}
        }

        // A cancelled-then-restarted session may still have a run in flight.
        if !self.reserve(user_id) {
            self.send(chat_id, texts::ALREADY_PROCESSING, None).await;
            return;
        }

        self.sessions.set(user_id, SessionState::Processing);
        let placeholder = self.send(chat_id, texts::ANALYSIS_STARTED, None).await;

        let handler = self.clone();
        self.spawn_reserved(user_id, async move {
            handler
                .run_in_background(user_id, chat_id, idea, placeholder)
                .await;
        });
        tracing::info!(user_id, "Analysis started");
    }

    /// Claim the single analysis slot of `user_id`
    fn reserve(&self, user_id: i64) -> bool {
        let mut tasks = self.lock_tasks();
        while tasks.set.try_join_next().is_some() {}
        tasks.in_flight.insert(user_id)
    }

    /// Run `task` in the background, releasing the slot claimed by
    /// [`Self::reserve`] once it finishes
    fn spawn_reserved<F>(&self, user_id: i64, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let registry = Arc::clone(&self.tasks);
        self.lock_tasks().set.spawn(async move {
            task.await;
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .in_flight
                .remove(&user_id);
        });
    }

    async fn run_in_background(
        &self,
        user_id: i64,
        chat_id: i64,
        idea: String,
        placeholder: Option<MessageRef>,
    ) {
        let deadline = self.config.analysis_timeout;
        let result = tokio::time::timeout(deadline, self.orchestrator.run_analysis(&idea, user_id))
            .await
            .unwrap_or(Err(AgentError::Timeout(deadline)));

        match result {
            Ok(analysis) => {
                let report = render_report(&analysis);
                self.last_results.put(user_id, analysis);
                self.finish(user_id, SessionState::HasLastResult);
                tracing::info!(user_id, report_chars = report.chars().count(), "Analysis complete");
                self.deliver_report(chat_id, placeholder, report).await;
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Analysis failed");
                self.finish(user_id, SessionState::Idle);
                match placeholder {
                    Some(message) => self.edit(message, texts::ANALYSIS_FAILED, None).await,
                    None => {
                        self.send(chat_id, texts::ANALYSIS_FAILED, None).await;
                    }
                }
            }
        }
    }

    /// Leave `Processing` for `next`, unless the user already moved on
    fn finish(&self, user_id: i64, next: SessionState) {
        if !self
            .sessions
            .transition(user_id, SessionState::Processing, next)
        {
            tracing::debug!(
                user_id,
                state = %self.sessions.get(user_id),
                "Session changed during analysis, keeping it"
            );
        }
    }

    async fn deliver_report(&self, chat_id: i64, placeholder: Option<MessageRef>, report: String) {
        match plan_delivery(report) {
            Delivery::Edit(text) => match placeholder {
                Some(message) => self.edit(message, &text, Some(Menu::Main)).await,
                None => {
                    self.send(chat_id, &text, Some(Menu::Main)).await;
                }
            },
            Delivery::Chunks(parts) => {
                if let Some(message) = placeholder {
                    if let Err(e) = self.transport.delete_message(message).await {
                        tracing::warn!(error = %e, "Failed to delete placeholder");
                    }
                }
                let last = parts.len().saturating_sub(1);
                for (i, part) in parts.iter().enumerate() {
                    let menu = (i == last).then_some(Menu::Main);
                    self.send(chat_id, part, menu).await;
                }
            }
        }
    }

    async fn save_last_analysis(&self, user_id: i64, chat_id: i64) {
        let Some(latest) = self.last_results.get(user_id) else {
            self.send(chat_id, texts::NOTHING_TO_SAVE, None).await;
            return;
        };

        if latest.is_persisted() {
            self.send(chat_id, texts::SAVED, None).await;
            return;
        }

        let mut analysis = latest.clone();
        match self.repository.create(&mut analysis).await {
            Ok(()) => {
                tracing::info!(user_id, analysis_id = analysis.id, "Analysis saved");
                // Keep a newer result if one arrived while saving.
                if self.last_results.get(user_id).as_ref() == Some(&latest) {
                    self.last_results.put(user_id, analysis);
                }
                self.send(chat_id, texts::SAVED, None).await;
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "Failed to save analysis");
                self.send(chat_id, texts::SAVE_FAILED, None).await;
            }
        }
    }

    async fn show_history(&self, chat_id: i64) {
        match self.repository.list(self.config.history_page_size, 0).await {
            Ok(analyses) => {
                self.send(chat_id, &render_history(&analyses), None).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to list analyses");
                self.send(chat_id, texts::HISTORY_FAILED, None).await;
            }
        }
    }

    async fn send(&self, chat_id: i64, text: &str, menu: Option<Menu>) -> Option<MessageRef> {
        match self.transport.send_message(chat_id, text, menu).await {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(chat_id, error = %e, "Failed to send message");
                None
            }
        }
    }

    async fn edit(&self, message: MessageRef, text: &str, menu: Option<Menu>) {
        if let Err(e) = self.transport.edit_message(message, text, menu).await {
            tracing::warn!(chat_id = message.chat_id, error = %e, "Failed to edit message");
        }
    }

    fn lock_tasks(&self) -> MutexGuard<'_, BackgroundTasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
