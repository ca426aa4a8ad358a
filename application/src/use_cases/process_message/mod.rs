//! Process Message use case
//!
//! The agent loop: turns one user message into a bounded sequence of
//! completion rounds, dispatching requested tool calls between rounds.
//!
//! ```text
//! Init ─▶ AwaitingCompletion ─┬─ Final(text) ──────────▶ Done
//!               ▲             └─ ToolRequest{calls} ─▶ AwaitingToolResults
//!               └──────────── results appended ◀───────────────┘
//! ```
//!
//! | Stop condition                       | Outcome            | Reply                    |
//! |--------------------------------------|--------------------|--------------------------|
//! | Model answers                        | `Completed`        | model text               |
//! | `max_rounds` completions, still tools| `LoopExceeded`     | degraded explanation     |
//! | Auth failure / retries exhausted     | `CompletionFailed` | degraded explanation     |
//! | Cancellation token fired             | `Cancelled`        | cancellation notice      |
//! | Store failure / corrupt history      | `Internal`         | degraded explanation     |
//!
//! The loop never returns an error to its caller.

mod types;

pub use types::{ProcessMessageError, ProcessMessageInput, ProcessMessageOutput};

use crate::config::ExecutionParams;
use crate::ports::agent_progress::{AgentProgressNotifier, NoAgentProgress};
use crate::ports::completion_gateway::{CompletionError, CompletionGateway};
use crate::ports::conversation_store::{ConversationStore, StoreError};
use crate::ports::tool_endpoint::ToolEndpoint;
use crate::use_cases::dispatch_tool::DispatchToolUseCase;
use crate::use_cases::session_locks::SessionLocks;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use taskpilot_domain::{
    AgentPromptTemplate, CompletionResult, Conversation, ConversationId, DomainError, LoopOutcome,
    LoopRun, Message, ToolCall, ToolRegistry, ToolResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Use case for processing one user message through the agent loop
pub struct ProcessMessageUseCase<
    G: CompletionGateway + 'static,
    E: ToolEndpoint + 'static,
    S: ConversationStore + ?Sized + 'static = NoConversationStore,
> {
    gateway: Arc<G>,
    dispatcher: DispatchToolUseCase<E>,
    registry: Arc<ToolRegistry>,
    store: Option<Arc<S>>,
    locks: SessionLocks,
    params: ExecutionParams,
    system_prompt: String,
    cancellation_token: Option<CancellationToken>,
}

impl<G, E, S> Clone for ProcessMessageUseCase<G, E, S>
where
    G: CompletionGateway + 'static,
    E: ToolEndpoint + 'static,
    S: ConversationStore + ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            dispatcher: self.dispatcher.clone(),
            registry: self.registry.clone(),
            store: self.store.clone(),
            locks: self.locks.clone(),
            params: self.params.clone(),
            system_prompt: self.system_prompt.clone(),
            cancellation_token: self.cancellation_token.clone(),
        }
    }
}

/// Store used when conversations are never persisted
pub struct NoConversationStore;

#[async_trait]
impl ConversationStore for NoConversationStore {
    async fn load(&self, _id: &ConversationId) -> Result<Vec<Message>, StoreError> {
        Ok(Vec::new())
    }

    async fn append(&self, _id: &ConversationId, _messages: &[Message]) -> Result<(), StoreError> {
        Ok(())
    }
}

impl<G: CompletionGateway + 'static, E: ToolEndpoint + 'static>
    ProcessMessageUseCase<G, E, NoConversationStore>
{
    /// Single-turn use case: every message starts a fresh conversation.
    pub fn new(
        gateway: Arc<G>,
        endpoint: Arc<E>,
        registry: Arc<ToolRegistry>,
        params: ExecutionParams,
    ) -> Self {
        Self::build(gateway, endpoint, None, registry, params)
    }
}

impl<G: CompletionGateway + 'static, E: ToolEndpoint + 'static, S: ConversationStore + ?Sized + 'static>
    ProcessMessageUseCase<G, E, S>
{
    /// Multi-turn use case: messages carrying a conversation id continue
    /// the stored conversation.
    pub fn with_conversation_store(
        gateway: Arc<G>,
        endpoint: Arc<E>,
        store: Arc<S>,
        registry: Arc<ToolRegistry>,
        params: ExecutionParams,
    ) -> Self {
        Self::build(gateway, endpoint, Some(store), registry, params)
    }

    fn build(
        gateway: Arc<G>,
        endpoint: Arc<E>,
        store: Option<Arc<S>>,
        registry: Arc<ToolRegistry>,
        params: ExecutionParams,
    ) -> Self {
        Self {
            dispatcher: DispatchToolUseCase::new(endpoint, registry.clone(), &params),
            system_prompt: AgentPromptTemplate::system(&registry),
            gateway,
            registry,
            store,
            locks: SessionLocks::new(),
            params,
            cancellation_token: None,
        }
    }

    /// Replace the default system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Share a lock table with other use case instances using the same store
    pub fn with_session_locks(mut self, locks: SessionLocks) -> Self {
        self.locks = locks;
        self
    }

    pub fn params(&self) -> &ExecutionParams {
        &self.params
    }

    /// Process a single-turn message and return the reply text.
    pub async fn process_message(&self, user_text: &str) -> String {
        self.execute(ProcessMessageInput::new(user_text)).await.reply
    }

    pub async fn execute(&self, input: ProcessMessageInput) -> ProcessMessageOutput {
        self.execute_with_progress(input, &NoAgentProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: ProcessMessageInput,
        progress: &dyn AgentProgressNotifier,
    ) -> ProcessMessageOutput {
        let conversation_id = match (input.conversation_id, &self.store) {
            (Some(id), Some(_)) => Some(id),
            (Some(id), None) => {
                warn!(conversation_id = %id, "No conversation store configured, running single-turn");
                None
            }
            (None, _) => None,
        };

        // Held for the whole run, including the final save
        let _guard = match &conversation_id {
            Some(id) => Some(self.locks.acquire(id).await),
            None => None,
        };

        info!(
            conversation_id = conversation_id.as_ref().map(|id| id.as_str()),
            max_rounds = self.params.max_rounds,
            "Processing message"
        );

        let mut run = LoopRun::new(self.params.max_rounds);
        let mut transcript = Transcript::new(conversation_id);

        let result = match self.open(&mut transcript).await {
            Ok(()) => self
                .run_loop(&mut transcript, &mut run, input.message, progress)
                .await,
            Err(e) => Err(e),
        };
        let result = match result {
            Ok(done) => self.save(&mut transcript).await.map(|()| done).map_err(Into::into),
            Err(e) => Err(e),
        };

        let (outcome, reply) = result.unwrap_or_else(|e| {
            error!(error = %e, "Agent loop aborted");
            (
                LoopOutcome::Internal,
                AgentPromptTemplate::internal_error_reply(&e.to_string()),
            )
        });

        if let Err(e) = run.finish(outcome) {
            debug!(error = %e, "Run already in a terminal phase");
        }
        progress.on_phase_change(run.phase());
        progress.on_complete(outcome, run.rounds());

        info!(
            outcome = %outcome,
            rounds = run.rounds(),
            tool_calls = run.tool_calls(),
            "Message processed"
        );

        ProcessMessageOutput {
            reply,
            outcome,
            rounds: run.rounds(),
            tool_calls: run.tool_calls(),
            conversation: transcript.conversation,
        }
    }

    /// Load stored history, or start a new conversation with the system prompt.
    async fn open(&self, transcript: &mut Transcript) -> Result<(), ProcessMessageError> {
        let stored = match (&transcript.id, &self.store) {
            (Some(id), Some(store)) => store.load(id).await?,
            _ => Vec::new(),
        };

        if stored.is_empty() {
            transcript.record(vec![Message::system(self.system_prompt.clone())])?;
        } else {
            debug!(messages = stored.len(), "Loaded conversation history");
            transcript.conversation =
                Conversation::from_messages(stored).map_err(|e| StoreError::Corrupt {
                    id: transcript
                        .id
                        .as_ref()
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }

    async fn run_loop(
        &self,
        transcript: &mut Transcript,
        run: &mut LoopRun,
        message: String,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<(LoopOutcome, String), ProcessMessageError> {
        transcript.record(vec![Message::user(message)])?;

        loop {
            if self.is_cancelled() {
                info!(rounds = run.rounds(), "Cancelled between rounds");
                return Ok(cancelled());
            }

            if !run.has_rounds_left() {
                warn!(max_rounds = run.max_rounds(), "Round limit reached, stopping");
                return Ok((
                    LoopOutcome::LoopExceeded,
                    AgentPromptTemplate::loop_exceeded_reply(run.max_rounds()),
                ));
            }

            let round = run.start_round()?;
            progress.on_phase_change(run.phase());
            progress.on_round_start(round, run.max_rounds());
            debug!(round, messages = transcript.conversation.len(), "Requesting completion");

            let Some(completion) = self
                .complete_cancellable(&transcript.conversation, round, progress)
                .await
            else {
                info!(round, "Cancelled while awaiting completion");
                return Ok(cancelled());
            };

            match completion {
                Err(e) => {
                    error!(round, error = %e, "Completion failed");
                    return Ok((
                        LoopOutcome::CompletionFailed,
                        AgentPromptTemplate::completion_failed_reply(&e.to_string()),
                    ));
                }
                Ok(CompletionResult::Final(text)) => {
                    debug!(round, chars = text.len(), "Final answer received");
                    transcript.record(vec![Message::assistant(text.clone())])?;
                    self.save(transcript).await?;
                    return Ok((LoopOutcome::Completed, text));
                }
                Ok(CompletionResult::ToolRequest { calls, text }) => {
                    let calls = normalize_call_ids(calls, round);
                    info!(round, count = calls.len(), "Model requested tool calls");
                    run.tools_requested(calls.len())?;
                    progress.on_phase_change(run.phase());

                    // Recorded before dispatch: a request the conversation rejects
                    // never reaches the endpoint. Saved together with its results.
                    transcript.record(vec![Message {
                        content: text,
                        ..Message::assistant_tool_calls(calls.clone())
                    }])?;

                    // A started round always finishes; cancellation is checked afterwards
                    let results = self.dispatch_round(&calls, progress).await;

                    transcript.record(results.into_iter().map(Message::from).collect())?;
                    self.save(transcript).await?;
                }
            }
        }
    }

    /// Completion with retries, abandoned as soon as the token fires.
    async fn complete_cancellable(
        &self,
        conversation: &Conversation,
        round: u32,
        progress: &dyn AgentProgressNotifier,
    ) -> Option<Result<CompletionResult, CompletionError>> {
        let completion = self.complete_with_retry(conversation, round, progress);
        match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => None,
                result = completion => Some(result),
            },
            None => Some(completion.await),
        }
    }

    async fn complete_with_retry(
        &self,
        conversation: &Conversation,
        round: u32,
        progress: &dyn AgentProgressNotifier,
    ) -> Result<CompletionResult, CompletionError> {
        let policy = self.params.completion_retry;
        let timeout = self.params.completion_timeout;
        let tools = self.registry.definitions();
        let mut attempt: u32 = 0;

        loop {
            let outcome =
                match tokio::time::timeout(timeout, self.gateway.complete(conversation, tools))
                    .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => Err(CompletionError::Timeout(timeout)),
                };

            match outcome {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                    attempt += 1;
                    warn!(
                        round,
                        attempt,
                        max_retries = policy.max_retries,
                        model = self.gateway.model_name(),
                        "Completion failed, retrying: {}",
                        e
                    );
                    progress.on_completion_retry(attempt, policy.max_retries, &e.to_string());
                    tokio::time::sleep(policy.delay_for(attempt - 1)).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Dispatch a round's calls concurrently; results keep the call order.
    async fn dispatch_round(
        &self,
        calls: &[ToolCall],
        progress: &dyn AgentProgressNotifier,
    ) -> Vec<ToolResult> {
        let futures = calls.iter().map(|call| {
            progress.on_tool_call(call);
            self.dispatcher.invoke(call, progress)
        });
        let results = futures::future::join_all(futures).await;

        for result in &results {
            if result.is_error {
                debug!(
                    tool = %result.tool_name,
                    tool_call_id = %result.tool_call_id,
                    "Tool error fed back to model"
                );
            }
            progress.on_tool_result(result);
        }
        results
    }

    /// Persist everything recorded since the last save as one batch.
    async fn save(&self, transcript: &mut Transcript) -> Result<(), StoreError> {
        if let (Some(id), Some(store)) = (&transcript.id, &self.store)
            && !transcript.unsaved.is_empty()
        {
            store.append(id, &transcript.unsaved).await?;
            debug!(conversation_id = %id, messages = transcript.unsaved.len(), "Saved conversation batch");
        }
        transcript.unsaved.clear();
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

/// In-memory view of a run's conversation plus the not-yet-persisted tail.
struct Transcript {
    id: Option<ConversationId>,
    conversation: Conversation,
    unsaved: Vec<Message>,
}

impl Transcript {
    fn new(id: Option<ConversationId>) -> Self {
        Self {
            id,
            conversation: Conversation::new(),
            unsaved: Vec::new(),
        }
    }

    /// Append a batch atomically to the conversation and queue it for saving.
    fn record(&mut self, batch: Vec<Message>) -> Result<(), DomainError> {
        self.conversation.extend(batch.iter().cloned())?;
        self.unsaved.extend(batch);
        Ok(())
    }
}

fn cancelled() -> (LoopOutcome, String) {
    (
        LoopOutcome::Cancelled,
        AgentPromptTemplate::cancelled_reply().to_string(),
    )
}

/// Give every call a non-empty id that is unique within the round.
///
/// Replacement ids never collide with an id the model used elsewhere in the
/// same response.
fn normalize_call_ids(calls: Vec<ToolCall>, round: u32) -> Vec<ToolCall> {
    let mut taken: HashSet<String> = calls.iter().map(|call| call.id.clone()).collect();
    let mut kept: HashSet<String> = HashSet::new();
    calls
        .into_iter()
        .enumerate()
        .map(|(index, mut call)| {
            if call.id.is_empty() || kept.contains(&call.id) {
                let replacement = free_call_id(&taken, round, index);
                debug!(original = %call.id, replacement = %replacement, "Reassigned tool call id");
                taken.insert(replacement.clone());
                call.id = replacement;
            }
            kept.insert(call.id.clone());
            call
        })
        .collect()
}

fn free_call_id(taken: &HashSet<String>, round: u32, index: usize) -> String {
    let base = format!("call_r{}_{}", round, index);
    if !taken.contains(&base) {
        return base;
    }
    let mut suffix = 1;
    loop {
        let candidate = format!("{}_{}", base, suffix);
        if !taken.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
