//! Converse use case.
//!
//! The façade the request layer calls for a chat exchange: resolve which
//! credential and model to use, replay the session transcript to the
//! provider with the new message, append the exchange, return the reply.
//!
//! The completion path never fails from the caller's perspective. Provider
//! problems are downgraded into stable, human-readable reply strings so the
//! conversation always returns turn-taking text; internally the outcome is
//! tagged so tests and observability can tell a real reply from a degraded
//! one without string matching. Credential save and model listing do NOT
//! share this policy; those fail loudly in their own use cases.

use crate::config::ChatParams;
use crate::ports::account_store::AccountStore;
use crate::ports::chat_log::{ChatLog, ChatRecord, NoChatLog};
use crate::ports::credential_vault::CredentialVault;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::session_store::SessionStore;
use parley_domain::credential::{self, StoredChoice};
use parley_domain::{ModelId, Turn, truncate_str};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reply when no credential is available from any source.
const NO_KEY_REPLY: &str = "Error: No API key configured. Please add your Groq API key.";
/// Reply when the provider rejects the credential mid-conversation.
const BAD_KEY_REPLY: &str = "Error: Invalid API key. Please check your Groq API key.";
/// Reply when the provider throttles the credential.
const RATE_LIMIT_REPLY: &str =
    "Error: Rate limit exceeded. Please wait a moment and try again.";
/// Reply when the stored credential cannot be decrypted.
const UNREADABLE_KEY_REPLY: &str =
    "Error: Your saved API key could not be read. Please re-enter it.";
/// Reply when the completion call exceeds its deadline.
const TIMEOUT_REPLY: &str = "Error: The model took too long to respond. Please try again.";

/// Why a conversation turn was degraded instead of answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftFailureKind {
    NoCredential,
    CredentialUnreadable,
    Unauthorized,
    RateLimited,
    Provider,
    Network,
    Timeout,
}

/// Tagged result of one conversation turn.
///
/// Both variants carry renderable text; [`into_reply`](Self::into_reply)
/// collapses to the string contract the request layer relies on.
#[derive(Debug, Clone)]
pub enum ConverseOutcome {
    /// The provider answered; the exchange was appended to the session.
    Reply(String),
    /// The turn failed softly; the transcript was left untouched.
    Degraded {
        kind: SoftFailureKind,
        reply: String,
    },
}

impl ConverseOutcome {
    pub fn reply(&self) -> &str {
        match self {
            ConverseOutcome::Reply(text) => text,
            ConverseOutcome::Degraded { reply, .. } => reply,
        }
    }

    pub fn into_reply(self) -> String {
        match self {
            ConverseOutcome::Reply(text) => text,
            ConverseOutcome::Degraded { reply, .. } => reply,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ConverseOutcome::Degraded { .. })
    }
}

/// Input for the [`ConverseUseCase`].
#[derive(Debug, Clone)]
pub struct ConverseInput {
    /// Authenticated user, trusted as-is from the identity collaborator.
    pub user_id: String,
    /// Conversation thread; callers usually derive this from the user id.
    pub session_id: String,
    /// The new user message.
    pub message: String,
    /// Already-decrypted credential supplied by the caller, bypassing the
    /// stored one.
    pub explicit_credential: Option<String>,
    /// Model chosen by the caller, bypassing the stored preference.
    pub explicit_model: Option<ModelId>,
}

impl ConverseInput {
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            session_id: session_id.into(),
            message: message.into(),
            explicit_credential: None,
            explicit_model: None,
        }
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.explicit_credential = Some(credential.into());
        self
    }

    pub fn with_model(mut self, model: ModelId) -> Self {
        self.explicit_model = Some(model);
        self
    }
}

/// Use case for running one conversation turn.
pub struct ConverseUseCase {
    gateway: Arc<dyn LlmGateway>,
    vault: Arc<dyn CredentialVault>,
    accounts: Arc<dyn AccountStore>,
    sessions: Arc<SessionStore>,
    chat_log: Arc<dyn ChatLog>,
    params: ChatParams,
    /// Process-wide fallback credential, configured at deployment time.
    default_credential: Option<String>,
}

impl ConverseUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        vault: Arc<dyn CredentialVault>,
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            gateway,
            vault,
            accounts,
            sessions,
            chat_log: Arc::new(NoChatLog),
            params: ChatParams::default(),
            default_credential: None,
        }
    }

    /// Attach a chat log for durable exchange records.
    pub fn with_chat_log(mut self, chat_log: Arc<dyn ChatLog>) -> Self {
        self.chat_log = chat_log;
        self
    }

    pub fn with_params(mut self, params: ChatParams) -> Self {
        self.params = params;
        self
    }

    /// Set the deployment-wide fallback credential.
    pub fn with_default_credential(mut self, credential: Option<String>) -> Self {
        self.default_credential = credential;
        self
    }

    /// Run one turn and return renderable reply text, degraded or not.
    pub async fn respond(&self, input: ConverseInput) -> String {
        self.respond_detailed(input).await.into_reply()
    }

    /// Run one turn, keeping the outcome tag.
    pub async fn respond_detailed(&self, input: ConverseInput) -> ConverseOutcome {
        debug!(
            user_id = %input.user_id,
            session_id = %input.session_id,
            "conversation turn: {}",
            truncate_str(&input.message, 80)
        );

        let stored = match self.stored_choice(&input).await {
            Ok(stored) => stored,
            Err(outcome) => return outcome,
        };

        let resolved = match credential::resolve(
            input.explicit_credential.clone(),
            input.explicit_model.clone(),
            stored,
            self.default_credential.clone(),
        ) {
            Ok(resolved) => resolved,
            Err(_) => {
                warn!(user_id = %input.user_id, "no credential available for turn");
                return ConverseOutcome::Degraded {
                    kind: SoftFailureKind::NoCredential,
                    reply: NO_KEY_REPLY.to_string(),
                };
            }
        };

        // Snapshot the transcript before the network call; the per-session
        // lock is never held across provider I/O.
        let transcript = self.sessions.get_or_create(&input.session_id).await;
        let history: Vec<Turn> = {
            let guard = transcript.lock().await;
            guard.last_turns(self.params.keep_last_turns).to_vec()
        };

        let result = self
            .complete_with_deadline(&history, &input.message, &resolved.credential, &resolved.model)
            .await;

        match result {
            Ok(reply) => {
                // Strictly user-then-assistant, under one lock scope so a
                // racing turn cannot interleave the pair.
                {
                    let mut guard = transcript.lock().await;
                    guard.push_user(&input.message);
                    guard.push_assistant(&reply);
                }

                info!(
                    session_id = %input.session_id,
                    model = %resolved.model,
                    "completion ok: {}",
                    truncate_str(&reply, 80)
                );
                self.chat_log
                    .save(ChatRecord::new(&input.user_id, &input.message, &reply));

                ConverseOutcome::Reply(reply)
            }
            Err(e) => {
                let (kind, reply) = degrade(e);
                warn!(
                    session_id = %input.session_id,
                    ?kind,
                    "completion degraded: {}",
                    reply
                );
                ConverseOutcome::Degraded { kind, reply }
            }
        }
    }

    /// Drop a session's conversation memory. Returns whether one existed.
    pub async fn clear_session(&self, session_id: &str) -> bool {
        self.sessions.clear(session_id).await
    }

    /// Fetch and decrypt the user's stored credential configuration.
    ///
    /// Skipped entirely when the caller supplied both explicit values.
    /// Store failures degrade to "nothing stored" so the default
    /// credential still gets a chance. The stored blob is decrypted only
    /// when no explicit credential was supplied: an explicit credential
    /// wins outright, so an unreadable blob must not cost the turn. When
    /// the stored credential is actually needed and unreadable, that is a
    /// user-visible condition and short-circuits.
    async fn stored_choice(&self, input: &ConverseInput) -> Result<StoredChoice, ConverseOutcome> {
        if input.explicit_credential.is_some() && input.explicit_model.is_some() {
            return Ok(StoredChoice::default());
        }

        let record = match self.accounts.get(&input.user_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(user_id = %input.user_id, "account lookup failed: {}", e);
                None
            }
        };

        let Some(record) = record else {
            return Ok(StoredChoice::default());
        };

        let credential = if input.explicit_credential.is_some() {
            None
        } else {
            match &record.encrypted_key {
                Some(blob) => match self.vault.decrypt(blob) {
                    Ok(plaintext) => Some(plaintext),
                    Err(e) => {
                        warn!(user_id = %input.user_id, "stored credential unreadable: {}", e);
                        return Err(ConverseOutcome::Degraded {
                            kind: SoftFailureKind::CredentialUnreadable,
                            reply: UNREADABLE_KEY_REPLY.to_string(),
                        });
                    }
                },
                None => None,
            }
        };

        Ok(StoredChoice {
            credential,
            model: record.selected_model,
        })
    }

    async fn complete_with_deadline(
        &self,
        history: &[Turn],
        message: &str,
        api_key: &str,
        model: &ModelId,
    ) -> Result<String, GatewayError> {
        let call = self.gateway.complete(
            &self.params.system_prompt,
            history,
            message,
            api_key,
            model,
        );
        match self.params.completion_timeout {
            Some(deadline) => match tokio::time::timeout(deadline, call).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout),
            },
            None => call.await,
        }
    }
}

/// Map a gateway failure to its outcome tag and stable reply string.
fn degrade(error: GatewayError) -> (SoftFailureKind, String) {
    match error {
        GatewayError::Unauthorized => (SoftFailureKind::Unauthorized, BAD_KEY_REPLY.to_string()),
        GatewayError::RateLimited => (SoftFailureKind::RateLimited, RATE_LIMIT_REPLY.to_string()),
        GatewayError::Timeout => (SoftFailureKind::Timeout, TIMEOUT_REPLY.to_string()),
        GatewayError::Provider(detail) => {
            (SoftFailureKind::Provider, format!("Error: {}", detail))
        }
        GatewayError::Network(detail) => (SoftFailureKind::Network, format!("Error: {}", detail)),
    }
}
