//! Conversation controller.
//!
//! Owns all session state: the transcript, the input draft, the number of
//! accepted submissions, and whether an answer is outstanding. A submission
//! is split at its only suspension point: [`Controller::submit`] performs
//! the synchronous part and hands back the request to send, and
//! [`Controller::settle`] merges whatever the answer service produced.
//! [`Controller::ask`] composes the two for callers that can hold the
//! controller across the await.

use crate::answer::{AnswerError, AnswerService, AskRequest, AskResponse};
use crate::message::Message;
use crate::transcript::Transcript;
use crate::view;
use tracing::{debug, info, warn};

/// Maximum number of submissions accepted per session.
pub const MAX_SUBMISSIONS: u32 = 5;

/// Transcript text used for every failed answer.
pub const FAILURE_TEXT: &str = "Error contacting backend";

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The draft is empty or whitespace.
    EmptyDraft,
    /// [`MAX_SUBMISSIONS`] have already been accepted.
    LimitReached,
    /// A previous submission has not settled yet.
    AwaitingAnswer,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SkipReason::EmptyDraft => "question is empty",
            SkipReason::LimitReached => "submission limit reached",
            SkipReason::AwaitingAnswer => "previous question has not been answered",
        };
        f.write_str(reason)
    }
}

/// Result of calling [`Controller::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft was accepted; send this request and pass the result to
    /// [`Controller::settle`].
    Dispatched(AskRequest),
    /// Nothing changed.
    Ignored(SkipReason),
}

impl SubmitOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, SubmitOutcome::Dispatched(_))
    }
}

/// Session state for one conversation.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    transcript: Transcript,
    draft: String,
    submission_count: u32,
    pending: bool,
}

impl Controller {
    /// Start a session: empty transcript and draft, no submissions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the draft verbatim.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Accept the current draft as a question.
    ///
    /// Guards run in order: empty draft, submission limit, outstanding
    /// answer. A guarded call changes nothing. An accepted call appends the
    /// user message, clears the draft, marks the controller pending, and
    /// counts the submission.
    pub fn submit(&mut self) -> SubmitOutcome {
        let reason = if self.draft.trim().is_empty() {
            Some(SkipReason::EmptyDraft)
        } else if self.limit_reached() {
            Some(SkipReason::LimitReached)
        } else if self.pending {
            Some(SkipReason::AwaitingAnswer)
        } else {
            None
        };

        if let Some(reason) = reason {
            debug!(?reason, "submission ignored");
            return SubmitOutcome::Ignored(reason);
        }

        let question = std::mem::take(&mut self.draft);
        self.transcript.push(Message::user(question.clone()));
        self.pending = true;
        self.submission_count += 1;

        info!(
            submission = self.submission_count,
            limit = MAX_SUBMISSIONS,
            "question dispatched"
        );
        SubmitOutcome::Dispatched(AskRequest::new(question))
    }

    /// Merge the result of an outstanding request into the transcript.
    ///
    /// A success appends the answer and, when present and non-empty, the
    /// note right after it. A failure appends a single error message with
    /// [`FAILURE_TEXT`]; the underlying error is only logged. `pending` is
    /// cleared on both paths. A settlement with nothing outstanding is
    /// dropped.
    pub fn settle(&mut self, outcome: Result<AskResponse, AnswerError>) {
        if !self.pending {
            warn!("settlement received with no request outstanding");
            return;
        }

        let replies = match outcome {
            Ok(response) => {
                info!(has_note = response.note().is_some(), "answer received");
                answer_messages(response)
            }
            Err(err) => {
                warn!(error = %err, "answer request failed");
                vec![Message::error(FAILURE_TEXT)]
            }
        };

        self.pending = false;
        self.transcript.extend(replies);
    }

    /// Submit the draft and, if accepted, wait for `service` and settle.
    ///
    /// Dropping the returned future before it completes leaves the
    /// controller pending; in-flight requests cannot be cancelled.
    pub async fn ask(&mut self, service: &dyn AnswerService) -> SubmitOutcome {
        let outcome = self.submit();
        if let SubmitOutcome::Dispatched(request) = &outcome {
            let result = service.ask(request).await;
            self.settle(result);
        }
        outcome
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn submission_count(&self) -> u32 {
        self.submission_count
    }

    /// True between an accepted submission and its settlement.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// True once [`MAX_SUBMISSIONS`] submissions have been accepted.
    pub fn limit_reached(&self) -> bool {
        self.submission_count >= MAX_SUBMISSIONS
    }

    pub fn remaining_submissions(&self) -> u32 {
        MAX_SUBMISSIONS.saturating_sub(self.submission_count)
    }

    /// Whether [`Controller::submit`] would accept the current draft.
    pub fn can_submit(&self) -> bool {
        !self.pending && !self.limit_reached() && !self.draft.trim().is_empty()
    }

    /// The derived view to render, computed fresh from the transcript.
    pub fn visible_messages(&self) -> Vec<&Message> {
        view::visible_messages(self.transcript.as_slice())
    }
}

fn answer_messages(response: AskResponse) -> Vec<Message> {
    let note = response.note().map(Message::note);
    let mut messages = vec![Message::bot(response.answer)];
    messages.extend(note);
    messages
}
