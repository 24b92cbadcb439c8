//! Operator prompt for the middle-seat decision.
//!
//! When a drop parks the session in
//! [`OrchestratorState::AwaitingMiddleDecision`], somebody has to say which of
//! the two classes takes the middle seats. The [`MiddleSeatPrompt`] trait hides
//! where that answer comes from:
//!
//! - [`TerminalPrompt`] asks on any `BufRead`/`Write` pair (stdin/stderr in the
//!   binary).
//! - [`ScriptedPrompt`] replays answers given up front with `--middle`, then
//!   hands over to another prompt once the script runs out.
//!
//! [`resolve_pending`] drives a prompt against a session until the decision is
//! applied or cancelled.
//!
//! [`OrchestratorState::AwaitingMiddleDecision`]: crate::application::session::OrchestratorState::AwaitingMiddleDecision

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use thiserror::Error;
use tracing::{info, warn};

use crate::application::session::{
    MiddleSeatReport, PendingMiddleSeat, SeatingSession, SessionError,
};

/// How many invalid answers [`resolve_pending`] tolerates before cancelling.
pub const MAX_ATTEMPTS: usize = 3;

/// Error type for prompting.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// The operator's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MiddleChoice {
    /// This class takes the middle seats.
    Middle(String),
    Cancel,
}

/// Source of middle-seat decisions.
#[cfg_attr(test, mockall::automock)]
pub trait MiddleSeatPrompt {
    fn choose_middle(&mut self, pending: &PendingMiddleSeat) -> Result<MiddleChoice, PromptError>;
}

// ── Terminal ────────────────────────────────────────────────────────────────

/// Interactive prompt over a line-oriented reader and writer.
///
/// Accepts `a`/`b` (either case) or an exact class name. An empty line or end
/// of input cancels. Anything else is asked again.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn interpret(answer: &str, pending: &PendingMiddleSeat) -> Option<MiddleChoice> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Some(MiddleChoice::Cancel);
        }
        if answer.eq_ignore_ascii_case("a") || answer == pending.class_a {
            return Some(MiddleChoice::Middle(pending.class_a.clone()));
        }
        if answer.eq_ignore_ascii_case("b") || answer == pending.class_b {
            return Some(MiddleChoice::Middle(pending.class_b.clone()));
        }
        None
    }
}

impl<R: BufRead, W: Write> MiddleSeatPrompt for TerminalPrompt<R, W> {
    fn choose_middle(&mut self, pending: &PendingMiddleSeat) -> Result<MiddleChoice, PromptError> {
        writeln!(
            self.output,
            "Hall {} already seats {} and you are adding {}.",
            pending.hall_id, pending.class_a, pending.class_b
        )?;
        loop {
            write!(
                self.output,
                "Which class takes the middle seat? [a] {}  [b] {}  (empty line cancels): ",
                pending.class_a, pending.class_b
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(MiddleChoice::Cancel);
            }
            match Self::interpret(&line, pending) {
                Some(choice) => return Ok(choice),
                None => writeln!(self.output, "Please answer a or b.")?,
            }
        }
    }
}

// ── Scripted ────────────────────────────────────────────────────────────────

/// Replays pre-recorded answers, then defers to `fallback`.
///
/// The answer `cancel` (any case) or an empty string cancels.
pub struct ScriptedPrompt<F> {
    answers: VecDeque<String>,
    fallback: F,
}

impl<F: MiddleSeatPrompt> ScriptedPrompt<F> {
    pub fn new<I>(answers: I, fallback: F) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            answers: answers.into_iter().collect(),
            fallback,
        }
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl<F: MiddleSeatPrompt> MiddleSeatPrompt for ScriptedPrompt<F> {
    fn choose_middle(&mut self, pending: &PendingMiddleSeat) -> Result<MiddleChoice, PromptError> {
        match self.answers.pop_front() {
            Some(answer) => {
                let answer = answer.trim();
                if answer.is_empty() || answer.eq_ignore_ascii_case("cancel") {
                    Ok(MiddleChoice::Cancel)
                } else {
                    Ok(MiddleChoice::Middle(answer.to_string()))
                }
            }
            None => self.fallback.choose_middle(pending),
        }
    }
}

// ── Driver ──────────────────────────────────────────────────────────────────

/// How a pending decision ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Decided(MiddleSeatReport),
    Cancelled(PendingMiddleSeat),
}

/// Asks `prompt` until the session's pending decision is applied or cancelled.
///
/// An answer naming neither class is retried up to [`MAX_ATTEMPTS`] times in
/// total; after that the drop is cancelled.
///
/// # Errors
///
/// - [`PromptError::Session`] with [`SessionError::NoPendingDecision`] if the
///   session is idle, or with the underlying error if the decision could not be
///   applied.
/// - [`PromptError::Io`] if the prompt itself fails.
pub fn resolve_pending<P>(
    session: &mut SeatingSession,
    prompt: &mut P,
) -> Result<Resolution, PromptError>
where
    P: MiddleSeatPrompt + ?Sized,
{
    for attempt in 1..=MAX_ATTEMPTS {
        let pending = session
            .pending()
            .cloned()
            .ok_or(SessionError::NoPendingDecision)?;

        match prompt.choose_middle(&pending)? {
            MiddleChoice::Cancel => return Ok(Resolution::Cancelled(session.cancel()?)),
            MiddleChoice::Middle(class) => match session.decide(&class) {
                Ok(report) => return Ok(Resolution::Decided(report)),
                Err(SessionError::InvalidMiddleClass { given, .. }) => {
                    warn!(attempt, given = %given, "answer names neither pending class");
                }
                Err(e) => return Err(e.into()),
            },
        }
    }

    let pending = session.cancel()?;
    info!(hall = %pending.hall_id, attempts = MAX_ATTEMPTS, "giving up on middle-seat decision");
    Ok(Resolution::Cancelled(pending))
}
