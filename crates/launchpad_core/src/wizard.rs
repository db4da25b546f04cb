//! crates/launchpad_core/src/wizard.rs
//!
//! The idea validation wizard as an explicit state machine:
//! `Idea -> Refinement -> Analyzing -> Email -> Success`, with a fallback from a
//! failed refinement back to `Idea`.
//!
//! Every transition is a plain method that either moves the machine forward or
//! returns a `WizardError` and leaves the state untouched. Remote calls are split
//! into a "plan" step and an "apply" step so the machine can be driven without
//! any I/O; `refine_with` and `submit_with` glue the two together over an
//! `IdeaApi`.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::warn;

use crate::domain::{IdeaSubmission, RefinedIdea, SubmitIdeaResponse};
use crate::ports::{IdeaApi, PortError, PortResult};

pub const PROBLEM_PLACEHOLDER: &str = "The problem statement";
pub const AUDIENCE_PLACEHOLDER: &str = "The target audience";
/// Where the success screen's call-to-action points.
pub const WAITLIST_ANCHOR: &str = "#waitlist";

const ANALYSIS_SECONDS: i64 = 16;
const CAPTION_SWITCH_SECONDS: i64 = 8;
const SEARCHING_CAPTION: &str = "Searching discussions...";
const ANALYZING_CAPTION: &str = "Analyzing discussions...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Idea,
    Refinement,
    Analyzing,
    Email,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("cannot {action} during the {step:?} step")]
    InvalidTransition {
        step: WizardStep,
        action: &'static str,
    },
    #[error("Please describe your business idea")]
    MissingIdea,
    #[error("Please fill in both Problem Statement and Target Audience")]
    IncompleteRefinement,
    #[error("Please enter your email to receive the results")]
    MissingEmail,
    #[error("{0}")]
    Refinement(String),
    #[error("{0}")]
    Submission(String),
}

/// What `begin_refinement` decided to do with the idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefinementPlan {
    /// The idea was too vague; placeholders were applied and the wizard moved on.
    Skipped,
    /// The caller must fetch a refinement for this idea and hand the outcome to
    /// `apply_refinement`.
    Fetch(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisProgress {
    /// 0.5 percent per 100 ms, capped at 100.
    pub percent: f32,
    pub caption: &'static str,
    pub finished: bool,
}

#[derive(Debug, Clone)]
enum Stage {
    Idea { refining: bool },
    Refinement,
    Analyzing { started_at: DateTime<Utc> },
    Email,
    Success { message: String },
}

#[derive(Debug, Clone)]
pub struct IdeaWizard {
    stage: Stage,
    form: IdeaSubmission,
}

impl Default for IdeaWizard {
    fn default() -> Self {
        Self::new()
    }
}

/// How long the simulated analysis runs before asking for an email.
pub fn analysis_duration() -> TimeDelta {
    TimeDelta::seconds(ANALYSIS_SECONDS)
}

/// More than two words and at least ten characters.
pub fn is_understandable_idea(idea: &str) -> bool {
    idea.split_whitespace().count() > 2 && idea.chars().count() >= 10
}

impl IdeaWizard {
    pub fn new() -> Self {
        Self {
            stage: Stage::Idea { refining: false },
            form: IdeaSubmission::default(),
        }
    }

    pub fn step(&self) -> WizardStep {
        match self.stage {
            Stage::Idea { .. } => WizardStep::Idea,
            Stage::Refinement => WizardStep::Refinement,
            Stage::Analyzing { .. } => WizardStep::Analyzing,
            Stage::Email => WizardStep::Email,
            Stage::Success { .. } => WizardStep::Success,
        }
    }

    pub fn form(&self) -> &IdeaSubmission {
        &self.form
    }

    /// Whether a refinement fetch is in flight.
    pub fn is_refining(&self) -> bool {
        matches!(self.stage, Stage::Idea { refining: true })
    }

    pub fn success_message(&self) -> Option<&str> {
        match &self.stage {
            Stage::Success { message } => Some(message),
            _ => None,
        }
    }

    pub fn set_idea(&mut self, idea: &str) -> Result<(), WizardError> {
        self.expect_idle_idea("edit the idea")?;
        self.form.idea = idea.to_string();
        Ok(())
    }

    pub fn begin_refinement(&mut self) -> Result<RefinementPlan, WizardError> {
        self.expect_idle_idea("refine the idea")?;
        if self.form.idea.trim().is_empty() {
            return Err(WizardError::MissingIdea);
        }
        if !is_understandable_idea(&self.form.idea) {
            self.form.problem_statement = PROBLEM_PLACEHOLDER.to_string();
            self.form.target_audience = AUDIENCE_PLACEHOLDER.to_string();
            self.stage = Stage::Refinement;
            return Ok(RefinementPlan::Skipped);
        }
        self.stage = Stage::Idea { refining: true };
        Ok(RefinementPlan::Fetch(self.form.idea.clone()))
    }

    /// Consumes the outcome of the fetch requested by `begin_refinement`.
    /// A failure sends the wizard back to `Idea`.
    pub fn apply_refinement(
        &mut self,
        outcome: PortResult<RefinedIdea>,
    ) -> Result<(), WizardError> {
        if !self.is_refining() {
            return Err(self.invalid("apply a refinement"));
        }
        match outcome {
            Ok(refined) => {
                self.form.problem_statement = refined.problem_statement;
                self.form.target_audience = refined.target_audience;
                self.stage = Stage::Refinement;
                Ok(())
            }
            Err(err) => {
                self.stage = Stage::Idea { refining: false };
                Err(WizardError::Refinement(user_message(
                    err,
                    "Failed to refine idea. Please try again.",
                )))
            }
        }
    }

    pub async fn refine_with(&mut self, api: &dyn IdeaApi) -> Result<(), WizardError> {
        match self.begin_refinement()? {
            RefinementPlan::Skipped => Ok(()),
            RefinementPlan::Fetch(idea) => {
                let outcome = api.refine_idea(&idea).await;
                self.apply_refinement(outcome)
            }
        }
    }

    pub fn edit_problem_statement(&mut self, text: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::Refinement, "edit the problem statement")?;
        self.form.problem_statement = text.to_string();
        Ok(())
    }

    pub fn edit_target_audience(&mut self, text: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::Refinement, "edit the target audience")?;
        self.form.target_audience = text.to_string();
        Ok(())
    }

    /// Both refined fields must be filled in and differ from the placeholders.
    pub fn start_analysis(&mut self, now: DateTime<Utc>) -> Result<(), WizardError> {
        self.require_step(WizardStep::Refinement, "start the analysis")?;
        if !is_filled(&self.form.problem_statement, PROBLEM_PLACEHOLDER)
            || !is_filled(&self.form.target_audience, AUDIENCE_PLACEHOLDER)
        {
            return Err(WizardError::IncompleteRefinement);
        }
        self.stage = Stage::Analyzing { started_at: now };
        Ok(())
    }

    /// Advances the simulated analysis. Once `analysis_duration()` has passed the
    /// wizard moves on to `Email`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<AnalysisProgress, WizardError> {
        let Stage::Analyzing { started_at } = self.stage else {
            return Err(self.invalid("advance the analysis"));
        };
        let elapsed = (now - started_at).max(TimeDelta::zero());
        let finished = elapsed >= analysis_duration();
        if finished {
            self.stage = Stage::Email;
        }
        let steps = elapsed.num_milliseconds() / 100;
        Ok(AnalysisProgress {
            percent: (steps as f32 * 0.5).min(100.0),
            caption: if elapsed >= TimeDelta::seconds(CAPTION_SWITCH_SECONDS) {
                ANALYZING_CAPTION
            } else {
                SEARCHING_CAPTION
            },
            finished,
        })
    }

    pub fn set_email(&mut self, email: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::Email, "edit the email")?;
        self.form.email = email.to_string();
        Ok(())
    }

    /// The trimmed payload to send.
    pub fn submission(&self) -> Result<IdeaSubmission, WizardError> {
        self.require_step(WizardStep::Email, "submit")?;
        if self.form.email.trim().is_empty() {
            return Err(WizardError::MissingEmail);
        }
        Ok(IdeaSubmission {
            idea: self.form.idea.trim().to_string(),
            problem_statement: self.form.problem_statement.trim().to_string(),
            target_audience: self.form.target_audience.trim().to_string(),
            email: self.form.email.trim().to_string(),
        })
    }

    /// Consumes the submission outcome. On failure the wizard stays on `Email`
    /// so the user can retry.
    pub fn complete(
        &mut self,
        outcome: PortResult<SubmitIdeaResponse>,
    ) -> Result<String, WizardError> {
        self.require_step(WizardStep::Email, "complete the submission")?;
        match outcome {
            Ok(response) => {
                self.stage = Stage::Success {
                    message: response.message.clone(),
                };
                Ok(response.message)
            }
            Err(err) => Err(WizardError::Submission(user_message(
                err,
                "Failed to submit. Please try again.",
            ))),
        }
    }

    pub async fn submit_with(&mut self, api: &dyn IdeaApi) -> Result<String, WizardError> {
        let submission = self.submission()?;
        let outcome = api.submit_idea(&submission).await;
        self.complete(outcome)
    }

    fn require_step(&self, step: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step() == step && !self.is_refining() {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn expect_idle_idea(&self, action: &'static str) -> Result<(), WizardError> {
        self.require_step(WizardStep::Idea, action)
    }

    fn invalid(&self, action: &'static str) -> WizardError {
        WizardError::InvalidTransition {
            step: self.step(),
            action,
        }
    }
}

fn is_filled(value: &str, placeholder: &str) -> bool {
    !value.trim().is_empty() && value != placeholder
}

fn user_message(err: PortError, fallback: &str) -> String {
    match err {
        PortError::Rejected(message) if !message.trim().is_empty() => message,
        other => {
            warn!("Idea request failed: {}", other);
            fallback.to_string()
        }
    }
}
