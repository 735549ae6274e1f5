//! Workflow intent matcher.
//!
//! Resolves free-form user text to a [`WorkflowId`] by literal, case-insensitive
//! substring matching against a fixed phrase table.  When several phrases
//! occur in the text, the phrase declared **earliest** in [`INTENT_PHRASES`]
//! wins -- not the longest, and not the leftmost in the text.
//!
//! # Example
//!
//! ```rust
//! # use holygrail_intent::{IntentMatcher, WorkflowId};
//! let matcher = IntentMatcher::new();
//! assert_eq!(
//!     matcher.detect("Please CREATE LEAD from this DM"),
//!     Some(WorkflowId::CreateLeadFromDm),
//! );
//! assert_eq!(matcher.detect("hello"), None);
//! ```

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;

use crate::workflow::WorkflowId;

/// Phrase -> workflow table, in match-priority order.  Phrases are lower case.
pub const INTENT_PHRASES: &[(&str, WorkflowId)] = &[
    ("create lead", WorkflowId::CreateLeadFromDm),
    ("add lead", WorkflowId::CreateLeadFromDm),
    ("new lead from", WorkflowId::CreateLeadFromDm),
    ("extract lead", WorkflowId::CreateLeadFromDm),
    ("generate post", WorkflowId::GenerateViralPost),
    ("write post", WorkflowId::GenerateViralPost),
    ("create post", WorkflowId::GenerateViralPost),
    ("viral post", WorkflowId::GenerateViralPost),
    ("expert copywriting", WorkflowId::GenerateViralPost),
    ("launch campaign", WorkflowId::LaunchCampaign),
    ("create campaign", WorkflowId::LaunchCampaign),
    ("multi-channel", WorkflowId::LaunchCampaign),
    ("deploy campaign", WorkflowId::LaunchCampaign),
    ("qualify lead", WorkflowId::QualifyLead),
    ("score lead", WorkflowId::QualifyLead),
    ("lead scoring", WorkflowId::QualifyLead),
    ("rank leads", WorkflowId::QualifyLead),
];

static DEFAULT_MATCHER: LazyLock<IntentMatcher> = LazyLock::new(IntentMatcher::new);

/// Detect a workflow intent using the process-wide default matcher.
pub fn detect_workflow_intent(text: &str) -> Option<WorkflowId> {
    DEFAULT_MATCHER.detect(text)
}

/// Phrase-table matcher backed by an Aho-Corasick automaton.
///
/// Immutable after construction, so it is `Send + Sync` and can be shared
/// freely.
#[derive(Debug)]
pub struct IntentMatcher {
    phrases: Vec<(String, WorkflowId)>,
    /// `None` only if the automaton failed to build; matching then falls
    /// back to a linear scan with identical results.
    automaton: Option<AhoCorasick>,
}

impl IntentMatcher {
    /// Build a matcher over [`INTENT_PHRASES`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_phrases(INTENT_PHRASES.iter().map(|(p, id)| (*p, *id)))
    }

    /// Build a matcher over a custom phrase table.  Iteration order is the
    /// match priority.
    pub fn with_phrases<'a>(phrases: impl IntoIterator<Item = (&'a str, WorkflowId)>) -> Self {
        let phrases: Vec<(String, WorkflowId)> = phrases
            .into_iter()
            .map(|(p, id)| (p.to_lowercase(), id))
            .collect();

        let automaton = match AhoCorasick::new(phrases.iter().map(|(p, _)| p.as_str())) {
            Ok(ac) => Some(ac),
            Err(e) => {
                tracing::error!(error = %e, "failed to build phrase automaton, using linear scan");
                None
            }
        };

        Self { phrases, automaton }
    }

    /// Return the workflow of the earliest-declared phrase occurring in
    /// `text`, or `None`.
    pub fn detect(&self, text: &str) -> Option<WorkflowId> {
        let lowered = text.to_lowercase();

        let index = match &self.automaton {
            Some(ac) => ac
                .find_overlapping_iter(&lowered)
                .map(|mat| mat.pattern().as_usize())
                .min(),
            None => self
                .phrases
                .iter()
                .position(|(phrase, _)| lowered.contains(phrase.as_str())),
        }?;

        let (phrase, workflow) = &self.phrases[index];
        tracing::debug!(phrase = %phrase, workflow = %workflow, "workflow intent matched");
        Some(*workflow)
    }

    /// Number of registered phrases.
    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }
}

impl Default for IntentMatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
