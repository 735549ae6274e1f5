//! Intent routing for Holy Grail Chat.
//!
//! This crate provides:
//!
//! - **Workflow registry**: the static table of named business workflows
//!   via [`workflow`].
//! - **Intent matching**: literal phrase matching of user text to a workflow
//!   via [`matcher::IntentMatcher`].
//! - **Data-query classification**: trigger-word detection for questions
//!   about application data via [`classifier`].
//! - **Routing**: the combined decision of which handler a message goes to
//!   via [`router::route`].

pub mod classifier;
pub mod error;
pub mod matcher;
pub mod router;
pub mod workflow;

pub use classifier::{DATA_QUERY_TRIGGERS, is_data_query};
pub use error::{IntentError, Result};
pub use matcher::{INTENT_PHRASES, IntentMatcher, detect_workflow_intent};
pub use router::{Route, route};
pub use workflow::{
    WorkflowDefinition, WorkflowExecution, WorkflowId, WorkflowStatus, WorkflowSummary,
    list_available,
};
