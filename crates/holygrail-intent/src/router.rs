//! Message routing decision.
//!
//! Combines the [`crate::matcher`] and [`crate::classifier`] into a single
//! decision.  A workflow match short-circuits: the classifier is only
//! consulted when no workflow phrase is present.

use serde::Serialize;

use crate::classifier::is_data_query;
use crate::matcher::detect_workflow_intent;
use crate::workflow::WorkflowId;

/// Which handler a user message should be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "workflow", rename_all = "snake_case")]
pub enum Route {
    /// A workflow phrase matched.
    Workflow(WorkflowId),
    /// The message looks like a question about application data.
    DataQuery,
    /// Neither; answer with the capability description.
    Capabilities,
}

/// Route a user message.
pub fn route(text: &str) -> Route {
    if let Some(workflow) = detect_workflow_intent(text) {
        tracing::debug!(workflow = %workflow, "routed to workflow");
        return Route::Workflow(workflow);
    }

    if is_data_query(text) {
        tracing::debug!("routed to data query");
        return Route::DataQuery;
    }

    tracing::debug!("no route matched, answering with capabilities");
    Route::Capabilities
}
