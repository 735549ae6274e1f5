//! Workflow registry -- the static catalogue of named business workflows.
//!
//! A workflow is a human-described, ordered sequence of steps.  No step has
//! an executable binding yet: [`execute`] resolves the workflow and returns a
//! [`WorkflowExecution`] describing what *would* run, with status
//! [`WorkflowStatus::Ready`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{IntentError, Result};

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identifier of a registered workflow.
///
/// Serializes to the SCREAMING_SNAKE_CASE key (e.g. `"QUALIFY_LEAD"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowId {
    CreateLeadFromDm,
    GenerateViralPost,
    LaunchCampaign,
    QualifyLead,
}

impl WorkflowId {
    /// All identifiers in registry declaration order.
    pub const ALL: [WorkflowId; 4] = [
        WorkflowId::CreateLeadFromDm,
        WorkflowId::GenerateViralPost,
        WorkflowId::LaunchCampaign,
        WorkflowId::QualifyLead,
    ];

    /// The registry key for this workflow.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateLeadFromDm => "CREATE_LEAD_FROM_DM",
            Self::GenerateViralPost => "GENERATE_VIRAL_POST",
            Self::LaunchCampaign => "LAUNCH_CAMPAIGN",
            Self::QualifyLead => "QUALIFY_LEAD",
        }
    }

    /// The registry entry for this workflow.
    pub fn definition(self) -> &'static WorkflowDefinition {
        // `WORKFLOWS` is declared in the same order as `WorkflowId::ALL`.
        &WORKFLOWS[self as usize]
    }
}

impl fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowId {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self> {
        WorkflowId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| IntentError::UnknownWorkflow { key: s.to_owned() })
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

/// Immutable metadata for one workflow.
#[derive(Debug, Serialize)]
pub struct WorkflowDefinition {
    pub id: WorkflowId,
    /// Display name shown to users.
    pub name: &'static str,
    pub description: &'static str,
    /// Ordered, human-readable step descriptions.
    pub steps: &'static [&'static str],
    /// Tool bindings.  Always empty: steps are descriptive only.
    pub tools: &'static [&'static str],
}

static WORKFLOWS: [WorkflowDefinition; 4] = [
    WorkflowDefinition {
        id: WorkflowId::CreateLeadFromDm,
        name: "Create Lead from DM",
        description: "Extract lead info from a DM, create in system, and send follow-up",
        steps: &[
            "Parse DM content for contact information",
            "Look up existing leads in database",
            "Create new lead record",
            "Send automated response",
            "Log activity",
        ],
        tools: &[],
    },
    WorkflowDefinition {
        id: WorkflowId::GenerateViralPost,
        name: "Generate Viral Post",
        description: "Create expert copywriting post from lead magnet content using voice cartridge styling",
        steps: &[
            "Extract lead magnet insights",
            "Load voice cartridge style guide",
            "Generate 3 post variations",
            "Score for virality potential",
            "Return best option",
        ],
        tools: &[],
    },
    WorkflowDefinition {
        id: WorkflowId::LaunchCampaign,
        name: "Launch Multi-Channel Campaign",
        description: "Create and deploy campaign across LinkedIn, email, and SMS",
        steps: &[
            "Validate audience segment",
            "Create campaign in system",
            "Generate LinkedIn posts",
            "Set up email sequences",
            "Configure SMS follow-ups",
            "Monitor initial performance",
        ],
        tools: &[],
    },
    WorkflowDefinition {
        id: WorkflowId::QualifyLead,
        name: "Qualify Lead",
        description: "Multi-step lead scoring and qualification workflow",
        steps: &[
            "Retrieve lead data",
            "Check engagement history",
            "Score based on criteria",
            "Determine if qualified",
            "Route to appropriate team",
            "Send notification",
        ],
        tools: &[],
    },
];

/// Every registered workflow, in declaration order.
pub fn all() -> &'static [WorkflowDefinition] {
    &WORKFLOWS
}

/// Look up a workflow by its registry key (e.g. `"LAUNCH_CAMPAIGN"`).
pub fn lookup_key(key: &str) -> Option<&'static WorkflowDefinition> {
    key.parse::<WorkflowId>().ok().map(WorkflowId::definition)
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

/// Summary of a workflow for discovery listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    pub id: WorkflowId,
    pub name: String,
    pub description: String,
    /// Number of declared steps.
    pub steps: usize,
}

/// List every registered workflow in declaration order.
pub fn list_available() -> Vec<WorkflowSummary> {
    WORKFLOWS
        .iter()
        .map(|wf| WorkflowSummary {
            id: wf.id,
            name: wf.name.to_owned(),
            description: wf.description.to_owned(),
            steps: wf.steps.len(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Status reported for a resolved workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    /// Resolved and staged; no step has run.
    Ready,
}

/// The result of "executing" a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowExecution {
    /// Display name of the workflow.
    pub workflow: String,
    pub status: WorkflowStatus,
    pub steps: Vec<String>,
    pub message: String,
}

/// Message attached to every staged workflow.
pub const STAGED_MESSAGE: &str = "Workflow staged and ready; automated step execution is not enabled yet";

/// Resolve a workflow by key and stage it.
///
/// The declared steps are reported back but never run.
///
/// # Errors
///
/// Returns [`IntentError::UnknownWorkflow`] if `key` is not registered.
pub fn execute(key: &str, input: &serde_json::Value) -> Result<WorkflowExecution> {
    let workflow = lookup_key(key).ok_or_else(|| IntentError::UnknownWorkflow {
        key: key.to_owned(),
    })?;

    info!(
        workflow = %workflow.id,
        name = workflow.name,
        steps = workflow.steps.len(),
        "staging workflow"
    );
    debug!(steps = ?workflow.steps, input = %input, "workflow input");

    Ok(WorkflowExecution {
        workflow: workflow.name.to_owned(),
        status: WorkflowStatus::Ready,
        steps: workflow.steps.iter().map(|s| (*s).to_owned()).collect(),
        message: STAGED_MESSAGE.to_owned(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
