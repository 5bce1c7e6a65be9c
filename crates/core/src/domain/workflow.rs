use serde::{Deserialize, Serialize};

/// One macro unit of an automation workflow.
///
/// Steps are self-contained: a label, what the step does, and the
/// integrations it needs (e.g. `google-sheets`, `slack`, `openai`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub label: String,
    pub description: String,
    pub integrations: Vec<String>,
}

/// Ordered workflow produced by the designer agent. Step order is execution
/// order and must be preserved end to end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub steps: Vec<WorkflowStep>,
}

impl Workflow {
    pub fn new(steps: Vec<WorkflowStep>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl From<Vec<WorkflowStep>> for Workflow {
    fn from(steps: Vec<WorkflowStep>) -> Self {
        Self { steps }
    }
}
