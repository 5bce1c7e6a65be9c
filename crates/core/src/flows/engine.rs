use thiserror::Error;

use crate::flows::states::{Stage, StageContext, TransitionOutcome};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StageTransitionError {
    #[error("transition from {from:?} to {to:?} is not defined")]
    Undefined { from: Stage, to: Stage },
    #[error("transition from {from:?} to {to:?} requires {requirement}")]
    GateNotSatisfied { from: Stage, to: Stage, requirement: &'static str },
}

/// Deterministic gate-keeper for stage transitions.
///
/// The selection agent proposes the next stage; this engine decides whether
/// the proposal is legal given the readiness flags. Returning to
/// `Understanding` or `Interface` is always allowed so a conversation can
/// never get stuck, which is also why the selection fallback defaults there.
#[derive(Clone, Debug, Default)]
pub struct StageFlow;

impl StageFlow {
    pub fn initial_stage(&self) -> Stage {
        Stage::Understanding
    }

    pub fn apply(
        &self,
        current: Stage,
        requested: Stage,
        context: &StageContext,
    ) -> Result<TransitionOutcome, StageTransitionError> {
        let outcome = TransitionOutcome { from: current, to: requested };

        // Clarification loops and safe restarts are never gated.
        if requested == current
            || matches!(requested, Stage::Understanding | Stage::Interface)
        {
            return Ok(outcome);
        }

        match (current, requested) {
            (Stage::Understanding | Stage::Interface, Stage::Design) => Ok(outcome),
            (Stage::Design, Stage::Development) => {
                if !context.is_workflow_design_approved {
                    return Err(StageTransitionError::GateNotSatisfied {
                        from: current,
                        to: requested,
                        requirement: "an approved workflow design",
                    });
                }
                if !context.do_we_have_enough_information_to_develop_workflow {
                    return Err(StageTransitionError::GateNotSatisfied {
                        from: current,
                        to: requested,
                        requirement: "enough information to develop the workflow",
                    });
                }
                Ok(outcome)
            }
            (Stage::Development, Stage::Run) => {
                if !context.is_workflow_build_approved {
                    return Err(StageTransitionError::GateNotSatisfied {
                        from: current,
                        to: requested,
                        requirement: "an approved workflow build",
                    });
                }
                Ok(outcome)
            }
            (from, to) => Err(StageTransitionError::Undefined { from, to }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StageFlow, StageTransitionError};
    use crate::flows::states::{Stage, StageContext};

    fn flow() -> StageFlow {
        StageFlow
    }

    #[test]
    fn understanding_moves_freely_to_interface_and_design() {
        let context = StageContext::default();
        let to_interface = flow()
            .apply(Stage::Understanding, Stage::Interface, &context)
            .expect("interface transition");
        assert_eq!(to_interface.to, Stage::Interface);

        let to_design = flow()
            .apply(Stage::Understanding, Stage::Design, &context)
            .expect("design transition");
        assert_eq!(to_design.to, Stage::Design);
    }

    #[test]
    fn development_requires_both_design_gates() {
        let mut context = StageContext::default();

        let blocked = flow().apply(Stage::Design, Stage::Development, &context);
        assert!(matches!(blocked, Err(StageTransitionError::GateNotSatisfied { .. })));

        context.is_workflow_design_approved = true;
        let still_blocked = flow().apply(Stage::Design, Stage::Development, &context);
        assert!(matches!(still_blocked, Err(StageTransitionError::GateNotSatisfied { .. })));

        context.do_we_have_enough_information_to_develop_workflow = true;
        let allowed = flow()
            .apply(Stage::Design, Stage::Development, &context)
            .expect("gated transition should pass with both flags");
        assert_eq!(allowed.to, Stage::Development);
    }

    #[test]
    fn run_requires_build_approval() {
        let mut context = StageContext::default();
        let blocked = flow().apply(Stage::Development, Stage::Run, &context);
        assert!(blocked.is_err());

        context.is_workflow_build_approved = true;
        let allowed = flow()
            .apply(Stage::Development, Stage::Run, &context)
            .expect("run transition should pass once build is approved");
        assert_eq!(allowed.to, Stage::Run);
    }

    #[test]
    fn restart_to_understanding_is_always_legal() {
        let context = StageContext::default();
        for from in [Stage::Interface, Stage::Design, Stage::Development, Stage::Run] {
            let outcome = flow()
                .apply(from, Stage::Understanding, &context)
                .expect("restart should never be gated");
            assert_eq!(outcome.to, Stage::Understanding);
        }
    }

    #[test]
    fn skipping_design_is_undefined() {
        let context = StageContext {
            is_workflow_design_approved: true,
            is_workflow_build_approved: true,
            do_we_have_enough_information_to_develop_workflow: true,
            do_we_have_enough_information_to_design_workflow: true,
            do_we_have_enough_information_to_run_workflow: true,
        };
        let result = flow().apply(Stage::Understanding, Stage::Run, &context);
        assert!(matches!(result, Err(StageTransitionError::Undefined { .. })));
    }
}
