//! Lifecycle enums stored as TEXT columns, and the transition rules between
//! their values.
//!
//! Each enum exposes an `ALL` list of wire values so DTO schemas can declare
//! enumerated-membership constraints from the same source of truth.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $all:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        /// Every wire value, in declaration order.
        pub const $all: &[&str] = &[$($text),+];

        impl $name {
            /// The TEXT value stored in the database and sent on the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }

            /// Parse a stored or wire value.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                match value {
                    $( $text => Ok(Self::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {:?}",
                        stringify!($name),
                        $all
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_text_enum! {
    /// Lifecycle stage of a project row. The first six values belong to the
    /// sales pipeline (pre-conversion), the rest to delivery.
    ProjectStage, PROJECT_STAGES {
        Lead => "lead",
        Qualified => "qualified",
        Proposal => "proposal",
        Negotiation => "negotiation",
        Won => "won",
        Lost => "lost",
        Planning => "planning",
        Active => "active",
        OnHold => "on_hold",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

/// Stages a pipeline entry may occupy before conversion.
pub const PIPELINE_STAGES: &[&str] = &["lead", "qualified", "proposal", "negotiation", "won", "lost"];

/// Stages a converted project may occupy.
pub const DELIVERY_STAGES: &[&str] = &["planning", "active", "on_hold", "completed", "cancelled"];

impl ProjectStage {
    pub fn is_pipeline(self) -> bool {
        PIPELINE_STAGES.contains(&self.as_str())
    }

    /// Stage a pipeline entry lands in when converted.
    pub fn initial_delivery() -> Self {
        Self::Planning
    }
}

/// Check a stage move for a project row.
///
/// Pipeline entries move freely inside the pipeline; converted projects move
/// freely inside delivery except out of `cancelled`. Crossing from pipeline to
/// delivery only happens through conversion.
pub fn validate_stage_transition(
    from: ProjectStage,
    to: ProjectStage,
    converted: bool,
) -> Result<(), CoreError> {
    if converted == from.is_pipeline() {
        return Err(CoreError::Internal(format!(
            "Stage '{from}' is inconsistent with conversion state"
        )));
    }
    if converted && to.is_pipeline() {
        return Err(CoreError::Conflict(format!(
            "Converted project cannot move back to pipeline stage '{to}'"
        )));
    }
    if !converted && !to.is_pipeline() {
        return Err(CoreError::Conflict(format!(
            "Pipeline entry must be converted before entering delivery stage '{to}'"
        )));
    }
    if from == ProjectStage::Cancelled && to != ProjectStage::Cancelled {
        return Err(CoreError::Conflict(
            "Cancelled project cannot be reopened".to_string(),
        ));
    }
    Ok(())
}

/// Check that a pipeline entry in `stage` may be converted into a project.
pub fn validate_conversion(stage: ProjectStage, converted: bool) -> Result<(), CoreError> {
    if converted {
        return Err(CoreError::Conflict("Pipeline entry is already a project".to_string()));
    }
    if stage == ProjectStage::Lost {
        return Err(CoreError::Conflict(
            "Lost pipeline entries cannot be converted".to_string(),
        ));
    }
    Ok(())
}

define_text_enum! {
    /// Task workflow status.
    TaskStatus, TASK_STATUSES {
        Todo => "todo",
        InProgress => "in_progress",
        Review => "review",
        Done => "done",
    }
}

define_text_enum! {
    /// Task priority.
    TaskPriority, TASK_PRIORITIES {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

define_text_enum! {
    /// Strategic brief revision workflow status.
    BriefStatus, BRIEF_STATUSES {
        Draft => "draft",
        Submitted => "submitted",
        RevisionRequested => "revision_requested",
        Approved => "approved",
    }
}

/// Workflow actions on a strategic brief.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BriefAction {
    Submit,
    RequestRevision,
    Approve,
}

impl BriefStatus {
    /// Resulting status after `action`, or a conflict if the move is illegal.
    pub fn apply(self, action: BriefAction) -> Result<Self, CoreError> {
        use BriefAction::*;
        use BriefStatus::*;
        match (self, action) {
            (Draft | RevisionRequested, Submit) => Ok(Submitted),
            (Submitted, RequestRevision) => Ok(RevisionRequested),
            (Submitted, Approve) => Ok(Approved),
            (status, action) => Err(CoreError::Conflict(format!(
                "Cannot {action:?} a brief in status '{status}'"
            ))),
        }
    }

    /// Approved briefs are frozen.
    pub fn is_editable(self) -> bool {
        self != Self::Approved
    }
}

define_text_enum! {
    /// Explicit task link action.
    LinkAction, LINK_ACTIONS {
        Connect => "connect",
        Disconnect => "disconnect",
    }
}

/// How a link request is carried out once the optional action is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Attach; conflict if the task already belongs to another project.
    Connect,
    /// Detach; conflict if the task does not belong to this project.
    Disconnect,
    /// No action given: move the task here whatever its current link.
    Relink,
}

impl From<Option<LinkAction>> for LinkMode {
    fn from(action: Option<LinkAction>) -> Self {
        match action {
            Some(LinkAction::Connect) => Self::Connect,
            Some(LinkAction::Disconnect) => Self::Disconnect,
            None => Self::Relink,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn stage_round_trips_through_text() {
        for value in PROJECT_STAGES {
            assert_eq!(ProjectStage::parse(value).unwrap().as_str(), *value);
        }
    }

    #[test]
    fn unknown_stage_is_a_validation_error() {
        assert_matches!(ProjectStage::parse("prospect"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn pipeline_and_delivery_partition_all_stages() {
        assert_eq!(PIPELINE_STAGES.len() + DELIVERY_STAGES.len(), PROJECT_STAGES.len());
        for value in PIPELINE_STAGES {
            assert!(ProjectStage::parse(value).unwrap().is_pipeline());
        }
        for value in DELIVERY_STAGES {
            assert!(!ProjectStage::parse(value).unwrap().is_pipeline());
        }
    }

    #[test]
    fn pipeline_moves_stay_in_pipeline() {
        assert!(validate_stage_transition(ProjectStage::Lead, ProjectStage::Proposal, false).is_ok());
        assert!(validate_stage_transition(ProjectStage::Won, ProjectStage::Lead, false).is_ok());
        assert_matches!(
            validate_stage_transition(ProjectStage::Won, ProjectStage::Active, false),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn delivery_moves_stay_in_delivery() {
        assert!(validate_stage_transition(ProjectStage::Planning, ProjectStage::Active, true).is_ok());
        assert_matches!(
            validate_stage_transition(ProjectStage::Active, ProjectStage::Negotiation, true),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            validate_stage_transition(ProjectStage::Cancelled, ProjectStage::Active, true),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn lost_entries_cannot_convert() {
        assert!(validate_conversion(ProjectStage::Won, false).is_ok());
        assert!(validate_conversion(ProjectStage::Lead, false).is_ok());
        assert_matches!(validate_conversion(ProjectStage::Lost, false), Err(CoreError::Conflict(_)));
        assert_matches!(validate_conversion(ProjectStage::Planning, true), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn brief_workflow() {
        let submitted = BriefStatus::Draft.apply(BriefAction::Submit).unwrap();
        assert_eq!(submitted, BriefStatus::Submitted);
        let revising = submitted.apply(BriefAction::RequestRevision).unwrap();
        assert_eq!(revising, BriefStatus::RevisionRequested);
        let resubmitted = revising.apply(BriefAction::Submit).unwrap();
        assert_eq!(resubmitted.apply(BriefAction::Approve).unwrap(), BriefStatus::Approved);
    }

    #[test]
    fn brief_illegal_moves_conflict() {
        assert_matches!(
            BriefStatus::Draft.apply(BriefAction::RequestRevision),
            Err(CoreError::Conflict(_))
        );
        assert_matches!(
            BriefStatus::Approved.apply(BriefAction::Submit),
            Err(CoreError::Conflict(_))
        );
        assert!(!BriefStatus::Approved.is_editable());
    }

    #[test]
    fn absent_link_action_means_relink() {
        assert_eq!(LinkMode::from(None), LinkMode::Relink);
        assert_eq!(LinkMode::from(Some(LinkAction::Connect)), LinkMode::Connect);
        assert_eq!(LinkMode::from(Some(LinkAction::Disconnect)), LinkMode::Disconnect);
    }

    #[test]
    fn link_action_deserializes_from_wire_value() {
        let action: LinkAction = serde_json::from_str("\"disconnect\"").unwrap();
        assert_eq!(action, LinkAction::Disconnect);
    }
}
