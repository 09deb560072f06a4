//! Builder and coach profile statuses, program steps, and the legal
//! transitions between them.
//!
//! Both profile kinds share the same status values but have their own step
//! sequences. Steps only ever move forward along the sequence; the side
//! exits (`abandoned` for builders, `stopped` for coaches) are reachable
//! from any non-terminal step.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Profile status
// ---------------------------------------------------------------------------

/// Candidature received, not yet reviewed.
pub const PROFILE_STATUS_CANDIDATING: &str = "candidating";

/// Profile accepted into the program.
pub const PROFILE_STATUS_VALIDATED: &str = "validated";

/// Profile refused or removed from the program.
pub const PROFILE_STATUS_DELETED: &str = "deleted";

/// All valid profile status values.
pub const VALID_PROFILE_STATUSES: &[&str] = &[
    PROFILE_STATUS_CANDIDATING,
    PROFILE_STATUS_VALIDATED,
    PROFILE_STATUS_DELETED,
];

/// Validate that a status string is one of the accepted values.
pub fn validate_profile_status(status: &str) -> Result<(), CoreError> {
    if VALID_PROFILE_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid profile status '{status}'. Must be one of: {}",
            VALID_PROFILE_STATUSES.join(", ")
        )))
    }
}

/// Validate a status change.
///
/// `deleted` is terminal, and a validated profile cannot return to
/// candidating. Setting the same status again is a no-op and allowed.
pub fn validate_profile_status_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_profile_status(next)?;
    if current == next {
        return Ok(());
    }
    if current == PROFILE_STATUS_DELETED {
        return Err(CoreError::Validation(
            "A deleted profile cannot change status".to_string(),
        ));
    }
    if current == PROFILE_STATUS_VALIDATED && next == PROFILE_STATUS_CANDIDATING {
        return Err(CoreError::Validation(
            "A validated profile cannot return to candidating".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Builder steps
// ---------------------------------------------------------------------------

pub const BUILDER_STEP_PRESELECTED: &str = "preselected";
pub const BUILDER_STEP_ADMIN_MEETING: &str = "admin_meeting";
pub const BUILDER_STEP_ADMIN_MEETING_DONE: &str = "admin_meeting_done";
pub const BUILDER_STEP_COACH_MEETING: &str = "coach_meeting";
pub const BUILDER_STEP_SIGNING: &str = "signing";
pub const BUILDER_STEP_ACTIVE: &str = "active";
pub const BUILDER_STEP_FINISHED: &str = "finished";
pub const BUILDER_STEP_ABANDONED: &str = "abandoned";

/// The builder program steps in progression order. `abandoned` sits outside
/// the sequence as a side exit.
pub const BUILDER_STEP_SEQUENCE: &[&str] = &[
    BUILDER_STEP_PRESELECTED,
    BUILDER_STEP_ADMIN_MEETING,
    BUILDER_STEP_ADMIN_MEETING_DONE,
    BUILDER_STEP_COACH_MEETING,
    BUILDER_STEP_SIGNING,
    BUILDER_STEP_ACTIVE,
    BUILDER_STEP_FINISHED,
];

/// All valid builder step values.
pub const VALID_BUILDER_STEPS: &[&str] = &[
    BUILDER_STEP_PRESELECTED,
    BUILDER_STEP_ADMIN_MEETING,
    BUILDER_STEP_ADMIN_MEETING_DONE,
    BUILDER_STEP_COACH_MEETING,
    BUILDER_STEP_SIGNING,
    BUILDER_STEP_ACTIVE,
    BUILDER_STEP_FINISHED,
    BUILDER_STEP_ABANDONED,
];

/// Validate that a builder step string is one of the accepted values.
pub fn validate_builder_step(step: &str) -> Result<(), CoreError> {
    if VALID_BUILDER_STEPS.contains(&step) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid builder step '{step}'. Must be one of: {}",
            VALID_BUILDER_STEPS.join(", ")
        )))
    }
}

fn builder_step_position(step: &str) -> Option<usize> {
    BUILDER_STEP_SEQUENCE.iter().position(|s| *s == step)
}

/// Validate a builder step change.
///
/// Steps move strictly forward along [`BUILDER_STEP_SEQUENCE`], with two
/// restrictions: `finished` is only reachable from `active`, and `abandoned`
/// is reachable from any non-terminal step. Setting the current step again
/// is allowed.
pub fn validate_builder_step_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_builder_step(next)?;
    if current == next {
        return Ok(());
    }
    if current == BUILDER_STEP_FINISHED || current == BUILDER_STEP_ABANDONED {
        return Err(CoreError::Validation(format!(
            "Builder step '{current}' is terminal"
        )));
    }
    if next == BUILDER_STEP_ABANDONED {
        return Ok(());
    }
    if next == BUILDER_STEP_FINISHED && current != BUILDER_STEP_ACTIVE {
        return Err(CoreError::Validation(
            "A builder can only finish from the active step".to_string(),
        ));
    }
    let (Some(from), Some(to)) = (builder_step_position(current), builder_step_position(next))
    else {
        return Err(CoreError::Validation(format!(
            "Invalid builder step transition '{current}' -> '{next}'"
        )));
    };
    if to < from {
        return Err(CoreError::Validation(format!(
            "Builder step cannot move backwards from '{current}' to '{next}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Coach steps
// ---------------------------------------------------------------------------

pub const COACH_STEP_PRESELECTED: &str = "preselected";
pub const COACH_STEP_MEETING: &str = "meeting";
pub const COACH_STEP_MEETING_DONE: &str = "meeting_done";
pub const COACH_STEP_SIGNING: &str = "signing";
pub const COACH_STEP_ACTIVE: &str = "active";
pub const COACH_STEP_STOPPED: &str = "stopped";

/// The coach program steps in progression order. `stopped` is the side exit.
pub const COACH_STEP_SEQUENCE: &[&str] = &[
    COACH_STEP_PRESELECTED,
    COACH_STEP_MEETING,
    COACH_STEP_MEETING_DONE,
    COACH_STEP_SIGNING,
    COACH_STEP_ACTIVE,
];

/// All valid coach step values.
pub const VALID_COACH_STEPS: &[&str] = &[
    COACH_STEP_PRESELECTED,
    COACH_STEP_MEETING,
    COACH_STEP_MEETING_DONE,
    COACH_STEP_SIGNING,
    COACH_STEP_ACTIVE,
    COACH_STEP_STOPPED,
];

/// Validate that a coach step string is one of the accepted values.
pub fn validate_coach_step(step: &str) -> Result<(), CoreError> {
    if VALID_COACH_STEPS.contains(&step) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid coach step '{step}'. Must be one of: {}",
            VALID_COACH_STEPS.join(", ")
        )))
    }
}

/// Validate a coach step change. Same forward-only rule as builders;
/// `stopped` is reachable from any other step and is terminal.
pub fn validate_coach_step_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_coach_step(next)?;
    if current == next {
        return Ok(());
    }
    if current == COACH_STEP_STOPPED {
        return Err(CoreError::Validation(
            "Coach step 'stopped' is terminal".to_string(),
        ));
    }
    if next == COACH_STEP_STOPPED {
        return Ok(());
    }
    let positions = (
        COACH_STEP_SEQUENCE.iter().position(|s| *s == current),
        COACH_STEP_SEQUENCE.iter().position(|s| *s == next),
    );
    let (Some(from), Some(to)) = positions else {
        return Err(CoreError::Validation(format!(
            "Invalid coach step transition '{current}' -> '{next}'"
        )));
    };
    if to < from {
        return Err(CoreError::Validation(format!(
            "Coach step cannot move backwards from '{current}' to '{next}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Transition-triggered emails
// ---------------------------------------------------------------------------

/// Emails owed to a profile holder after an admin update, derived from the
/// status/step transition that the update performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileEmail {
    /// The candidature was preselected (first meeting scheduled).
    Preselected,
    /// The admin meeting was validated (builders only).
    AdminMeetingValidated,
    /// The profile reached the signing step.
    Accepted,
    /// The profile became active in the program.
    Welcome,
    /// The profile was refused (status moved to deleted).
    Refused,
}

/// Emails triggered by a builder status/step update.
pub fn builder_transition_emails(
    old_status: &str,
    new_status: &str,
    old_step: &str,
    new_step: &str,
) -> Vec<ProfileEmail> {
    let mut emails = Vec::new();
    if new_status == PROFILE_STATUS_DELETED && old_status != PROFILE_STATUS_DELETED {
        emails.push(ProfileEmail::Refused);
    }
    if old_step == BUILDER_STEP_PRESELECTED && new_step == BUILDER_STEP_ADMIN_MEETING {
        emails.push(ProfileEmail::Preselected);
    }
    if old_step == BUILDER_STEP_ADMIN_MEETING && new_step == BUILDER_STEP_ADMIN_MEETING_DONE {
        emails.push(ProfileEmail::AdminMeetingValidated);
    }
    if old_step != BUILDER_STEP_SIGNING && new_step == BUILDER_STEP_SIGNING {
        emails.push(ProfileEmail::Accepted);
    }
    if old_step != BUILDER_STEP_ACTIVE && new_step == BUILDER_STEP_ACTIVE {
        emails.push(ProfileEmail::Welcome);
    }
    emails
}

/// Emails triggered by a coach status/step update.
pub fn coach_transition_emails(
    old_status: &str,
    new_status: &str,
    old_step: &str,
    new_step: &str,
) -> Vec<ProfileEmail> {
    let mut emails = Vec::new();
    if new_status == PROFILE_STATUS_DELETED && old_status != PROFILE_STATUS_DELETED {
        emails.push(ProfileEmail::Refused);
    }
    if old_step == COACH_STEP_PRESELECTED && new_step == COACH_STEP_MEETING {
        emails.push(ProfileEmail::Preselected);
    }
    if old_step != COACH_STEP_SIGNING && new_step == COACH_STEP_SIGNING {
        emails.push(ProfileEmail::Accepted);
    }
    if old_step != COACH_STEP_ACTIVE && new_step == COACH_STEP_ACTIVE {
        emails.push(ProfileEmail::Welcome);
    }
    emails
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Status ------------------------------------------------------------

    #[test]
    fn test_valid_statuses_accepted() {
        for status in VALID_PROFILE_STATUSES {
            assert!(validate_profile_status(status).is_ok());
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!(validate_profile_status("pending").is_err());
        assert!(validate_profile_status("").is_err());
    }

    #[test]
    fn test_status_transition_candidating_to_validated() {
        assert!(validate_profile_status_transition(
            PROFILE_STATUS_CANDIDATING,
            PROFILE_STATUS_VALIDATED
        )
        .is_ok());
    }

    #[test]
    fn test_status_transition_deleted_is_terminal() {
        let result = validate_profile_status_transition(
            PROFILE_STATUS_DELETED,
            PROFILE_STATUS_CANDIDATING,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_transition_no_return_to_candidating() {
        let result = validate_profile_status_transition(
            PROFILE_STATUS_VALIDATED,
            PROFILE_STATUS_CANDIDATING,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_status_transition_same_status_is_noop() {
        for status in VALID_PROFILE_STATUSES {
            assert!(validate_profile_status_transition(status, status).is_ok());
        }
    }

    // -- Builder steps -----------------------------------------------------

    #[test]
    fn test_builder_sequence_advances_in_order() {
        for pair in BUILDER_STEP_SEQUENCE.windows(2) {
            assert!(
                validate_builder_step_transition(pair[0], pair[1]).is_ok(),
                "{} -> {} should be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_builder_step_cannot_move_backwards() {
        let result =
            validate_builder_step_transition(BUILDER_STEP_ACTIVE, BUILDER_STEP_SIGNING);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("backwards"));
    }

    #[test]
    fn test_builder_finished_only_from_active() {
        assert!(
            validate_builder_step_transition(BUILDER_STEP_ACTIVE, BUILDER_STEP_FINISHED).is_ok()
        );
        assert!(
            validate_builder_step_transition(BUILDER_STEP_SIGNING, BUILDER_STEP_FINISHED).is_err()
        );
    }

    #[test]
    fn test_builder_abandoned_from_any_non_terminal() {
        assert!(validate_builder_step_transition(
            BUILDER_STEP_PRESELECTED,
            BUILDER_STEP_ABANDONED
        )
        .is_ok());
        assert!(
            validate_builder_step_transition(BUILDER_STEP_ACTIVE, BUILDER_STEP_ABANDONED).is_ok()
        );
    }

    #[test]
    fn test_builder_terminal_steps_frozen() {
        assert!(validate_builder_step_transition(
            BUILDER_STEP_FINISHED,
            BUILDER_STEP_ACTIVE
        )
        .is_err());
        assert!(validate_builder_step_transition(
            BUILDER_STEP_ABANDONED,
            BUILDER_STEP_PRESELECTED
        )
        .is_err());
    }

    #[test]
    fn test_builder_same_step_is_noop() {
        assert!(
            validate_builder_step_transition(BUILDER_STEP_ACTIVE, BUILDER_STEP_ACTIVE).is_ok()
        );
    }

    #[test]
    fn test_builder_unknown_step_rejected() {
        assert!(validate_builder_step_transition(BUILDER_STEP_ACTIVE, "graduated").is_err());
    }

    // -- Coach steps -------------------------------------------------------

    #[test]
    fn test_coach_sequence_advances_in_order() {
        for pair in COACH_STEP_SEQUENCE.windows(2) {
            assert!(validate_coach_step_transition(pair[0], pair[1]).is_ok());
        }
    }

    #[test]
    fn test_coach_stopped_from_anywhere() {
        assert!(
            validate_coach_step_transition(COACH_STEP_PRESELECTED, COACH_STEP_STOPPED).is_ok()
        );
        assert!(validate_coach_step_transition(COACH_STEP_ACTIVE, COACH_STEP_STOPPED).is_ok());
    }

    #[test]
    fn test_coach_stopped_is_terminal() {
        assert!(validate_coach_step_transition(COACH_STEP_STOPPED, COACH_STEP_ACTIVE).is_err());
    }

    #[test]
    fn test_coach_step_cannot_move_backwards() {
        assert!(validate_coach_step_transition(COACH_STEP_ACTIVE, COACH_STEP_MEETING).is_err());
    }

    // -- Transition emails -------------------------------------------------

    #[test]
    fn test_builder_preselection_email() {
        let emails = builder_transition_emails(
            PROFILE_STATUS_CANDIDATING,
            PROFILE_STATUS_CANDIDATING,
            BUILDER_STEP_PRESELECTED,
            BUILDER_STEP_ADMIN_MEETING,
        );
        assert_eq!(emails, vec![ProfileEmail::Preselected]);
    }

    #[test]
    fn test_builder_acceptance_email_on_signing() {
        let emails = builder_transition_emails(
            PROFILE_STATUS_CANDIDATING,
            PROFILE_STATUS_VALIDATED,
            BUILDER_STEP_COACH_MEETING,
            BUILDER_STEP_SIGNING,
        );
        assert_eq!(emails, vec![ProfileEmail::Accepted]);
    }

    #[test]
    fn test_builder_refusal_email_on_delete() {
        let emails = builder_transition_emails(
            PROFILE_STATUS_CANDIDATING,
            PROFILE_STATUS_DELETED,
            BUILDER_STEP_PRESELECTED,
            BUILDER_STEP_PRESELECTED,
        );
        assert_eq!(emails, vec![ProfileEmail::Refused]);
    }

    #[test]
    fn test_no_email_without_transition() {
        let emails = builder_transition_emails(
            PROFILE_STATUS_VALIDATED,
            PROFILE_STATUS_VALIDATED,
            BUILDER_STEP_ACTIVE,
            BUILDER_STEP_ACTIVE,
        );
        assert!(emails.is_empty());
    }

    #[test]
    fn test_coach_acceptance_email_once() {
        // Already at signing: no duplicate acceptance email.
        let emails = coach_transition_emails(
            PROFILE_STATUS_VALIDATED,
            PROFILE_STATUS_VALIDATED,
            COACH_STEP_SIGNING,
            COACH_STEP_SIGNING,
        );
        assert!(emails.is_empty());
    }

    #[test]
    fn test_welcome_email_on_entering_active() {
        let emails = builder_transition_emails(
            PROFILE_STATUS_VALIDATED,
            PROFILE_STATUS_VALIDATED,
            BUILDER_STEP_SIGNING,
            BUILDER_STEP_ACTIVE,
        );
        assert_eq!(emails, vec![ProfileEmail::Welcome]);

        let emails = coach_transition_emails(
            PROFILE_STATUS_VALIDATED,
            PROFILE_STATUS_VALIDATED,
            COACH_STEP_SIGNING,
            COACH_STEP_ACTIVE,
        );
        assert_eq!(emails, vec![ProfileEmail::Welcome]);
    }
}
