//! Build-on curriculum ordering, the per-project step cursor, and returning
//! submission rules.
//!
//! A curriculum is a strict two-level hierarchy: build-ons ordered by index,
//! each holding steps ordered by index. A project's cursor points at exactly
//! one step (or nothing once the program is complete). All ordering decisions
//! live here so the repository layer only ever executes them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Returning types
// ---------------------------------------------------------------------------

/// Proof is an uploaded file.
pub const RETURNING_TYPE_FILE: &str = "file";

/// Proof is an external link.
pub const RETURNING_TYPE_EXTERNAL: &str = "external";

/// Proof is a free-text comment.
pub const RETURNING_TYPE_COMMENT: &str = "comment";

/// All valid returning type values.
pub const VALID_RETURNING_TYPES: &[&str] = &[
    RETURNING_TYPE_FILE,
    RETURNING_TYPE_EXTERNAL,
    RETURNING_TYPE_COMMENT,
];

/// Validate that a returning type string is one of the accepted values.
pub fn validate_returning_type(returning_type: &str) -> Result<(), CoreError> {
    if VALID_RETURNING_TYPES.contains(&returning_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid returning type '{returning_type}'. Must be one of: {}",
            VALID_RETURNING_TYPES.join(", ")
        )))
    }
}

/// Validate a submission payload against the step's declared returning type.
///
/// * `file` requires uploaded bytes.
/// * `external` requires a link in the comment field and no file.
/// * `comment` requires a non-empty comment and no file.
pub fn validate_returning_payload(
    returning_type: &str,
    comment: Option<&str>,
    has_file: bool,
) -> Result<(), CoreError> {
    let has_comment = comment.is_some_and(|c| !c.trim().is_empty());
    match returning_type {
        RETURNING_TYPE_FILE => {
            if !has_file {
                return Err(CoreError::Validation(
                    "This step requires a file upload".to_string(),
                ));
            }
        }
        RETURNING_TYPE_EXTERNAL => {
            if has_file {
                return Err(CoreError::Validation(
                    "This step takes a link, not a file".to_string(),
                ));
            }
            if !has_comment {
                return Err(CoreError::Validation(
                    "This step requires a link to the external work".to_string(),
                ));
            }
        }
        RETURNING_TYPE_COMMENT => {
            if has_file {
                return Err(CoreError::Validation(
                    "This step takes a comment, not a file".to_string(),
                ));
            }
            if !has_comment {
                return Err(CoreError::Validation(
                    "This step requires a non-empty comment".to_string(),
                ));
            }
        }
        other => return Err(validate_returning_type(other).unwrap_err()),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Returning statuses
// ---------------------------------------------------------------------------

/// Fresh submission awaiting review.
pub const RETURNING_STATUS_WAITING: &str = "waiting";

/// Pending, parked in the admin review queue.
pub const RETURNING_STATUS_WAITING_ADMIN: &str = "waiting_admin";

/// Pending, parked in the coach review queue.
pub const RETURNING_STATUS_WAITING_COACH: &str = "waiting_coach";

/// Accepted; the project cursor advanced past this step.
pub const RETURNING_STATUS_VALIDATED: &str = "validated";

/// Refused with a reason; the builder may resubmit.
pub const RETURNING_STATUS_REFUSED: &str = "refused";

/// The statuses that count as "pending review". Only returnings in one
/// of these states can be decided or transferred.
pub const PENDING_RETURNING_STATUSES: &[&str] = &[
    RETURNING_STATUS_WAITING,
    RETURNING_STATUS_WAITING_ADMIN,
    RETURNING_STATUS_WAITING_COACH,
];

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A project's position in the curriculum: the build-on and step currently
/// being worked on. A project with no cursor has completed the program (or
/// has not been assigned one yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub build_on_id: EntityId,
    pub build_on_step_id: EntityId,
}

// ---------------------------------------------------------------------------
// CurriculumIndex
// ---------------------------------------------------------------------------

/// The full curriculum ordering, loaded once per workflow operation.
///
/// Build-ons and their steps must be supplied already sorted by index; the
/// repository layer guarantees that via `ORDER BY`.
#[derive(Debug, Clone)]
pub struct CurriculumIndex {
    build_ons: Vec<(EntityId, Vec<EntityId>)>,
}

impl CurriculumIndex {
    /// Build an index from `(build_on_id, ordered step ids)` pairs.
    pub fn new(build_ons: Vec<(EntityId, Vec<EntityId>)>) -> Self {
        Self { build_ons }
    }

    /// The first step of the first build-on, if the curriculum has any.
    ///
    /// Build-ons with no steps are skipped.
    pub fn first_step(&self) -> Option<Cursor> {
        self.build_ons
            .iter()
            .find(|(_, steps)| !steps.is_empty())
            .map(|(build_on_id, steps)| Cursor {
                build_on_id: build_on_id.clone(),
                build_on_step_id: steps[0].clone(),
            })
    }

    /// Returns `true` if `cursor` points at a step of this curriculum.
    pub fn contains(&self, cursor: &Cursor) -> bool {
        self.build_ons
            .iter()
            .any(|(id, steps)| *id == cursor.build_on_id && steps.contains(&cursor.build_on_step_id))
    }

    /// The step after `cursor` in curriculum order.
    ///
    /// Moves to the next step of the same build-on, or to the first step of
    /// the next build-on when the current one is exhausted. `Ok(None)` means
    /// the cursor was on the final step and the program is complete. A cursor
    /// that no longer matches the curriculum (the admin re-synced it
    /// underneath the project) is a conflict.
    pub fn successor(&self, cursor: &Cursor) -> Result<Option<Cursor>, CoreError> {
        let bo_pos = self
            .build_ons
            .iter()
            .position(|(id, _)| *id == cursor.build_on_id)
            .ok_or_else(|| {
                CoreError::Conflict("Current build-on is no longer in the curriculum".to_string())
            })?;
        let steps = &self.build_ons[bo_pos].1;
        let step_pos = steps
            .iter()
            .position(|id| *id == cursor.build_on_step_id)
            .ok_or_else(|| {
                CoreError::Conflict("Current step is no longer in the curriculum".to_string())
            })?;

        if step_pos + 1 < steps.len() {
            return Ok(Some(Cursor {
                build_on_id: cursor.build_on_id.clone(),
                build_on_step_id: steps[step_pos + 1].clone(),
            }));
        }

        // Current build-on exhausted: first step of the next non-empty one.
        Ok(self.build_ons[bo_pos + 1..]
            .iter()
            .find(|(_, steps)| !steps.is_empty())
            .map(|(build_on_id, steps)| Cursor {
                build_on_id: build_on_id.clone(),
                build_on_step_id: steps[0].clone(),
            }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_curriculum() -> CurriculumIndex {
        // Build-on A: steps s0, s1. Build-on B: step s2.
        CurriculumIndex::new(vec![
            (
                "a".repeat(24),
                vec![format!("{}0", "s".repeat(23)), format!("{}1", "s".repeat(23))],
            ),
            ("b".repeat(24), vec![format!("{}2", "s".repeat(23))]),
        ])
    }

    fn cursor(build_on: &str, step: &str) -> Cursor {
        Cursor {
            build_on_id: build_on.to_string(),
            build_on_step_id: step.to_string(),
        }
    }

    // -- Payload validation ------------------------------------------------

    #[test]
    fn test_comment_type_requires_comment() {
        assert!(validate_returning_payload(RETURNING_TYPE_COMMENT, Some("done"), false).is_ok());
        assert!(validate_returning_payload(RETURNING_TYPE_COMMENT, Some("   "), false).is_err());
        assert!(validate_returning_payload(RETURNING_TYPE_COMMENT, None, false).is_err());
    }

    #[test]
    fn test_comment_type_rejects_file() {
        assert!(validate_returning_payload(RETURNING_TYPE_COMMENT, Some("done"), true).is_err());
    }

    #[test]
    fn test_external_type_requires_link() {
        assert!(validate_returning_payload(
            RETURNING_TYPE_EXTERNAL,
            Some("https://example.org/work"),
            false
        )
        .is_ok());
        assert!(validate_returning_payload(RETURNING_TYPE_EXTERNAL, None, false).is_err());
        assert!(validate_returning_payload(RETURNING_TYPE_EXTERNAL, Some("x"), true).is_err());
    }

    #[test]
    fn test_file_type_requires_file() {
        assert!(validate_returning_payload(RETURNING_TYPE_FILE, None, true).is_ok());
        assert!(validate_returning_payload(RETURNING_TYPE_FILE, None, false).is_err());
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(validate_returning_payload("video", None, false).is_err());
    }

    // -- Cursor ordering ---------------------------------------------------

    #[test]
    fn test_first_step_of_first_build_on() {
        let index = sample_curriculum();
        let first = index.first_step().unwrap();
        assert_eq!(first.build_on_id, "a".repeat(24));
        assert_eq!(first.build_on_step_id, format!("{}0", "s".repeat(23)));
    }

    #[test]
    fn test_first_step_skips_empty_build_on() {
        let index = CurriculumIndex::new(vec![
            ("a".repeat(24), vec![]),
            ("b".repeat(24), vec!["x".repeat(24)]),
        ]);
        let first = index.first_step().unwrap();
        assert_eq!(first.build_on_id, "b".repeat(24));
    }

    #[test]
    fn test_empty_curriculum_has_no_first_step() {
        assert!(CurriculumIndex::new(vec![]).first_step().is_none());
    }

    #[test]
    fn test_successor_within_build_on() {
        let index = sample_curriculum();
        let next = index
            .successor(&cursor(&"a".repeat(24), &format!("{}0", "s".repeat(23))))
            .unwrap()
            .unwrap();
        assert_eq!(next.build_on_id, "a".repeat(24));
        assert_eq!(next.build_on_step_id, format!("{}1", "s".repeat(23)));
    }

    #[test]
    fn test_successor_crosses_build_on_boundary() {
        let index = sample_curriculum();
        // Last step of A advances to the first step of B, not back into A.
        let next = index
            .successor(&cursor(&"a".repeat(24), &format!("{}1", "s".repeat(23))))
            .unwrap()
            .unwrap();
        assert_eq!(next.build_on_id, "b".repeat(24));
        assert_eq!(next.build_on_step_id, format!("{}2", "s".repeat(23)));
    }

    #[test]
    fn test_successor_of_final_step_is_none() {
        let index = sample_curriculum();
        let next = index
            .successor(&cursor(&"b".repeat(24), &format!("{}2", "s".repeat(23))))
            .unwrap();
        assert!(next.is_none(), "program should be complete");
    }

    #[test]
    fn test_successor_of_unknown_step_is_conflict() {
        let index = sample_curriculum();
        let result = index.successor(&cursor(&"a".repeat(24), &"z".repeat(24)));
        assert!(matches!(result, Err(CoreError::Conflict(_))));
    }

    #[test]
    fn test_successor_of_unknown_build_on_is_conflict() {
        let index = sample_curriculum();
        let result = index.successor(&cursor(&"q".repeat(24), &"z".repeat(24)));
        assert!(matches!(result, Err(CoreError::Conflict(_))));
    }

    #[test]
    fn test_contains() {
        let index = sample_curriculum();
        assert!(index.contains(&cursor(&"a".repeat(24), &format!("{}0", "s".repeat(23)))));
        assert!(!index.contains(&cursor(&"a".repeat(24), &"z".repeat(24))));
    }
}
