//! Side effects of domain mutations and their dispatcher.
//!
//! State-changing operations never send emails or insert notification rows
//! themselves. They return a list of [`Effect`] values describing what should
//! happen, and the caller hands that list to the [`EffectDispatcher`] once
//! the mutation has committed. A failed effect is logged and dropped; it can
//! never undo or mask the mutation that emitted it.

use buildup_core::types::EntityId;
use buildup_db::repositories::NotificationRepo;
use buildup_db::DbPool;

use crate::delivery::email::{EmailDelivery, EmailError};
use crate::templates::EmailTemplate;

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// A file attached to an outgoing email.
#[derive(Clone)]
pub struct Attachment {
    /// Filename shown to the recipient.
    pub filename: String,
    /// MIME type of the payload, e.g. `application/pdf`.
    pub content_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("size", &self.data.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side effect emitted by a committed domain mutation.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Send a templated email.
    SendEmail {
        /// Recipient address.
        to: String,
        /// Which email to send.
        template: EmailTemplate,
        /// `(placeholder, value)` pairs substituted into the body.
        substitutions: Vec<(&'static str, String)>,
        /// Optional file attached to the message.
        attachment: Option<Attachment>,
    },

    /// Insert an in-app notification row.
    Notify {
        /// User id of the recipient.
        owner_id: EntityId,
        /// Which side of the program reads it, `builder` or `coach`.
        audience: &'static str,
        /// Notification text shown in the application.
        content: String,
    },
}

impl Effect {
    /// Shorthand for [`Effect::SendEmail`] without an attachment.
    pub fn email(
        to: impl Into<String>,
        template: EmailTemplate,
        substitutions: Vec<(&'static str, String)>,
    ) -> Self {
        Self::SendEmail {
            to: to.into(),
            template,
            substitutions,
            attachment: None,
        }
    }

    /// Shorthand for [`Effect::SendEmail`] carrying a file.
    pub fn email_with_attachment(
        to: impl Into<String>,
        template: EmailTemplate,
        substitutions: Vec<(&'static str, String)>,
        attachment: Attachment,
    ) -> Self {
        Self::SendEmail {
            to: to.into(),
            template,
            substitutions,
            attachment: Some(attachment),
        }
    }

    /// Shorthand for [`Effect::Notify`].
    pub fn notify(
        owner_id: impl Into<EntityId>,
        audience: &'static str,
        content: impl Into<String>,
    ) -> Self {
        Self::Notify {
            owner_id: owner_id.into(),
            audience,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// EffectDispatcher
// ---------------------------------------------------------------------------

/// Error raised while executing a single effect. Never leaves the dispatcher.
#[derive(Debug, thiserror::Error)]
enum DispatchError {
    #[error("email delivery failed: {0}")]
    Email(#[from] EmailError),

    #[error("notification insert failed: {0}")]
    Db(#[from] sqlx::Error),
}

/// Executes [`Effect`]s after the emitting mutation has committed.
///
/// Shared across the application as part of the state. When no mailer is
/// configured, email effects are logged and skipped so the platform runs
/// without an SMTP server in development.
pub struct EffectDispatcher {
    pool: DbPool,
    mailer: Option<EmailDelivery>,
}

impl EffectDispatcher {
    /// Create a dispatcher over the given pool and optional mailer.
    pub fn new(pool: DbPool, mailer: Option<EmailDelivery>) -> Self {
        Self { pool, mailer }
    }

    /// Execute every effect in order.
    ///
    /// Failures are logged with the name of the operation that emitted them
    /// and are otherwise swallowed; the committed mutation already succeeded.
    pub async fn dispatch(&self, operation: &'static str, effects: Vec<Effect>) {
        for effect in effects {
            if let Err(error) = self.run(&effect).await {
                tracing::error!(operation, ?effect, %error, "Effect dispatch failed");
            }
        }
    }

    async fn run(&self, effect: &Effect) -> Result<(), DispatchError> {
        match effect {
            Effect::SendEmail {
                to,
                template,
                substitutions,
                attachment,
            } => match &self.mailer {
                Some(mailer) => {
                    let body = template.render(substitutions);
                    mailer
                        .send(to, template.subject(), body, attachment.as_ref())
                        .await?;
                }
                None => {
                    tracing::info!(%to, ?template, "Email delivery disabled, skipping");
                }
            },
            Effect::Notify {
                owner_id,
                audience,
                content,
            } => {
                NotificationRepo::create(&self.pool, owner_id, audience, content).await?;
                tracing::debug!(%owner_id, audience = %audience, "In-app notification created");
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use buildup_core::roles::ROLE_BUILDER;

    #[test]
    fn email_constructor_has_no_attachment() {
        let effect = Effect::email(
            "jean@example.com",
            EmailTemplate::ReturningAccepted,
            vec![("first_name", "Jean".to_string())],
        );
        match effect {
            Effect::SendEmail {
                to,
                template,
                attachment,
                ..
            } => {
                assert_eq!(to, "jean@example.com");
                assert_eq!(template, EmailTemplate::ReturningAccepted);
                assert!(attachment.is_none());
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn email_with_attachment_carries_file() {
        let effect = Effect::email_with_attachment(
            "jean@example.com",
            EmailTemplate::CandidatureAccepted,
            vec![],
            Attachment {
                filename: "fiche.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                data: vec![0x25, 0x50, 0x44, 0x46],
            },
        );
        match effect {
            Effect::SendEmail { attachment, .. } => {
                let attachment = attachment.expect("attachment should be set");
                assert_eq!(attachment.filename, "fiche.pdf");
                assert_eq!(attachment.data.len(), 4);
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn notify_constructor_sets_audience() {
        let effect = Effect::notify("a".repeat(24), ROLE_BUILDER, "Ton livrable a été validé");
        match effect {
            Effect::Notify {
                owner_id, audience, ..
            } => {
                assert_eq!(owner_id, "a".repeat(24));
                assert_eq!(audience, "builder");
            }
            other => panic!("unexpected effect: {other:?}"),
        }
    }

    #[test]
    fn attachment_debug_hides_bytes() {
        let attachment = Attachment {
            filename: "fiche.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            data: vec![0; 4096],
        };
        let printed = format!("{attachment:?}");
        assert!(printed.contains("size: 4096"));
        assert!(!printed.contains("[0,"));
    }
}
