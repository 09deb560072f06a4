//! Build-up side-effect infrastructure.
//!
//! Domain mutations describe their side effects as [`Effect`] values instead
//! of performing them inline. This crate provides:
//!
//! - [`Effect`] -- emails and in-app notifications emitted by an operation.
//! - [`EffectDispatcher`] -- executes effects after the mutation committed;
//!   failures are logged and never surface to the caller.
//! - [`EmailTemplate`] -- the French HTML templates the platform sends.
//! - [`delivery`] -- the SMTP channel (`lettre` async transport).

pub mod delivery;
pub mod effect;
pub mod templates;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use effect::{Attachment, Effect, EffectDispatcher};
pub use templates::EmailTemplate;
