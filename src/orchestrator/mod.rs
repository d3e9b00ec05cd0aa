//! Sequencing policy for calls to the generative service: per-call deadlines,
//! tier demotion, and the error classification that decides between the two.

pub mod classify;
pub mod deadline;
pub mod tiers;

pub use classify::{is_access_class, is_credential_rejection};
pub use deadline::with_deadline;
pub use tiers::{run_tiered, TierOutcome};
