//! Actions a participant can take on its turn.
//!
//! - `kind`: the tagged set of actions ([`ActionKind`]) and the submitted
//!   [`ActionRequest`]
//! - `result`: structured outcomes ([`ActionResult`]) handed back to hosts
//!   for narration

pub mod kind;
pub mod result;

pub use kind::{ActionKind, ActionRequest};
pub use result::{ActionOutcome, ActionResult, Resolution, StatusChange};
