//! Moderation workflow: single and bulk state transitions, the auto-approval
//! flag and the starred cap, applied to the backend and the local listings.

mod auto_approval;
mod commands;
mod optimistic;
mod service;
mod starred;
pub mod types;

pub use auto_approval::{AutoApprovalPolicy, AutoApprovalScope};
pub use optimistic::{ItemPatch, OptimisticCommand, OptimisticError};
pub use service::ModerationController;
pub use starred::{DEFAULT_STARRED_LIMIT, StarredCapPolicy};
pub use types::{
    BulkAction, BulkOutcome, Confirmation, LoadState, ModerationError, ModerationOptions, Notice,
    NoticeLevel,
};
