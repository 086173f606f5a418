//! Application services: listings, panels and the moderation workflow.

pub mod content;
pub mod error;
pub mod moderation;
pub mod pagination;
pub mod repos;
pub mod selection;
pub mod view;
