//! Terminal front end: command dispatch, rendering and prompts.

pub mod console;
pub mod prompt;
pub mod views;
