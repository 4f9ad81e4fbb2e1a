#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Conversation log for the EduBuddy client.
//!
//! # Key Features
//! - Ordered message log persisted as a full snapshot after every change
//! - Single-flight sends: a second send while one is pending is a no-op
//! - Retry of the latest reply, confirmed clear, quick follow-up actions
//! - Backend failures become bot entries instead of errors

mod actions;
mod store;

pub use actions::QuickAction;
pub use store::{
    CLEAR_CONFIRMATION, CONNECTION_ERROR_REPLY, ConversationError, ConversationStore,
    FALLBACK_REPLY, Rejection, SendOutcome,
};
