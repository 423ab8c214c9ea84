// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for the ordering bot.
//!
//! Stateless over its collaborators: all durable state lives behind
//! [`faena_core::Repository`], all conversation state behind
//! [`SessionStore`], and all outbound traffic behind
//! [`faena_core::Messenger`].

pub mod availability;
pub mod clock;
pub mod engine;
pub mod normalize;
pub mod prompts;
pub mod session;
pub mod store;

pub use engine::{Engine, EngineConfig};
pub use session::{Schedule, Session, Step};
pub use store::{InMemorySessionStore, SessionStore};
