// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits decoupling the conversation engine from its
//! collaborators: the persistence layer and the messaging transport.

pub mod messenger;
pub mod repository;

pub use messenger::Messenger;
pub use repository::Repository;
