// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test utilities for the Faena ordering bot.

pub mod mock_messenger;

pub use mock_messenger::{MockMessenger, SentMessage};
