// SPDX-FileCopyrightText: 2026 Faena Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table family.

pub mod customers;
pub mod orders;
pub mod products;
pub mod schedule;
pub mod settings;
