// SPDX-FileCopyrightText: 2026 Sapa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each accepts `&Database` and runs through the single
//! background writer thread.

pub mod intents;
pub mod responses;
pub mod school;
pub mod turns;
