// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Business workflows sitting behind the route-level authorization layer.
//!
//! The agreement state machine combines two checks the static matrix
//! cannot express: the caller's role set and whether the caller is the
//! specific account a loaded object belongs to.

pub mod agreements;
pub mod ownership;

pub use agreements::WorkflowError;
