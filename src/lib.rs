//! tasklist - Undoable To-Do List Session Core
//!
//! This library implements the client-side core of a single-user to-do list:
//! an in-memory action history with linear undo/redo over CRUD mutations
//! whose identifiers are only known after a round trip to a remote store.
//!
//! # Core Concepts
//!
//! - **Projection**: the visible task list, a pure fold of confirmed actions
//! - **Action Log**: cursor-addressed history; pushing truncates the redo tail
//! - **Reconciliation Map**: translates ids recorded in history to the ids
//!   the store minted when a task was recreated by an undo or redo
//! - **Gateway**: the remote store boundary; local state changes only after
//!   a call is confirmed
//!
//! # Module Organization
//!
//! - `action`: the closed set of recorded mutations
//! - `error`: error types and result alias
//! - `gateway`: remote mutation trait consumed by the session
//! - `history`: the undo/redo action log
//! - `reducer`: pure projection of actions onto the task list
//! - `remap`: identifier reconciliation across recreations
//! - `session`: orchestration of mutations, undo, and redo
//! - `store`: in-memory gateway implementation for tests and development
//! - `task`: task snapshots, identifiers, and title validation

pub mod action;
pub mod error;
pub mod gateway;
pub mod history;
pub mod reducer;
pub mod remap;
pub mod session;
pub mod store;
pub mod task;

pub use error::{Error, Result};
