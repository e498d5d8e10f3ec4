//! Client engine for a script-execution task backend.
//!
//! A user authenticates, submits script tasks, and watches their state
//! converge through a fixed-interval poll. This crate is the whole of that
//! cycle: the wire types and HTTP gateway, the per-session credential and
//! task snapshot, the markup renderers for the list and detail views, and
//! the single-owner [`Engine`] loop that wires user events to all of it.
//!
//! The page surface itself is not here. The engine consumes a stream of
//! [`UiEvent`]s and emits a stream of [`PageOp`]s addressing elements by id;
//! any front-end that can apply those ops (see `taskdock-web`) gets the full
//! client behavior.

pub mod cache;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod render;
pub mod session;

pub use engine::{Engine, EngineConfig, PageHandle};
pub use gateway::{Gateway, HttpGateway};
pub use protocol::{PageOp, Task, TaskDraft, TaskId, UiEvent};
