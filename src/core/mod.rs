//! # Core Application Logic
//!
//! This module contains threadline's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • feed (posts, trees)  │
//!                    │  • thread (visibility)  │
//!                    │  • composer (form)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No UI. I/O only at the │
//!                    │  feed/submit seams.     │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐         ┌──────────────┐
//!             │    TUI     │         │  Submission  │
//!             │  Adapter   │         │  endpoint    │
//!             │ (ratatui)  │         │ (log / HTTP) │
//!             └────────────┘         └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`feed`]: Posts and comment trees, fixture loading, tree edits
//! - [`thread`]: Descendant counts, per-comment visibility, row flattening
//! - [`composer`]: Comment form state and payload building
//! - [`submit`]: The `SubmissionEndpoint` seam and its implementations
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()` reducer
//! - [`config`]: Config file, env, and CLI resolution

pub mod action;
pub mod composer;
pub mod config;
pub mod feed;
pub mod state;
pub mod submit;
pub mod thread;
