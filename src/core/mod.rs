//! # Core Application Logic
//!
//! This module contains Folio's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • PostStore (data)     │
//!                    │  • render (fragments)   │
//!                    │  • App (view state)     │
//!                    │  • Action + update()    │
//!                    │  • dispatch (gestures)  │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │    API     │
//!             │  Adapter   │          │  (fetch)   │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`post`]: The `Post` record and lenient decoding
//! - [`store`]: The `PostStore`, sorted newest first
//! - [`render`]: Posts → `Fragment`s
//! - [`view`]: View, nav link and target names
//! - [`state`]: The `App` struct and its view-controller transitions
//! - [`action`]: The `Action` enum and `update()`
//! - [`dispatch`]: Gesture → `Action` routing table
//! - [`config`]: Settings and their override hierarchy

pub mod action;
pub mod config;
pub mod dispatch;
pub mod post;
pub mod render;
pub mod state;
pub mod store;
pub mod view;
