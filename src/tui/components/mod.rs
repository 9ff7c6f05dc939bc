//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `NavBar`: top bar with the blog name and the three nav links
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `FragmentView`: scrollable body holding the visible view's containers.
//!   Its persistent `FragmentViewState` owns keyboard selection and the link
//!   positions recorded during the last render.
//!
//! Components receive external data as props rather than reading `App`
//! directly, which keeps them testable against a `TestBackend`.

pub mod fragment_view;
pub mod nav_bar;

pub use fragment_view::{FragmentView, FragmentViewState, Section};
pub use nav_bar::NavBar;
