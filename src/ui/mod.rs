//! Terminal UI layer for interactive slogan sessions.
//!
//! The UI module owns rendering, keyboard handling, and loop control for the
//! text user interface.
//!
//! Key submodules include:
//! - [`chat_loop`]: the main interaction loop that turns input into
//!   [`crate::core::app::AppAction`]s and coordinates streaming via
//!   [`crate::core::chat_stream`].
//! - [`renderer`]: frame composition for the sidebar, transcript, status line
//!   and input box.
//! - [`sidebar`] and [`view`]: settings rows and presentation-only state.
//! - [`wrap`]: word wrapping shared by layout measurement and drawing.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic and backend coordination.

pub mod chat_loop;
pub mod renderer;
pub mod sidebar;
pub mod view;
pub mod wrap;
