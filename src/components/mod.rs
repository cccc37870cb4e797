//! UI Components
//!
//! Each component owns its presentation state, maps keys to Actions and
//! draws itself. Grid state stays in the App.

pub mod grid_table;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;

pub use grid_table::{render_pager, GridTable};
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
