//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod department_panel;
pub mod dialogs;
pub mod home_panel;
pub mod not_found_panel;
pub mod process_panel;
pub mod setup_wizard;
pub mod subprocess_panel;

pub use app::App;
pub use setup_wizard::{SetupApp, SetupWizard};
