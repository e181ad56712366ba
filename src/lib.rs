//! ProcessFlow - desktop admin console for departments, processes and subprocesses.

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod listing;
pub mod logging;
pub mod models;
pub mod pages;
pub mod route;
pub mod ui;

pub use error::{AppError, Result};
