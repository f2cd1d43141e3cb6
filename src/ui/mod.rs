//! Ratatui front end: one tab per record kind, each a filterable table with
//! create, edit and delete dialogs.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
