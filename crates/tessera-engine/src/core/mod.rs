//! Application contract.

mod app;

pub use app::App;
