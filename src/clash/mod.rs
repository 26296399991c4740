pub mod api;
pub mod discovery;
