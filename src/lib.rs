pub mod config;
pub mod loader;
pub mod page;
pub mod render;
pub mod session;
