// Network adapter modules split by the display socket vs plain HTTP routes.

pub mod client;
pub mod internal;

pub use client::ws_handler;
pub use internal::{routes, state_handler};
