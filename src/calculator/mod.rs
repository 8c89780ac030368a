//! Expression engine module

mod engine;
mod session;

#[cfg(test)]
mod property_tests;

pub use engine::*;
pub use session::*;
