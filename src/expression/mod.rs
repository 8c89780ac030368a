//! Expression conversion and evaluation module
//!
//! This module turns whitespace separated infix tokens like `a + b * c` into
//! postfix order and evaluates postfix sequences against variable values.

pub mod cache;
mod converter;
mod evaluator;
pub mod token;


pub use cache::*;
pub use converter::*;
pub use evaluator::*;
pub use token::*;
