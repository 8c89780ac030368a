//! Operator set and precedence table
//!
//! Operators are recognised case-insensitively by their lowercase symbol and
//! ranked by an immutable table owned by whoever converts expressions.

mod symbol;
mod table;

pub use symbol::*;
pub use table::*;
