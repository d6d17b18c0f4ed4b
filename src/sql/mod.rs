//! Safe SQL builder: identifiers from table definitions only, values as parameters.

mod builder;
pub use builder::*;
