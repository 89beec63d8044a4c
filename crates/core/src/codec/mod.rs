//! Wire-safe encodings for cursors and object identifiers.

mod cursor;
mod global_id;

pub use cursor::*;
pub use global_id::*;
