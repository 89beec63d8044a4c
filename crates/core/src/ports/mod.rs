mod data_source;
mod pagination;

pub use data_source::*;
pub use pagination::*;
