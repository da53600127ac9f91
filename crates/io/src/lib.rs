// Reviewer table file I/O

pub mod error;
pub mod loader;
pub mod writer;

pub use error::{LoadError, WriteError};
pub use loader::load_table;
pub use writer::write_table;
