//! Collection encoding and file persistence
//!
//! This module provides the JSON form of a record collection and the adapter
//! that reads and writes it to a single file.

pub mod collection;
pub mod json_file;

pub use collection::Collection;
pub use json_file::JsonFile;
