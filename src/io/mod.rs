//! Moving fields in and out of storage.
//!
//! Nothing here reaches into a field's internals: writers read the axes and the
//! element buffer through the public accessors, readers build a fresh [`crate::Field`]
//! from them.

mod ascii;
mod container;
mod error;

pub use self::ascii::{read_ascii, write_ascii};
pub use self::container::{
    read_field, read_field_file, write_field, write_field_file, Dataset, Element, Group,
};
pub use self::error::FieldIoError;
