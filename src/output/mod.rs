mod json;

pub use json::{SerializationError, output_name, write_structure, write_structure_in};
