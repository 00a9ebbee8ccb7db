pub mod list_parser;
pub mod list_serializer;

pub use list_parser::parse_numbered_list;
pub use list_serializer::{serialize_numbered_list, serialize_numbered_list_with};
