pub mod chunk_types;
pub mod header_parser;
pub mod primitive_parser;
pub mod track_parser;
