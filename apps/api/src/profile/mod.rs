pub mod document;
pub mod models;
pub mod parser;
