pub mod frame;
pub mod reader;
