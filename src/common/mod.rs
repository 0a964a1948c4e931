pub mod errors;
pub mod libs;
