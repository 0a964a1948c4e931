pub mod default_values;
pub mod environment;
