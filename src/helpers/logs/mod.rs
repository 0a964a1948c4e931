pub mod fern_log;
