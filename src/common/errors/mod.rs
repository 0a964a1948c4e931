pub mod device_errors;
