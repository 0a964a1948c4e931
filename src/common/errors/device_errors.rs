use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError<'a> {
    #[error("[{0}] A peripheral pin error occurred: {1}")]
    PeripheralPin(&'a str, &'a str),

    #[error("[{0}] The display did not respond: {1}")]
    Display(&'a str, String),
}
