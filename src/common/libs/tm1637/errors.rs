use crate::common::libs::tm1637::gpio::PinId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TmError<E> {
    #[error("byte {0:#04x} was not acknowledged")]
    Ack(u8),

    #[error("an IO error occured")]
    IO(E),
}

impl<E> From<E> for TmError<E> {
    fn from(err: E) -> Self {
        Self::IO(err)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GpioError<E> {
    #[error("pin {0} is not wired to this bus")]
    UnknownPin(PinId),

    #[error("pin {0} does not support: {1}")]
    Unsupported(PinId, &'static str),

    #[error("a gpio backend error occured")]
    Backend(E),
}
