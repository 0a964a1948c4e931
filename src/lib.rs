#![deny(clippy::all)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::print_stdout
)]
#![allow(
    clippy::missing_docs_in_private_items,
    clippy::implicit_return,
    clippy::similar_names,
    clippy::module_name_repetitions
)]

extern crate embedded_hal as hal;

pub mod common;
pub mod constants;
pub mod helpers;

pub use crate::common::libs::tm1637::{
    config::{AckPolicy, Tm1637Config},
    errors::{GpioError, TmError},
    gpio::{GpioCapability, GpioPinValue, HalPins, PinAssignment, PinId, PinMode},
    Tm1637,
};
