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

use log::{error, info};
use std::fmt::Debug;
use std::{env, fs};
use tm1637_bitbang::common::errors::device_errors::DeviceError;
use tm1637_bitbang::constants::default_values::DefaultValues;
use tm1637_bitbang::constants::environment::APP_ENV;
use tm1637_bitbang::helpers::logs::fern_log::setup_logging;
use tm1637_bitbang::{PinAssignment, PinId, Tm1637Config, TmError};

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "esp-idf")]
    esp_idf_sys::link_patches();

    setup_logging(&APP_ENV.config)?;

    let config = load_config()?;
    info!("[main] using {:?}", config);

    let pins = PinAssignment {
        clk: PinId::new(0, DefaultValues::TM1637_CLK_GPIO),
        dio: PinId::new(0, DefaultValues::TM1637_DIO_GPIO),
    };

    if let Err(e) = run(pins, &config) {
        error!("[E0040][main] {}", e);
        return Err(e);
    }

    Ok(())
}

/// Reads the JSON config named by the first argument, defaults otherwise.
fn load_config() -> anyhow::Result<Tm1637Config> {
    match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)?;
            Tm1637Config::from_json(&json)
        }
        None => Ok(Tm1637Config::default()),
    }
}

fn display_error<E: Debug>(err: TmError<E>) -> anyhow::Error {
    DeviceError::Display("E0041", format!("{:?}", err)).into()
}

#[cfg(not(feature = "esp-idf"))]
fn run(pins: PinAssignment, config: &Tm1637Config) -> anyhow::Result<()> {
    use tm1637_bitbang::common::libs::tm1637::delay::NoDelay;
    use tm1637_bitbang::common::libs::tm1637::mappings::Brightness;
    use tm1637_bitbang::common::libs::tm1637::sim::SimulatedTm1637;
    use tm1637_bitbang::Tm1637;

    let chip = SimulatedTm1637::new(pins);
    let mut tm = Tm1637::init(chip, pins, NoDelay, config).map_err(display_error)?;
    info!("[main] after init: {:02x?}", tm.gpio().digits());

    let samples = [(0, false), (5, false), (105, true), (1234, false), (12_345, true)];
    for (value, dot) in samples.iter() {
        tm.display_dec(*value, *dot).map_err(display_error)?;
        info!(
            "[main] display_dec({}, {}) -> {:02x?}",
            value,
            dot,
            tm.gpio().digits()
        );
    }

    for level in [Brightness::L0, Brightness::L3, Brightness::L7].iter() {
        tm.set_brightness(*level as u8).map_err(display_error)?;
        info!("[main] brightness -> {}", tm.gpio().brightness());
    }

    tm.print_str("done", false).map_err(display_error)?;
    tm.display_off().map_err(display_error)?;
    info!(
        "[main] {} transactions, display on: {}",
        tm.gpio().transactions().len(),
        tm.gpio().is_display_on()
    );

    Ok(())
}

#[cfg(feature = "esp-idf")]
fn run(pins: PinAssignment, config: &Tm1637Config) -> anyhow::Result<()> {
    use esp_idf_hal::delay::Ets;
    use esp_idf_hal::peripherals::Peripherals;
    use std::thread;
    use std::time::{Duration, Instant};
    use tm1637_bitbang::common::libs::tm1637::encoding::encode_text;
    use tm1637_bitbang::{HalPins, Tm1637};

    let per = Peripherals::take()
        .ok_or(DeviceError::PeripheralPin("E0030b", "'peripherals' is empty"))?;

    let clk_g27 = per.pins.gpio27.into_output()?;
    let dio_g13 = per.pins.gpio13.into_input_output_od()?;

    let gpio = HalPins::new(clk_g27, dio_g13, pins);
    // ets_delay_us is calibrated against the CPU clock
    let mut tm = Tm1637::init(gpio, pins, Ets, config).map_err(display_error)?;

    let started = Instant::now();
    let mut show_colon = false;

    loop {
        let t = started.elapsed().as_secs();
        let minutes = (t / 60) % 100;
        let seconds = t % 60;

        show_colon = !show_colon;

        // MM:SS with the colon blinking every second
        let frame = encode_text(&format!("{:02}{:02}", minutes, seconds), show_colon);
        if let Err(e) = tm.write_display_data(&frame, 0) {
            error!("[E0042][main][tm1637] {:?}", e);
        }

        thread::sleep(Duration::from_millis(DefaultValues::TM1637_THREAD_DELAY_MS));
    }
}
