use crate::constants::environment::EnvConfig;
use fern::colors::{Color, ColoredLevelConfig};
use std::io;

const DRIVER_TARGET: &str = "tm1637_bitbang::common::libs::tm1637";

pub fn setup_logging(env_config: &EnvConfig) -> anyhow::Result<()> {
    // colors for the whole line
    let colors_line = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Magenta)
        .debug(Color::BrightBlack)
        .trace(Color::BrightBlack);

    // colors for the name of the level
    let colors_level = colors_line.info(Color::Blue);

    let mut stdout_config = fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{target}][{level}] {color_line}{message}{color_line}\x1B[0m",
                color_line = format_args!(
                    "\x1B[{}m",
                    colors_line.get_color(&record.level()).to_fg_str()
                ),
                target = record.target(),
                level = colors_level.color(record.level()),
                message = message,
            ));
        })
        .level(env_config.log_level);

    if env_config.show_wire_bytes {
        stdout_config = stdout_config.level_for(DRIVER_TARGET, log::LevelFilter::Trace);
    }

    fern::Dispatch::new()
        .chain(stdout_config.chain(io::stdout()))
        .apply()?;

    Ok(())
}
