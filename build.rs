// Necessary because of this issue: https://github.com/rust-lang/cargo/issues/9641
#[cfg(feature = "esp-idf")]
fn main() -> anyhow::Result<()> {
    embuild::build::CfgArgs::output_propagated("ESP_IDF")?;
    embuild::build::LinkArgs::output_propagated("ESP_IDF")
}

#[cfg(not(feature = "esp-idf"))]
fn main() -> anyhow::Result<()> {
    Ok(())
}
