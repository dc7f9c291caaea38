use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "bulgeview",
    author,
    version,
    about = "Interactive pointer-driven bulge distortion viewer"
)]
pub struct Args {
    /// Image the effect distorts; decoded once at startup.
    #[arg(value_name = "IMAGE", default_value = "image.jpg")]
    pub image: PathBuf,

    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Window title.
    #[arg(long, default_value = "bulgeview")]
    pub title: String,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", default_value = "auto")]
    pub antialias: String,
}

pub fn parse() -> Args {
    Args::parse()
}
