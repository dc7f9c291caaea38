use anyhow::{Context, Result};
use renderer::{Antialiasing, RendererConfig, WindowRuntime};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

pub fn run(args: Args) -> Result<()> {
    initialise_tracing();

    let config = renderer_config(&args)?;
    tracing::info!(
        image = %config.image_path.display(),
        width = config.surface_size.0,
        height = config.surface_size.1,
        "starting bulge viewer"
    );

    let runtime = WindowRuntime::spawn(config).context("failed to start render loop")?;
    runtime.wait()
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn renderer_config(args: &Args) -> Result<RendererConfig> {
    let mut config = RendererConfig {
        image_path: args.image.clone(),
        window_title: args.title.clone(),
        antialiasing: parse_antialias(&args.antialias)?,
        ..RendererConfig::default()
    };
    if let Some(spec) = args.size.as_deref() {
        config.surface_size = parse_surface_size(spec)?;
    }
    Ok(config)
}

fn parse_surface_size(spec: &str) -> Result<(u32, u32)> {
    let trimmed = spec.trim();
    let (width, height) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow::anyhow!("expected WxH format, e.g. 1280x720"))?;

    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid width in size specification"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid height in size specification"))?;

    if width == 0 || height == 0 {
        anyhow::bail!("window dimensions must be greater than zero");
    }

    Ok((width, height))
}

fn parse_antialias(mode: &str) -> Result<Antialiasing> {
    match mode.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(Antialiasing::Auto),
        "off" => Ok(Antialiasing::Off),
        other => {
            let samples: u32 = other
                .parse()
                .map_err(|_| anyhow::anyhow!("expected `auto`, `off`, or a sample count"))?;
            if samples == 0 || !samples.is_power_of_two() {
                anyhow::bail!("MSAA sample count must be a power of two");
            }
            Ok(Antialiasing::Samples(samples))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_size_accepts_wxh() {
        assert_eq!(parse_surface_size("1280x720").unwrap(), (1280, 720));
        assert_eq!(parse_surface_size(" 800 X 600 ").unwrap(), (800, 600));
    }

    #[test]
    fn surface_size_rejects_garbage() {
        assert!(parse_surface_size("1280").is_err());
        assert!(parse_surface_size("0x600").is_err());
        assert!(parse_surface_size("axb").is_err());
    }

    #[test]
    fn antialias_modes_parse() {
        assert_eq!(parse_antialias("auto").unwrap(), Antialiasing::Auto);
        assert_eq!(parse_antialias("off").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("4").unwrap(), Antialiasing::Samples(4));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("fancy").is_err());
    }
}
