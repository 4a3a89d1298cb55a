use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use ripple_core::{preload, RippleConfig};
use ripple_render::FileTextureSource;
use tracing_subscriber::EnvFilter;
use winit::event_loop::{ControlFlow, EventLoop};

mod page;
mod window;

use crate::window::{App, WindowSettings};

#[derive(Parser)]
#[command(name = "ripple")]
#[command(about = "Pointer-driven ripple refraction over a column of images")]
struct Cli {
    /// Page images, top to bottom (paths relative to --root)
    #[arg(required = true)]
    images: Vec<String>,

    /// Brush texture: a soft radial alpha mask
    #[arg(short, long, default_value = "brush.png")]
    brush: String,

    /// Directory asset paths are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    #[arg(long, default_value = "1280")]
    width: u32,

    #[arg(long, default_value = "800")]
    height: u32,

    /// Spacing around and between images (pixels)
    #[arg(long, default_value = "48")]
    gap: f32,

    /// Upper bound on the image column width (pixels)
    #[arg(long, default_value = "720")]
    column_width: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = RippleConfig::default();

    let source = FileTextureSource::new(cli.root.clone());
    let mut failures = 0usize;
    let loaded = preload(&source, &cli.brush, &cli.images, &mut |_| failures += 1);
    let assets = match loaded {
        Ok(assets) => assets,
        Err(e) => bail!("{} asset(s) failed to load, first: {}", failures, e),
    };

    let settings = WindowSettings {
        title: "Ripple".to_string(),
        width: cli.width,
        height: cli.height,
        gap: cli.gap,
        column_width: cli.column_width,
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(settings, config, assets);
    event_loop.run_app(&mut app)?;

    Ok(())
}
