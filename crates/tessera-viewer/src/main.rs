mod demo;

use anyhow::Result;
use winit::dpi::LogicalSize;

use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};

use demo::{Demo, Viewer};

fn run() -> Result<()> {
    let demo = match std::env::args().nth(1) {
        Some(name) => name.parse::<Demo>()?,
        None => Demo::Triangle,
    };
    log::info!("starting scene `{}`", demo.name());

    let config = RuntimeConfig {
        title: format!("tessera · {}", demo.name()),
        initial_size: LogicalSize::new(960.0, 540.0),
    };
    Runtime::run(config, GpuInit::default(), Viewer::new(demo))
}

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = run() {
        eprintln!("tessera-viewer: {e:#}");
        std::process::exit(1);
    }
}
