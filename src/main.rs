use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use fractal_stream::{
    Cli, FilePresenterPort, HttpTransport, PixelBuffer, PpmFilePresenter, RenderController,
    RequestDescriptor, init_tracing,
};
use tracing::info;

fn main() -> Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let engine = &cli.engine;
    let transport = Arc::new(HttpTransport::new(&engine.server, engine.connect_timeout())?);
    let surface = PixelBuffer::new(engine.surface_rect()?);
    let mut controller = RenderController::new(transport, surface, engine.session_settings());

    controller
        .load_catalog()
        .with_context(|| format!("loading the catalog from {}", engine.server))?;
    cli.apply_to(&mut controller)?;

    let descriptor = controller.descriptor()?;

    if cli.describe {
        println!("{descriptor}");
        println!("{:#?}", RequestDescriptor::parse(descriptor.as_str())?);
        return Ok(());
    }

    info!(%descriptor, "rendering");
    controller.render()?;
    let summary = controller
        .run_to_completion()
        .with_context(|| format!("streaming {descriptor}"))?;

    PpmFilePresenter::new()
        .present(controller.surface(), &cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    info!(
        output = %cli.output.display(),
        frames = summary.frames,
        pixels = summary.pixels.written,
        skipped = summary.pixels.skipped(),
        dropped = summary.dropped_frames,
        retries = summary.retries,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "image written"
    );

    Ok(())
}
