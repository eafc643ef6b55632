use anyhow::Result;
use clap::Parser;
use fractal_stream::{GuiCli, init_tracing, run_gui};

fn main() -> Result<()> {
    init_tracing()?;

    let cli = GuiCli::parse();
    run_gui(&cli.engine)
}
