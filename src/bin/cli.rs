// src/bin/cli.rs
use deal_pipeline::{cli, log, loge};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    log::set_echo(true);
    cli::run().map_err(|e| {
        loge!("{e}");
        let kind = e.kind();
        color_eyre::eyre::Report::new(e).wrap_err(format!("{kind:?} error"))
    })
}
