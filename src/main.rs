use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    // stdout carries the UCI protocol, so logs go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    info!("packbot starting");
    packbot::uci::run()?;
    Ok(())
}
