//! Display side of the pipeline: writes each price list as one JSON line.

use std::io::Write;

use fuelwatch_core::PriceList;
use tokio::sync::mpsc;

/// Consumes price lists until every sender is dropped, then hands the writer
/// back. A write failure is logged and the list is dropped.
pub async fn run<W: Write>(mut rx: mpsc::Receiver<PriceList>, mut out: W) -> W {
    while let Some(list) = rx.recv().await {
        if let Err(e) = write_line(&mut out, &list) {
            tracing::error!(error = %e, "display: failed to write price list");
        }
    }
    out
}

fn write_line<W: Write>(out: &mut W, list: &PriceList) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, list)?;
    out.write_all(b"\n")?;
    out.flush()
}
