//! Interactive shell over stdin.

use crate::commands::script::Session;
use layerkv_core::Config;
use std::io::{BufRead, Write};
use tracing::info;

/// Runs the shell, reading commands from `input` until EOF.
///
/// Command errors are reported to `output` and the shell keeps going.
pub fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    config: Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(config);

    for (index, text) in input.lines().enumerate() {
        let text = text?;
        match session.run_line(&text, index + 1) {
            Ok(Some(printed)) => writeln!(output, "{printed}")?,
            Ok(None) => {}
            Err(err) => writeln!(output, "ERROR {err}")?,
        }
        output.flush()?;
    }

    let depth = session.manager().depth();
    if depth > 0 {
        info!(depth, "input closed with open transactions");
    }
    Ok(())
}
