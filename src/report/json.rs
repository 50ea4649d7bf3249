//! JSON report output, full per-analyzer detail

use std::io::{self, Write};

use crate::analyzer::FileResult;

/// Write results as a pretty-printed JSON array
pub fn write<W: Write>(out: &mut W, results: &[FileResult]) -> io::Result<()> {
    let json = serde_json::to_string_pretty(results)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    out.write_all(json.as_bytes())?;
    writeln!(out)
}
