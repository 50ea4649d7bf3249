//! CSV report output, one row per file

use std::io::{self, Write};

use crate::analyzer::FileResult;

/// Quote a field if it contains CSV-significant characters
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write results as CSV
pub fn write<W: Write>(out: &mut W, results: &[FileResult]) -> io::Result<()> {
    writeln!(
        out,
        "file,quality,score,integrated_lufs,true_peak_db,clipping_pct,dc_offset_pct,\
         correlation,stereo_width,balance,peak_freq_hz,duration_secs,sample_rate,channels,\
         issues,error"
    )?;

    for r in results {
        match &r.report {
            Some(rep) => {
                let (balance, peak_freq) = match &rep.spectral {
                    Some(s) => (s.balance.to_string(), format!("{:.1}", s.peak_frequency_hz)),
                    None => (String::new(), String::new()),
                };
                writeln!(
                    out,
                    "{},{},{},{:.2},{:.2},{:.4},{:.3},{:.3},{:.3},{},{},{:.2},{},{},{},",
                    escape(&r.file_path),
                    rep.quality,
                    rep.score,
                    rep.loudness.integrated_lufs,
                    rep.loudness.true_peak_db,
                    rep.clipping.clipping_percentage,
                    rep.dc_offset.offset_percentage,
                    rep.stereo.correlation,
                    rep.stereo.stereo_width,
                    balance,
                    peak_freq,
                    rep.duration_secs,
                    rep.sample_rate,
                    rep.channels,
                    escape(&rep.issues.join("; ")),
                )?;
            }
            None => {
                writeln!(
                    out,
                    "{},error,0,,,,,,,,,,,,,{}",
                    escape(&r.file_path),
                    escape(r.error.as_deref().unwrap_or("unknown")),
                )?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Quality;
    use crate::report::tests::{error_result, result_with_quality};

    #[test]
    fn test_header_and_row_field_counts_match() {
        let results = vec![
            result_with_quality(Quality::Excellent, "clean.wav"),
            error_result("broken.bin"),
        ];

        let mut buf = Vec::new();
        write(&mut buf, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        let header_fields = lines[0].split(',').count();
        for line in &lines[1..] {
            assert_eq!(
                line.split(',').count(),
                header_fields,
                "row has wrong field count: {}",
                line
            );
        }
    }

    #[test]
    fn test_error_row_carries_message() {
        let mut buf = Vec::new();
        write(&mut buf, &[error_result("broken.bin")]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("error"));
        assert!(text.contains("unrecognized container format"));
    }

    #[test]
    fn test_escape_quotes_commas() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a,b"), "\"a,b\"");
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_empty_results_header_only() {
        let mut buf = Vec::new();
        write(&mut buf, &[]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("file,"));
    }
}
