use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io::{self, Write};
use std::path::PathBuf;
use walkdir::WalkDir;
use wavegrade::{Analyzer, FileResult, Quality};

#[derive(Parser, Debug)]
#[command(name = "wavegrade")]
#[command(author, version, about = "Grade audio files: loudness, clipping, DC offset, stereo image, spectral balance")]
struct Args {
    /// File or directory to analyze
    path: PathBuf,

    /// Output report file (.csv, .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for auto-generated reports
    #[arg(long, default_value = "wavegrade-reports")]
    report_dir: PathBuf,

    /// Don't auto-generate CSV report
    #[arg(long)]
    no_report: bool,

    /// Don't prompt to open report
    #[arg(long)]
    no_open: bool,

    /// Number of parallel workers (default: number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Skip spectral analysis (faster)
    #[arg(long)]
    skip_spectral: bool,

    /// Only decode the first N seconds of each file
    #[arg(long)]
    limit_secs: Option<u64>,

    /// Show per-analyzer details
    #[arg(short, long)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long)]
    quiet: bool,

    /// Fail (exit 2) when any file scores below this
    #[arg(long, default_value = "60")]
    fail_below: u32,
}

fn main() {
    let args = Args::parse();

    // Set up thread pool
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    // Supported audio formats
    let supported_extensions: std::collections::HashSet<&str> = [
        "flac", "wav", "wave", "aiff", "aif", "mp3", "m4a", "aac", "ogg", "opus",
    ]
    .iter()
    .cloned()
    .collect();

    // Collect audio files
    let files: Vec<PathBuf> = if args.path.is_dir() {
        WalkDir::new(&args.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| supported_extensions.contains(ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect()
    } else {
        vec![args.path.clone()]
    };

    if files.is_empty() {
        eprintln!("No audio files found (supported: flac, wav, mp3, m4a, ogg, opus, aiff)");
        std::process::exit(1);
    }

    if !args.quiet {
        eprintln!("\x1b[1mWavegrade - Audio Quality Grader\x1b[0m");
        eprintln!("{}", "─".repeat(70));
        eprintln!("Found {} audio file(s)\n", files.len());
    }

    // Set up progress bar
    let pb = if !args.quiet && files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    // Create analyzer
    let analyzer = Analyzer::new()
        .with_skip_spectral(args.skip_spectral)
        .with_limit_secs(args.limit_secs);

    // Analyze files in parallel
    let results: Vec<FileResult> = files
        .par_iter()
        .map(|path| {
            let result = analyzer.analyze(path);
            if let Some(ref pb) = pb {
                pb.inc(1);
                pb.set_message(result.file_name.clone());
            }
            result
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    // Print results
    if !args.quiet {
        for r in &results {
            print_result(r, args.verbose);
        }
    }

    // Summary
    let summary = wavegrade::report::Summary::from_results(&results);

    if !args.quiet {
        eprintln!("\n{}", "─".repeat(70));
        eprintln!("\x1b[1mSummary:\x1b[0m");
        eprintln!("  \x1b[32m✓ Excellent:\x1b[0m  {}", summary.excellent);
        eprintln!("  \x1b[36m• Good:\x1b[0m       {}", summary.good);
        eprintln!("  \x1b[33m? Acceptable:\x1b[0m {}", summary.acceptable);
        eprintln!("  \x1b[31m✗ Poor:\x1b[0m       {}", summary.poor);
        if summary.error > 0 {
            eprintln!("  \x1b[90mErrors:\x1b[0m      {}", summary.error);
        }
    }

    // Determine report path
    let report_path = if let Some(ref output) = args.output {
        Some(output.clone())
    } else if !args.no_report {
        // Auto-generate report
        std::fs::create_dir_all(&args.report_dir).ok();
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let filename = format!("wavegrade_report_{}.csv", timestamp);
        Some(args.report_dir.join(filename))
    } else {
        None
    };

    // Generate report
    if let Some(ref output_path) = report_path {
        if let Err(e) = wavegrade::report::generate(output_path, &results) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("\n\x1b[32mReport saved: {}\x1b[0m", output_path.display());
        }

        // Open report
        if !args.no_open && !args.quiet {
            eprint!("\nOpen report? [y/N] ");
            io::stderr().flush().ok();

            let mut input = String::new();
            if io::stdin().read_line(&mut input).is_ok() {
                let input = input.trim().to_lowercase();
                if input == "y" || input == "yes" {
                    if let Err(e) = open::that(output_path) {
                        eprintln!("Failed to open report: {}", e);
                    }
                }
            }
        }
    }

    if !args.quiet {
        eprintln!("\n\x1b[90mAnalysis complete.\x1b[0m");
    }

    // Exit with appropriate code
    let failing = results
        .iter()
        .filter(|r| !r.is_error() && r.score() < args.fail_below)
        .count();
    if failing > 0 {
        std::process::exit(2);
    } else if summary.error > 0 {
        std::process::exit(1);
    }
}

fn print_result(r: &FileResult, verbose: bool) {
    let Some(ref report) = r.report else {
        println!(
            "\x1b[90m[error]\x1b[0m      -    {:<40}  {}",
            truncate(&r.file_name, 40),
            r.error.as_deref().unwrap_or("unknown")
        );
        return;
    };

    let color = match report.quality {
        Quality::Excellent => "\x1b[32m", // Green
        Quality::Good => "\x1b[36m",      // Cyan
        Quality::Acceptable => "\x1b[33m", // Yellow
        Quality::Poor => "\x1b[31m",      // Red
    };
    let reset = "\x1b[0m";

    let issues_str = if report.issues.is_empty() {
        "-".to_string()
    } else {
        report.issues.join("; ")
    };

    println!(
        "{}{:<12}{} {:>3}/100  {:>6.1} LUFS  {:>6.1} dBTP  {:<40}  {}",
        color,
        format!("[{}]", report.quality),
        reset,
        report.score,
        report.loudness.integrated_lufs,
        report.loudness.true_peak_db,
        truncate(&r.file_name, 40),
        truncate(&issues_str, 50),
    );

    if verbose {
        eprintln!(
            "    Loudness: integrated={:.1} short-term={:.1} momentary={:.1} LUFS  range={:.1} LU",
            report.loudness.integrated_lufs,
            report.loudness.short_term_lufs,
            report.loudness.momentary_lufs,
            report.loudness.loudness_range_lu,
        );
        eprintln!(
            "    Peaks: L={:.3} R={:.3} ({:.2} dBTP) | clipping: {}L/{}R samples ({:.4}%)",
            report.loudness.true_peak_left,
            report.loudness.true_peak_right,
            report.loudness.true_peak_db,
            report.clipping.clipped_count_left,
            report.clipping.clipped_count_right,
            report.clipping.clipping_percentage,
        );
        eprintln!(
            "    Stereo: corr={:.3} width={:.3} coherence={:.3}{} | DC offset: {:.3}%",
            report.stereo.correlation,
            report.stereo.stereo_width,
            report.stereo.phase_coherence,
            if report.stereo.is_mono { " (mono)" } else { "" },
            report.dc_offset.offset_percentage,
        );
        if let Some(ref s) = report.spectral {
            eprintln!(
                "    Spectrum: low={:.1}% mid={:.1}% high={:.1}% ({}) peak={:.0}Hz",
                s.low_energy_pct, s.mid_energy_pct, s.high_energy_pct, s.balance,
                s.peak_frequency_hz,
            );
        }
    }
}

/// Shorten a string to `max_len` bytes, cutting only on char boundaries so
/// multibyte file names cannot panic the slice.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut cut = max_len.saturating_sub(3);
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &s[..cut])
}
