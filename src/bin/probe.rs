//! Dump the full quality report for one or more files as JSON

use std::env;

use wavegrade::Analyzer;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: probe <file> [file...]");
        std::process::exit(1);
    }

    let analyzer = Analyzer::new();
    let mut failed = false;

    for path in &args[1..] {
        let result = analyzer.analyze(path);
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}: failed to serialize result: {}", path, e);
                failed = true;
            }
        }
        if result.is_error() {
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}
