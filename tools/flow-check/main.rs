use botflow::prelude::*;
use botflow::flow::extract_flow_json;
use clap::Parser;
use serde_json::json;
use std::fs;

/// Structural checker for Botmother flow documents
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Flow JSON files to check
    #[arg(required = true)]
    files: Vec<String>,

    /// Print one JSON report instead of text
    #[arg(long)]
    json: bool,

    /// Treat each file as a model reply and check the flow inside its ```json block
    #[arg(short = 'r', long)]
    from_reply: bool,
}

struct FileReport {
    path: String,
    defects: Vec<Defect>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let reports: Vec<FileReport> = cli
        .files
        .iter()
        .map(|path| check_file(path, cli.from_reply))
        .collect();

    if cli.json {
        print_json(&reports);
    } else {
        print_text(&reports);
    }

    if reports.iter().any(|r| !r.defects.is_empty()) {
        std::process::exit(1);
    }
}

fn check_file(path: &str, from_reply: bool) -> FileReport {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read '{}': {}", path, e)));

    let document = if from_reply {
        match extract_flow_json(&content) {
            Some(flow) => flow,
            None => exit_with_error(&format!("No flow JSON block found in '{}'", path)),
        }
    } else {
        content
    };

    let defects = validate_flow(&document);
    log::info!("{}: {} defects", path, defects.len());
    FileReport {
        path: path.to_string(),
        defects,
    }
}

fn print_text(reports: &[FileReport]) {
    for report in reports {
        if report.defects.is_empty() {
            println!("{}: ok", report.path);
        } else {
            println!("{}: {} defects", report.path, report.defects.len());
            println!("{}", format_defects(&report.defects));
        }
    }
}

fn print_json(reports: &[FileReport]) {
    let files: Vec<_> = reports
        .iter()
        .map(|report| {
            json!({
                "file": report.path,
                "valid": report.defects.is_empty(),
                "defects": report.defects.iter().map(ToString::to_string).collect::<Vec<_>>(),
            })
        })
        .collect();
    match serde_json::to_string_pretty(&json!({ "files": files })) {
        Ok(text) => println!("{}", text),
        Err(e) => exit_with_error(&format!("Failed to render report: {}", e)),
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(2);
}
