use std::path::Path;
use std::{fs, process};

use clap::Parser;
use rag_cli::{App, Command, InputFormat};
use rag_core::{detect_with, format_scenario, Reduction, Report, Snapshot};
use rag_testgen::generator::{generate_mult_scenarios, ScenarioParams};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app = App::parse();
    match &app.command {
        Command::Generate(args) => generate(args),
        Command::Detect(args) => detect(args),
        Command::Fmt(args) => fmt(args),
        Command::Schema => schema(),
    }
}

fn generate(args: &rag_cli::GenerateArgs) {
    fs::create_dir_all(&args.output_dir).unwrap_or_else(|e| {
        eprintln!("Failed to create output directory: {e}");
        process::exit(1);
    });

    let template = ScenarioParams {
        id: 0,
        max_processes: args.max_processes,
        max_resources: args.max_resources,
        max_units: args.max_units,
        seed: args.seed,
    };
    let scenarios = generate_mult_scenarios(args.n_scenario, &template);

    for generated in &scenarios {
        let path = args.output_dir.join(format!(
            "{}.{}",
            generated.get_id(),
            args.format.extension()
        ));
        let written = match args.format {
            InputFormat::Text => fs::write(&path, format_scenario(generated.get_data()))
                .map_err(|e| e.to_string()),
            InputFormat::Json => fs::File::create(&path)
                .map_err(|e| e.to_string())
                .and_then(|file| {
                    serde_json::to_writer_pretty(file, generated).map_err(|e| e.to_string())
                }),
        };
        written.unwrap_or_else(|e| {
            eprintln!("Failed to write {}: {e}", path.display());
            process::exit(1);
        });
    }

    println!(
        "Generated {} scenarios to {}",
        scenarios.len(),
        args.output_dir.display()
    );
}

fn detect(args: &rag_cli::DetectArgs) {
    let strategy = rag_core::Strategy::from(args.strategy);
    let mut any_failed = false;

    let inputs = rag_cli::collect_inputs(&args.paths, &[InputFormat::Text, InputFormat::Json])
        .unwrap_or_else(|e| {
            eprintln!("Failed to read input paths: {e}");
            process::exit(1);
        });

    if inputs.is_empty() {
        eprintln!("No .txt or .json scenario files found");
        process::exit(1);
    }

    for path in inputs {
        let filename = path.file_name().unwrap_or_default().to_string_lossy();

        let snapshot = rag_cli::read_scenario(&path)
            .map_err(|e| e.to_string())
            .and_then(|scenario| Snapshot::new(&scenario).map_err(|e| e.to_string()));

        let mut snapshot = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => {
                any_failed = true;
                if args.json {
                    let result = serde_json::json!({
                        "file": filename,
                        "ok": false,
                        "error": e,
                    });
                    println!("{result}");
                } else {
                    println!("{filename}: INVALID ({e})");
                }
                continue;
            }
        };

        if args.verbose && !args.json {
            println!("== {filename}");
            print_initial(&snapshot);
        }

        let trace = detect_with(&mut snapshot, strategy);
        let report = Report::new(&snapshot);

        if args.json {
            let mut result = serde_json::json!({
                "file": filename,
                "ok": true,
                "report": report,
            });
            if args.verbose {
                result["reductions"] = serde_json::json!(trace);
            }
            println!("{result}");
        } else if args.verbose {
            print_final(&snapshot, &trace);
            println!("{report}");
            println!();
        } else if report.deadlock_exists {
            let blocked: Vec<String> = report
                .deadlocked
                .iter()
                .map(|process| format!("P{process}"))
                .collect();
            println!("{filename}: DEADLOCK ({})", blocked.join(" "));
        } else {
            println!("{filename}: NO DEADLOCK");
        }
    }

    if any_failed {
        process::exit(1);
    }
}

fn print_initial(snapshot: &Snapshot) {
    println!(
        "processes: {} resources: {}",
        snapshot.processes(),
        snapshot.resources()
    );
    println!("total units");
    println!("{}", join(snapshot.total_units()));
    println!("request");
    print!("{}", snapshot.request());
    println!("allocation");
    print!("{}", snapshot.allocation());
    println!("available");
    println!("{}", join(snapshot.available()));
}

fn print_final(snapshot: &Snapshot, trace: &[Reduction]) {
    println!("reductions");
    for step in trace {
        println!(
            "P{} request [{}] available [{}]",
            step.process,
            join(&step.request),
            join(&step.available)
        );
    }
    println!("final allocation");
    print!("{}", snapshot.allocation());
    println!("remaining request");
    print!("{}", snapshot.request());
}

fn join(values: &[u64]) -> String {
    values
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn fmt(args: &rag_cli::FmtArgs) {
    let inputs = rag_cli::collect_inputs(&args.paths, &[InputFormat::Text]).unwrap_or_else(|e| {
        eprintln!("Failed to read input paths: {e}");
        process::exit(1);
    });

    let mut any_failed = false;
    for path in inputs {
        match format_file(&path, args.check) {
            Ok(true) => {}
            Ok(false) => {
                any_failed = true;
                println!("would reformat {}", path.display());
            }
            Err(e) => {
                any_failed = true;
                eprintln!("{}: {e}", path.display());
            }
        }
    }

    if any_failed {
        process::exit(1);
    }
}

/// Returns `Ok(false)` if `check` is set and the file is not canonical.
fn format_file(path: &Path, check: bool) -> Result<bool, rag_cli::InputError> {
    let content = fs::read_to_string(path)?;
    let formatted = format_scenario(&rag_parser::parse_scenario(&content)?);
    if formatted == content {
        return Ok(true);
    }
    if check {
        return Ok(false);
    }
    fs::write(path, formatted)?;
    tracing::debug!(path = %path.display(), "reformatted");
    Ok(true)
}

fn schema() {
    let schema = schemars::schema_for!(rag_core::Scenario);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize schema: {e}");
            process::exit(1);
        }
    }
}
