use clap::Parser;
use pdf_import::error::ImportError;
use pdf_import::types::{Layer, SolidLayer};
use pdf_import::{import, ImportOptions, Units};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdf-import", about = "Convert PDF vector drawings to layered geometry JSON")]
struct Cli {
    /// Input PDF files, each interpreted independently
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output JSON file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output units (mm, in)
    #[arg(short, long, default_value = "mm")]
    units: String,

    /// Bézier samples per segment and stroke arc resolution
    #[arg(long, default_value_t = 16)]
    steps: usize,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Also emit each layer merged into one solid area
    #[arg(long)]
    solid: bool,
}

#[derive(Serialize)]
struct ImportedFile<'a> {
    source: String,
    layers: &'a [Layer],
    #[serde(skip_serializing_if = "Option::is_none")]
    solid: Option<&'a [SolidLayer]>,
}

type FileResult = Result<(Vec<Layer>, Option<Vec<SolidLayer>>), ImportError>;

fn parse_units(s: &str) -> Result<Units, String> {
    match s.to_lowercase().as_str() {
        "mm" | "millimeters" | "metric" => Ok(Units::Millimeters),
        "in" | "inch" | "inches" => Ok(Units::Inches),
        _ => Err(format!("Unknown units: {s}. Use: mm, in")),
    }
}

fn run(cli: Cli, opts: ImportOptions) -> Result<bool, ImportError> {
    let with_solid = cli.solid;
    let results: Vec<(PathBuf, FileResult)> = cli
        .inputs
        .into_par_iter()
        .map(|path| {
            let result = import(&path, &opts).map(|layers| {
                let solid: Option<Vec<SolidLayer>> =
                    with_solid.then(|| layers.iter().map(Layer::solid).collect());
                (layers, solid)
            });
            (path, result)
        })
        .collect();

    let mut failed = false;
    let mut files = Vec::with_capacity(results.len());
    for (path, result) in &results {
        match result {
            Ok((layers, solid)) => files.push(ImportedFile {
                source: path.display().to_string(),
                layers,
                solid: solid.as_deref(),
            }),
            Err(e) => {
                eprintln!("Error: {}: {e}", path.display());
                failed = true;
            }
        }
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&files)?
    } else {
        serde_json::to_string(&files)?
    };

    if let Some(output_path) = cli.output {
        std::fs::write(&output_path, &json)?;
        eprintln!("Written to {}", output_path.display());
    } else {
        println!("{json}");
    }
    Ok(!failed)
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let units = match parse_units(&cli.units) {
        Ok(u) => u,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let opts = ImportOptions {
        units,
        circle_steps: cli.steps,
    };

    match run(cli, opts) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
