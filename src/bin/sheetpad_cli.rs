//! CLI tool for sheetpad - imports a CSV/TSV/XLSX file and prints its grid
//!
//! Usage:
//!   sheetpad_cli <file>                    # TSV of the imported cells
//!   sheetpad_cli <file> --range B2:D10     # TSV of one region
//!   sheetpad_cli <file> --json             # JSON summary with all rows
//!   sheetpad_cli <file> --jobs             # pending translation jobs as JSON
//!   sheetpad_cli <file> --config cfg.json  # EditorConfig overrides
//!
//! Set `RUST_LOG=debug` to see import details.

#![allow(clippy::exit)]

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::env;
    use std::fs;
    use std::io::{self, Write};

    use serde::Serialize;
    use sheetpad::cell_ref::{coord_to_ref, parse_cell_range, region_to_ref};
    use sheetpad::clipboard::region_to_tsv;
    use sheetpad::import::{self, FileKind};
    use sheetpad::translate::TranslationJob;
    use sheetpad::{normalize, Coord, EditorConfig, GridSize, Region, SheetEditor};

    const USAGE: &str =
        "Usage: sheetpad_cli <file> [--range A1:C3] [--json] [--jobs] [--config cfg.json]";

    #[derive(Default)]
    struct Options {
        input: String,
        range: Option<String>,
        config: Option<String>,
        json: bool,
        jobs: bool,
    }

    #[derive(Serialize)]
    struct Summary<'a> {
        file: &'a str,
        kind: FileKind,
        dimensions: GridSize,
        /// Imported extent as an A1 range
        content: Option<String>,
        filled: usize,
        rows: Vec<Vec<String>>,
    }

    #[derive(Serialize)]
    struct JobOutput<'a> {
        cell: String,
        #[serde(flatten)]
        job: &'a TranslationJob,
    }

    fn fail(msg: &str) -> ! {
        eprintln!("{msg}");
        std::process::exit(1);
    }

    fn parse_args() -> Options {
        let mut opts = Options::default();
        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--json" => opts.json = true,
                "--jobs" => opts.jobs = true,
                "--range" => opts.range = Some(args.next().unwrap_or_else(|| fail(USAGE))),
                "--config" => opts.config = Some(args.next().unwrap_or_else(|| fail(USAGE))),
                "-h" | "--help" => {
                    println!("{USAGE}");
                    std::process::exit(0);
                }
                _ if opts.input.is_empty() && !arg.starts_with("--") => opts.input = arg,
                _ => fail(&format!("Unexpected argument: {arg}\n{USAGE}")),
            }
        }
        if opts.input.is_empty() {
            fail(USAGE);
        }
        opts
    }

    /// Extent of the imported rows, or `None` when nothing was imported.
    fn content_region(rows: &[Vec<String>]) -> Option<Region> {
        let height = u32::try_from(rows.len()).ok()?;
        let width = u32::try_from(rows.iter().map(Vec::len).max()?).ok()?;
        if height == 0 || width == 0 {
            return None;
        }
        Some(normalize(Coord::new(0, 0), Coord::new(height - 1, width - 1)))
    }

    fn print(text: &str) {
        let mut out = io::stdout().lock();
        if let Err(e) = out
            .write_all(text.as_bytes())
            .and_then(|()| out.write_all(b"\n"))
        {
            fail(&format!("Error writing output: {e}"));
        }
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value)
            .unwrap_or_else(|e| fail(&format!("Error serializing JSON: {e}")))
    }

    pub(crate) fn run() {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Warn)
            .parse_default_env()
            .init();

        let opts = parse_args();

        let config = match &opts.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .unwrap_or_else(|e| fail(&format!("Error reading {path}: {e}")));
                EditorConfig::from_json(&json)
                    .unwrap_or_else(|e| fail(&format!("Invalid config {path}: {e}")))
            }
            None => EditorConfig::default(),
        };

        let data = fs::read(&opts.input)
            .unwrap_or_else(|e| fail(&format!("Error reading {}: {e}", opts.input)));
        let kind = FileKind::detect(&opts.input, &data);
        let rows = import::load_rows_with_limit(&opts.input, &data, config.max_cells)
            .unwrap_or_else(|e| fail(&format!("Error importing {}: {e}", opts.input)));
        let content = content_region(&rows);

        let mut editor = SheetEditor::new(config);
        editor
            .load_rows(rows)
            .unwrap_or_else(|e| fail(&format!("Error loading {}: {e}", opts.input)));
        log::info!(
            "{} loaded as {kind:?}, {} non-empty cell(s)",
            opts.input,
            editor.grid().filled_count()
        );

        if opts.jobs {
            let jobs = editor.translation_jobs();
            let output: Vec<_> = jobs
                .iter()
                .map(|job| JobOutput {
                    cell: coord_to_ref(job.coord),
                    job,
                })
                .collect();
            print(&to_json(&output));
            return;
        }

        if opts.json {
            let summary = Summary {
                file: &opts.input,
                kind,
                dimensions: editor.dimensions(),
                content: content.map(region_to_ref),
                filled: editor.grid().filled_count(),
                rows: editor.grid().to_rows(),
            };
            print(&to_json(&summary));
            return;
        }

        let region = match &opts.range {
            Some(range) => {
                let region = parse_cell_range(range)
                    .unwrap_or_else(|| fail(&format!("Invalid range: {range}")));
                if !region.fits(editor.dimensions()) {
                    let size = editor.dimensions();
                    fail(&format!(
                        "Range {range} is outside the {}x{} grid",
                        size.rows(), size.cols()
                    ));
                }
                region
            }
            None => match content {
                Some(region) => region,
                None => return,
            },
        };
        print(&region_to_tsv(editor.grid(), region));
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    cli::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
