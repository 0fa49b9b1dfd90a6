//! Golden-file runner: every directory under `cases/` holds
//! `types.json`, `case.json` and `expected/*.sql`. Generated artifacts are
//! compared byte for byte.
//!
//! Usage: `cargo run -p dev-test-runner -- [CASE_NAME_REGEX]`
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crud_sqlgen::describe::DescriptionCatalog;
use crud_sqlgen::prompt::ScriptedInput;
use crud_sqlgen::sink::MemorySink;
use crud_sqlgen::{GenerateRequest, Pipeline};

#[derive(Debug, Deserialize)]
struct Case {
    type_name: String,
    #[serde(default)]
    include_private: bool,
    schema: Option<String>,
    #[serde(default)]
    answers: IndexMap<String, String>,
}

fn main() -> ExitCode {
    let filter = match std::env::args().nth(1).map(|f| Regex::new(&f)).transpose() {
        Ok(filter) => filter,
        Err(error) => {
            eprintln!("{} {error}", "invalid filter:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let cases_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("cases");
    let cases = match list_cases(&cases_dir) {
        Ok(cases) => cases,
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0usize;
    let mut ran = 0usize;
    for case_dir in cases {
        let name = case_dir.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        if filter.as_ref().is_some_and(|re| !re.is_match(&name)) {
            continue;
        }
        ran += 1;
        match run_case(&case_dir) {
            Ok(()) => println!("{} {name}", "PASS".green().bold()),
            Err(problems) => {
                failed += 1;
                println!("{} {name}", "FAIL".red().bold());
                for problem in problems {
                    println!("    {problem}");
                }
            }
        }
    }

    println!("{ran} cases, {failed} failed");
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn list_cases(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir).map_err(|e| format!("{}: {e}", dir.display()))?;
    let mut cases: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.join("case.json").is_file())
        .collect();
    cases.sort();
    Ok(cases)
}

fn run_case(dir: &Path) -> Result<(), Vec<String>> {
    let case: Case = crud_sqlgen::path_de::read_json_file(&dir.join("case.json")).map_err(|e| vec![e.to_string()])?;
    let catalog = DescriptionCatalog::load([dir.join("types.json").display().to_string()])
        .map_err(|e| vec![e.to_string()])?;

    let sink = MemorySink::new();
    let mut request = GenerateRequest::new(&case.type_name).include_private(case.include_private);
    request.schema = case.schema;
    Pipeline::new(catalog, ScriptedInput::from_answers(case.answers), &sink)
        .run(&request)
        .map_err(|e| vec![e.to_string()])?;
    let actual = sink.into_inner();

    let expected_dir = dir.join("expected");
    let mut expected_names = Vec::new();
    let mut problems = Vec::new();
    let entries = fs::read_dir(&expected_dir).map_err(|e| vec![format!("{}: {e}", expected_dir.display())])?;
    for path in entries.filter_map(|entry| entry.ok().map(|e| e.path())) {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let expected = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                problems.push(format!("{}: {e}", path.display()));
                continue;
            }
        };
        match actual.get(&name) {
            None => problems.push(format!("{name}: not generated")),
            Some(text) if text != &expected => {
                problems.push(format!("{name}: differs\n--- expected\n{expected}\n--- actual\n{text}"))
            }
            Some(_) => {}
        }
        expected_names.push(name);
    }
    for name in actual.keys().filter(|n| !expected_names.contains(n)) {
        problems.push(format!("{name}: generated but not expected"));
    }

    if problems.is_empty() { Ok(()) } else { Err(problems) }
}
