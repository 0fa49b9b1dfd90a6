//! Minimal CLI: describe → (sql | schema)
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::describe::DescriptionCatalog;
use crate::pipeline::{GenerateRequest, Pipeline};
use crate::prompt::{ConsoleInput, InputProvider, ScriptedInput};
use crate::sink::{DirectorySink, MemorySink, OutputSink, StdoutSink};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate a SQL Server table and CRUD stored procedures from a described record type
#[derive(Parser, Debug)]
#[command(name = "crud-sqlgen", version)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// log stage detail to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit the table DDL and the five CRUD procedures
    Sql(SqlOut),
    /// print the mapped schema as JSON (debug view)
    Schema(SchemaOut),
}

#[derive(Args, Debug, Clone)]
struct TypeSettings {
    /// One or more type description files. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// type to generate for; full (`shop::Order`) or unique short name (`Order`)
    #[arg(long, short = 't')]
    type_name: String,

    /// also map private fields
    #[arg(long, default_value_t = false)]
    include_private: bool,

    /// JSON object of prompt → answer; prompts go to the console when omitted
    #[arg(long)]
    answers: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct SqlOut {
    #[command(flatten)]
    type_settings: TypeSettings,

    /// output directory for the .sql files (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// database schema; asked for when omitted
    #[arg(long, env = "CRUD_SQLGEN_SCHEMA")]
    schema: Option<String>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    type_settings: TypeSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypeSettings {
    fn catalog(&self) -> anyhow::Result<DescriptionCatalog> {
        DescriptionCatalog::load(&self.input).context("failed to load type descriptions")
    }

    fn input_provider(&self) -> anyhow::Result<Box<dyn InputProvider>> {
        match self.answers.as_ref() {
            Some(path) => {
                let scripted = ScriptedInput::from_file(path)
                    .with_context(|| format!("failed to load answers from {}", path.display()))?;
                Ok(Box::new(scripted))
            }
            None => Ok(Box::new(ConsoleInput::stdio())),
        }
    }

    fn request(&self) -> GenerateRequest {
        GenerateRequest::new(&self.type_name).include_private(self.include_private)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Sql(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let settings = &target.type_settings;
                let sink: Box<dyn OutputSink> = match target.out.as_ref() {
                    Some(dir) => Box::new(DirectorySink::new(dir)),
                    None => Box::new(StdoutSink),
                };
                let mut request = settings.request();
                request.schema = target.schema.clone();

                let mut pipeline = Pipeline::new(settings.catalog()?, settings.input_provider()?, sink);
                let report = pipeline
                    .run(&request)
                    .with_context(|| format!("failed to generate SQL for `{}`", settings.type_name))?;

                if let Some(dir) = target.out.as_ref() {
                    eprintln!(
                        "{} {} files for {}.{} in {}",
                        "wrote".green().bold(),
                        report.artifact_names.len(),
                        report.schema_name,
                        report.schema.table_name,
                        dir.display(),
                    );
                }
                Ok(())
            }
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let settings = &target.type_settings;
                let mut pipeline =
                    Pipeline::new(settings.catalog()?, settings.input_provider()?, MemorySink::new());
                let schema = pipeline
                    .inspect(&settings.request())
                    .with_context(|| format!("failed to map `{}`", settings.type_name))?;
                let schema_src = serde_json::to_string_pretty(&schema)?;
                write_or_print(target.out.as_ref(), &schema_src)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_or_print(out: Option<&PathBuf>, source: &str) -> anyhow::Result<()> {
    let Some(out) = out else {
        println!("{source}");
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, source).with_context(|| format!("failed to write {}", out.display()))
}

// ------------------------------- Tests ------------------------------------ //
