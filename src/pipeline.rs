//! One generation run: describe → resolve → refine → lower → generate →
//! persist. Each stage consumes the previous stage's value.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::codegen;
use crate::describe::{TypeIntrospector, VisibilityPolicy};
use crate::error::Result;
use crate::ir::{MappedSchema, SqlArtifact};
use crate::lower::lower_schema;
use crate::prompt::InputProvider;
use crate::refine::refine;
use crate::resolve::resolve;
use crate::sink::OutputSink;

pub const SCHEMA_PROMPT: &str = "What is the schema name?";
pub const DEFAULT_SCHEMA: &str = "dbo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub type_name: String,
    pub include_private: bool,
    pub schema: Option<String>,      // asked for when unset
}

impl GenerateRequest {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), include_private: false, schema: None }
    }

    pub fn include_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub schema: MappedSchema,
    pub schema_name: String,
    pub artifact_names: Vec<String>,  // in generation order
}

pub struct Pipeline<I, P, S> {
    introspector: I,
    input: P,
    sink: S,
}

impl<I, P, S> Pipeline<I, P, S>
where
    I: TypeIntrospector,
    P: InputProvider,
    S: OutputSink,
{
    pub fn new(introspector: I, input: P, sink: S) -> Self {
        Self { introspector, input, sink }
    }

    pub fn run(&mut self, request: &GenerateRequest) -> Result<GenerationReport> {
        info!(type_name = %request.type_name, "generating CRUD SQL");
        let schema = self.inspect(request)?;
        let schema_name = self.schema_name(request)?;
        let artifacts = codegen::generate(&schema, &schema_name);
        self.persist(&artifacts)?;

        let artifact_names: Vec<String> = artifacts.into_iter().map(|a| a.name).collect();
        info!(
            table = %schema.table_name,
            schema = %schema_name,
            artifacts = artifact_names.len(),
            "generation finished"
        );
        Ok(GenerationReport { schema, schema_name, artifact_names })
    }

    /// Everything up to (and including) SQL type mapping; nothing is written.
    pub fn inspect(&mut self, request: &GenerateRequest) -> Result<MappedSchema> {
        let description = self
            .introspector
            .describe(&request.type_name, request.include_private)?;
        let policy = VisibilityPolicy::from_include_private(request.include_private);
        let schema = resolve(&description, policy, &mut self.input)?;
        let schema = refine(schema, &mut self.input)?;
        Ok(lower_schema(schema))
    }

    pub fn into_parts(self) -> (I, P, S) {
        (self.introspector, self.input, self.sink)
    }

    fn schema_name(&mut self, request: &GenerateRequest) -> Result<String> {
        if let Some(schema) = request.schema.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return Ok(schema.to_string());
        }
        let answer = self.input.prompt(SCHEMA_PROMPT)?;
        let answer = answer.trim();
        if answer.is_empty() {
            warn!("no schema name given, using {DEFAULT_SCHEMA}");
            return Ok(DEFAULT_SCHEMA.to_string());
        }
        Ok(answer.to_string())
    }

    fn persist(&self, artifacts: &[SqlArtifact]) -> Result<()> {
        let sink = &self.sink;
        let write = |artifact: &SqlArtifact| -> Result<()> {
            sink.write(&artifact.name, &artifact.content)?;
            info!(name = %artifact.name, "artifact written");
            Ok(())
        };
        if sink.supports_parallel_writes() {
            debug!(count = artifacts.len(), "writing artifacts in parallel");
            artifacts.par_iter().try_for_each(write)
        } else {
            artifacts.iter().try_for_each(write)
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::DescriptionCatalog;
    use crate::error::{Error, SchemaError};
    use crate::prompt::ScriptedInput;
    use crate::refine::length_message;
    use crate::resolve::IDENTITY_PROMPT;
    use crate::sink::MemorySink;

    const DESCRIPTIONS: &str = r#"{
        "types": [
            { "name": "tests::TestClass",
              "fields": [
                  { "name": "Id", "type": "i32" },
                  { "name": "TestProperty", "type": "String" },
                  { "name": "AnotherTestProperty", "type": "i32" }
              ] },
            { "name": "tests::NoKey",
              "fields": [ { "name": "Label", "type": "String" } ] }
        ]
    }"#;

    fn pipeline(input: ScriptedInput) -> Pipeline<DescriptionCatalog, ScriptedInput, MemorySink> {
        let catalog = DescriptionCatalog::from_json_str(DESCRIPTIONS).unwrap();
        Pipeline::new(catalog, input, MemorySink::new())
    }

    #[test]
    fn run_writes_six_artifacts_in_order() {
        let input = ScriptedInput::new()
            .answer(length_message("TestProperty"), "128")
            .answer(SCHEMA_PROMPT, "dbo");
        let mut pipeline = pipeline(input);
        let report = pipeline.run(&GenerateRequest::new("TestClass")).unwrap();

        assert_eq!(report.schema_name, "dbo");
        assert_eq!(report.artifact_names.len(), 6);
        assert_eq!(report.artifact_names[0], "dbo.test_class.sql");

        let (_, input, sink) = pipeline.into_parts();
        assert_eq!(sink.names(), report.artifact_names);
        assert_eq!(input.asked(), [length_message("TestProperty"), SCHEMA_PROMPT.to_string()]);
    }

    #[test]
    fn schema_from_request_is_not_asked() {
        let input = ScriptedInput::new().with_default("10");
        let mut pipeline = pipeline(input);
        let request = GenerateRequest::new("TestClass").with_schema("sales");
        let report = pipeline.run(&request).unwrap();
        assert_eq!(report.schema_name, "sales");
        let (_, input, _) = pipeline.into_parts();
        assert!(!input.asked().iter().any(|p| p == SCHEMA_PROMPT));
    }

    #[test]
    fn blank_schema_falls_back_to_dbo() {
        let input = ScriptedInput::new()
            .answer(length_message("TestProperty"), "MAX")
            .answer(SCHEMA_PROMPT, "   ");
        let report = pipeline(input).run(&GenerateRequest::new("TestClass")).unwrap();
        assert_eq!(report.schema_name, DEFAULT_SCHEMA);
    }

    #[test]
    fn unknown_type_writes_nothing() {
        let mut pipeline = pipeline(ScriptedInput::new());
        let err = pipeline.run(&GenerateRequest::new("Missing")).unwrap_err();
        assert!(matches!(err, Error::TypeNotFound { ref type_name } if type_name == "Missing"));
        let (_, _, sink) = pipeline.into_parts();
        assert!(sink.names().is_empty());
    }

    #[test]
    fn schema_errors_stop_before_output() {
        let input = ScriptedInput::new().answer(IDENTITY_PROMPT, "Label");
        let mut pipeline = pipeline(input);
        let err = pipeline.run(&GenerateRequest::new("NoKey")).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::NonIntegerIdentity { .. })));
        let (_, input, sink) = pipeline.into_parts();
        assert!(sink.names().is_empty());
        assert_eq!(input.asked(), [IDENTITY_PROMPT]);
    }

    #[test]
    fn inspect_maps_without_writing() {
        let input = ScriptedInput::new().with_default("64");
        let mut pipeline = pipeline(input);
        let schema = pipeline.inspect(&GenerateRequest::new("tests::TestClass")).unwrap();
        assert_eq!(schema.field("TestProperty").unwrap().sql_type, "VARCHAR(64) NOT NULL");
        let (_, input, sink) = pipeline.into_parts();
        assert!(sink.names().is_empty());
        assert!(!input.asked().iter().any(|p| p == SCHEMA_PROMPT));
    }
}
