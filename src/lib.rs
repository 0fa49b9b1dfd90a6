//! Generate a SQL Server table and its CRUD stored procedures from a
//! described record type.
pub mod catalog;
pub mod cli;
pub mod codegen;
pub mod describe;
pub mod error;
pub mod ir;
pub mod logging;
pub mod lower;
pub mod naming;
pub mod path_de;
pub mod pipeline;
pub mod prompt;
pub mod refine;
pub mod resolve;
pub mod sink;

pub use error::{Error, Result, SchemaError};
pub use pipeline::{GenerateRequest, GenerationReport, Pipeline};
