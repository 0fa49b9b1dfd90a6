// Strongly-typed schema IR shared by every stage. Each stage takes a value and
// hands back a new one; nothing here is shared or mutated behind a reference.

use std::fmt;
use std::num::NonZeroU32;
use std::ops::Deref;

use serde::{Serialize, Serializer};

use crate::catalog::SemanticType;

/// Column length for `VARCHAR` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Chars(NonZeroU32),
    Max,                     // unbounded marker, rendered `MAX`
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Chars(n) => write!(f, "{n}"),
            Length::Max => f.write_str("MAX"),
        }
    }
}

impl Serialize for Length {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,                 // as written in the source type
    pub semantic_type: SemanticType,
    pub is_identity: bool,
    pub is_nullable: bool,
    pub length: Option<Length>,       // strings only, set by the refiner
    pub precision: u32,               // decimal/double only
    pub scale: u32,                   // decimal/double only
    pub sql_name: String,             // empty until lowered
    pub sql_type: String,             // empty until lowered; carries NULL / NOT NULL
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            is_identity: false,
            is_nullable: false,
            length: None,
            precision: 0,
            scale: 0,
            sql_name: String::new(),
            sql_type: String::new(),
        }
    }

    pub fn identity(mut self) -> Self {
        self.is_identity = true;
        self
    }

    pub fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    pub fn with_length(mut self, length: Length) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }

    /// `sql_type` without its trailing `NULL` / `NOT NULL`.
    pub fn sql_base_type(&self) -> &str {
        self.sql_type
            .strip_suffix(" NOT NULL")
            .or_else(|| self.sql_type.strip_suffix(" NULL"))
            .unwrap_or(&self.sql_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSchema {
    pub type_name: String,
    pub table_name: String,              // snake_case(type_name)
    pub fields: Vec<FieldDescriptor>,    // source order; at least one identity
}

impl TypeSchema {
    pub fn identity_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.is_identity)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// A `TypeSchema` whose every field carries `sql_name` and `sql_type`.
/// Only `lower::lower_schema` builds one, so the generator never sees an
/// unmapped field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MappedSchema(TypeSchema);

impl MappedSchema {
    pub(crate) fn new_unchecked(schema: TypeSchema) -> Self {
        debug_assert!(schema
            .fields
            .iter()
            .all(|f| !f.sql_name.is_empty() && !f.sql_type.is_empty()));
        Self(schema)
    }

    pub fn into_inner(self) -> TypeSchema {
        self.0
    }
}

impl Deref for MappedSchema {
    type Target = TypeSchema;

    fn deref(&self) -> &TypeSchema {
        &self.0
    }
}

/// One named unit of generated SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SqlArtifact {
    pub name: String,
    pub content: String,
}

// ------------------------------- Tests ------------------------------------ //
