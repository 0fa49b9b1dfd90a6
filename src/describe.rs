//! Type introspection from JSON type-description files.
//!
//! A description file lists the types a program defines, field by field, with
//! each field's type spelled as it is written in Rust:
//!
//! ```json
//! {
//!   "enums": ["OrderStatus"],
//!   "types": [
//!     { "name": "shop::models::Order",
//!       "fields": [
//!         { "name": "Id", "type": "i32" },
//!         { "name": "Status", "type": "OrderStatus" },
//!         { "name": "Note", "type": "Option<String>" },
//!         { "name": "Secret", "type": "String", "visibility": "private" } ] } ]
//! }
//! ```
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Which fields of a type take part in generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityPolicy {
    #[default]
    PublicOnly,
    IncludePrivate,
}

impl VisibilityPolicy {
    pub fn from_include_private(include_private: bool) -> Self {
        if include_private { Self::IncludePrivate } else { Self::PublicOnly }
    }

    pub fn admits(self, visibility: Visibility) -> bool {
        match self {
            VisibilityPolicy::PublicOnly => visibility == Visibility::Public,
            VisibilityPolicy::IncludePrivate => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub visibility: Visibility,
}

impl RawField {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            nullable: false,
            visibility: Visibility::Public,
        }
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// What the resolver gets for one type: its short name, its raw fields in
/// declaration order, and the enumeration names in scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeDescription {
    pub name: String,
    pub fields: Vec<RawField>,
    pub enums: BTreeSet<String>,
}

impl TypeDescription {
    pub fn new(name: impl Into<String>, fields: Vec<RawField>) -> Self {
        Self { name: name.into(), fields, enums: BTreeSet::new() }
    }

    pub fn with_enums<I, S>(mut self, enums: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enums.extend(enums.into_iter().map(Into::into));
        self
    }
}

/// Supplies the raw field list of a named type.
pub trait TypeIntrospector {
    fn describe(&self, type_name: &str, include_private: bool) -> Result<TypeDescription>;
}

#[derive(Debug, Deserialize)]
struct DescriptionFile {
    #[serde(default)]
    enums: Vec<String>,
    types: Vec<TypeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct TypeEntry {
    name: String,
    fields: Vec<RawField>,
}

/// Every type from one or more description files, keyed by full name in the
/// order the files declared them.
#[derive(Debug, Default)]
pub struct DescriptionCatalog {
    types: IndexMap<String, TypeEntry>,
    enums: BTreeSet<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl DescriptionCatalog {
    /// Load every file matched by `patterns` (literal paths or quoted globs).
    pub fn load<I>(patterns: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut catalog = Self::default();
        for path in resolve_file_path_patterns(patterns)? {
            let file: DescriptionFile = crate::path_de::read_json_file(&path)?;
            catalog.add_file(&path, file)?;
        }
        Ok(catalog)
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        let path = Path::new("<inline>");
        let file = crate::path_de::from_str_with_path::<DescriptionFile>(source)
            .map_err(|message| Error::Description { path: path.to_path_buf(), message })?;
        let mut catalog = Self::default();
        catalog.add_file(path, file)?;
        Ok(catalog)
    }

    fn add_file(&mut self, path: &Path, file: DescriptionFile) -> Result<()> {
        debug!(path = %path.display(), types = file.types.len(), "loaded type descriptions");
        self.enums.extend(file.enums);
        for entry in file.types {
            if self.types.contains_key(&entry.name) {
                return Err(Error::Description {
                    path: path.to_path_buf(),
                    message: format!("type `{}` is described more than once", entry.name),
                });
            }
            self.types.insert(entry.name.clone(), entry);
        }
        Ok(())
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    // exact full name first, then a unique match on the last path segment
    fn lookup(&self, type_name: &str) -> Option<&TypeEntry> {
        if let Some(entry) = self.types.get(type_name) {
            return Some(entry);
        }
        let mut by_short = self.types.values().filter(|t| short_type_name(&t.name) == type_name);
        match (by_short.next(), by_short.next()) {
            (Some(entry), None) => Some(entry),
            _ => None,
        }
    }
}

impl TypeIntrospector for DescriptionCatalog {
    fn describe(&self, type_name: &str, include_private: bool) -> Result<TypeDescription> {
        let entry = self.lookup(type_name).ok_or_else(|| Error::TypeNotFound {
            type_name: type_name.to_string(),
        })?;
        let policy = VisibilityPolicy::from_include_private(include_private);
        Ok(TypeDescription {
            name: short_type_name(&entry.name).to_string(),
            fields: entry
                .fields
                .iter()
                .filter(|f| policy.admits(f.visibility))
                .cloned()
                .collect(),
            enums: self.enums.clone(),
        })
    }
}

/// `shop::models::Order` → `Order`
pub fn short_type_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let entries = glob::glob(pattern).map_err(|e| Error::Pattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;
            let mut matched_any = false;
            for entry in entries {
                let path = entry.map_err(|e| Error::Pattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
                matched_any = true;
                out.push(path);
            }
            if !matched_any {
                // an explicit glob must match at least one file
                return Err(Error::Pattern {
                    pattern: pattern.to_string(),
                    message: "matched no files".to_string(),
                });
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //
