//! Closed set of field types the generator understands, and the rules that
//! classify a native (Rust-spelled) type tag into one of them.
//!
//! Classification is the only place an unsupported type can appear: it comes
//! back as `None` and the resolver drops the field. Everything downstream
//! matches on `SemanticType` exhaustively.

use std::collections::BTreeSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Bool,
    Int,
    DateTime,
    Decimal,
    Double,
    Enum,   // any enumeration type
    List,   // any homogeneous ordered collection
    String,
}

impl SemanticType {
    pub const ALL: [SemanticType; 8] = [
        SemanticType::Bool,
        SemanticType::Int,
        SemanticType::DateTime,
        SemanticType::Decimal,
        SemanticType::Double,
        SemanticType::Enum,
        SemanticType::List,
        SemanticType::String,
    ];

    /// Only strings are asked for a column length.
    pub fn needs_length(self) -> bool {
        matches!(self, SemanticType::String)
    }

    pub fn needs_precision_and_scale(self) -> bool {
        matches!(self, SemanticType::Decimal | SemanticType::Double)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Bool => "bool",
            SemanticType::Int => "int",
            SemanticType::DateTime => "date_time",
            SemanticType::Decimal => "decimal",
            SemanticType::Double => "double",
            SemanticType::Enum => "enum",
            SemanticType::List => "list",
            SemanticType::String => "string",
        };
        f.write_str(name)
    }
}

/// Result of classifying one native type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeClass {
    pub semantic: SemanticType,
    pub optional: bool, // tag was `Option<T>`
}

// ------------------------------- Patterns --------------------------------- //

static OPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:std|core)::option::)?Option\s*<\s*(?P<inner>.+?)\s*>$").unwrap()
});

static LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:(?:[A-Za-z_]\w*::)*(?:Vec|VecDeque|LinkedList)\s*<.+>",
        r"|\[.+;\s*\w+\s*\]",
        r"|&\s*(?:'\w+\s+)?(?:mut\s+)?\[.+\]",
        r"|Box\s*<\s*\[.+\]\s*>)$",
    ))
    .unwrap()
});

static DATE_TIME_GENERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z_]\w*::)*DateTime\s*<.+>$").unwrap()
});

static BORROWED_STR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:&\s*(?:'\w+\s+)?(?:mut\s+)?str",
        r"|Box\s*<\s*str\s*>",
        r"|(?:[A-Za-z_]\w*::)*Cow\s*<\s*(?:'\w+\s*,\s*)?str\s*>)$",
    ))
    .unwrap()
});

// ----------------------------- Classification ----------------------------- //

/// Classify a native type tag. `enums` holds the names the description
/// declares as enumerations (short or path-qualified).
pub fn classify(tag: &str, enums: &BTreeSet<String>) -> Option<NativeClass> {
    let tag = tag.trim();

    if let Some(caps) = OPTION.captures(tag) {
        let inner = classify(&caps["inner"], enums)?;
        return Some(NativeClass { optional: true, ..inner });
    }

    let semantic = classify_concrete(tag, enums)?;
    Some(NativeClass { semantic, optional: false })
}

fn classify_concrete(tag: &str, enums: &BTreeSet<String>) -> Option<SemanticType> {
    if LIST.is_match(tag) {
        return Some(SemanticType::List);
    }
    if DATE_TIME_GENERIC.is_match(tag) {
        return Some(SemanticType::DateTime);
    }
    if BORROWED_STR.is_match(tag) {
        return Some(SemanticType::String);
    }
    if enums.contains(tag) {
        return Some(SemanticType::Enum);
    }

    // plain names from here on; generics we did not recognise are unsupported
    if tag.contains('<') {
        return None;
    }
    let short = tag.rsplit("::").next().unwrap_or(tag);
    let semantic = match short {
        "bool" => SemanticType::Bool,
        // everything that fits in a 32-bit signed INT
        "i8" | "i16" | "i32" | "u8" | "u16" => SemanticType::Int,
        "f32" | "f64" => SemanticType::Double,
        "Decimal" | "BigDecimal" => SemanticType::Decimal,
        "NaiveDateTime" | "DateTime" | "OffsetDateTime" | "PrimitiveDateTime" | "SystemTime" => {
            SemanticType::DateTime
        }
        "String" | "str" => SemanticType::String,
        // either side may be path-qualified
        _ if enums.iter().any(|e| e.rsplit("::").next() == Some(short)) => SemanticType::Enum,
        _ => return None,
    };
    Some(semantic)
}

// ------------------------------- Tests ------------------------------------ //
