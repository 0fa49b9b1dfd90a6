use indexmap::IndexSet;

use crate::error::{Result, SchemaError};
use crate::prompt::InputProvider;

/// Field name that is an identity without asking.
pub const DEFAULT_IDENTITY: &str = "Id";

pub const IDENTITY_PROMPT: &str =
    "No Id field was found. Please enter a comma-delimited list of the identity field names";

/// Ask for the identity field names of a type that has no `Id` field.
/// Several names make a compound identity, kept in the order given.
pub fn ask_for_identity(input: &mut dyn InputProvider, type_name: &str) -> Result<Vec<String>> {
    let answer = input.prompt(IDENTITY_PROMPT)?;
    let names = parse_identity_list(&answer);
    if names.is_empty() {
        return Err(SchemaError::NoIdentity { type_name: type_name.to_string() }.into());
    }
    Ok(names)
}

/// `" B, A ,,B"` → `["B", "A"]`
pub fn parse_identity_list(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
