//! Ask for the column sizes a type description cannot carry: string lengths,
//! and decimal precision and scale. No other type is ever asked about.

use std::num::NonZeroU32;

use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::ir::{FieldDescriptor, Length, TypeSchema};
use crate::prompt::InputProvider;

pub fn length_message(field: &str) -> String {
    format!("Please enter the length for {field}")
}

pub fn precision_message(field: &str) -> String {
    format!("Please enter the precision for {field}")
}

pub fn scale_message(field: &str) -> String {
    format!("Please enter the scale for {field}")
}

/// Walk the fields in order, prompting once for each string and twice for each
/// decimal/double. The first bad answer aborts the walk.
pub fn refine(schema: TypeSchema, input: &mut dyn InputProvider) -> Result<TypeSchema> {
    let TypeSchema { type_name, table_name, fields } = schema;
    let fields = fields
        .into_iter()
        .map(|field| refine_field(field, &mut *input))
        .collect::<Result<Vec<_>>>()?;
    Ok(TypeSchema { type_name, table_name, fields })
}

fn refine_field(field: FieldDescriptor, input: &mut dyn InputProvider) -> Result<FieldDescriptor> {
    let ty = field.semantic_type;
    if ty.needs_length() {
        let answer = input.prompt(&length_message(&field.name))?;
        let length = parse_length(&field.name, &answer)?;
        debug!(field = %field.name, %length, "length");
        Ok(field.with_length(length))
    } else if ty.needs_precision_and_scale() {
        let answer = input.prompt(&precision_message(&field.name))?;
        let precision = parse_size(&field.name, "precision", &answer)?;
        let answer = input.prompt(&scale_message(&field.name))?;
        let scale = parse_size(&field.name, "scale", &answer)?;
        debug!(field = %field.name, precision, scale, "precision and scale");
        Ok(field.with_precision(precision, scale))
    } else {
        Ok(field)
    }
}

fn parse_length(field: &str, answer: &str) -> std::result::Result<Length, SchemaError> {
    let trimmed = answer.trim();
    if trimmed.eq_ignore_ascii_case("MAX") {
        return Ok(Length::Max);
    }
    let n = parse_int(field, "length", answer)?;
    if n <= 0 {
        return Err(out_of_range(field, "length", answer, "must be a positive integer or MAX"));
    }
    u32::try_from(n)
        .ok()
        .and_then(NonZeroU32::new)
        .map(Length::Chars)
        .ok_or_else(|| out_of_range(field, "length", answer, TOO_LARGE))
}

fn parse_size(field: &str, what: &'static str, answer: &str) -> std::result::Result<u32, SchemaError> {
    let n = parse_int(field, what, answer)?;
    if n < 0 {
        return Err(out_of_range(field, what, answer, "must not be negative"));
    }
    u32::try_from(n).map_err(|_| out_of_range(field, what, answer, TOO_LARGE))
}

const TOO_LARGE: &str = "must not exceed 4294967295";

/// Integers too wide for `i64` are still integers: they are out of range,
/// not unparsable.
fn parse_int(field: &str, what: &'static str, answer: &str) -> std::result::Result<i64, SchemaError> {
    let trimmed = answer.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(n);
    }
    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let reason = if trimmed.starts_with('-') { "must not be negative" } else { TOO_LARGE };
        return Err(out_of_range(field, what, answer, reason));
    }
    Err(SchemaError::UnparsableNumber {
        field: field.to_string(),
        what,
        input: answer.to_string(),
    })
}

fn out_of_range(field: &str, what: &'static str, answer: &str, reason: &'static str) -> SchemaError {
    SchemaError::OutOfRange {
        field: field.to_string(),
        what,
        input: answer.to_string(),
        reason,
    }
}

// ------------------------------- Tests ------------------------------------ //
