use tracing::debug;

use crate::catalog::SemanticType;
use crate::ir::{FieldDescriptor, Length, MappedSchema, TypeSchema};
use crate::naming::snake_case;
use crate::resolve::DEFAULT_IDENTITY;

/// Lower every field of a resolved (and refined) schema to SQL.
pub fn lower_schema(schema: TypeSchema) -> MappedSchema {
    let fields = schema
        .fields
        .iter()
        .map(|f| map_field(f, &schema.table_name))
        .collect();
    MappedSchema::new_unchecked(TypeSchema { fields, ..schema })
}

/// Assign `sql_name` and `sql_type` to one field. Pure: the result depends
/// only on the field's name, identity flag, type, nullability and sizes, so
/// mapping an already-mapped field changes nothing.
pub fn map_field(field: &FieldDescriptor, table_name: &str) -> FieldDescriptor {
    let sql_name = sql_name(field, table_name);
    let nullability = if field.is_nullable { "NULL" } else { "NOT NULL" };
    let sql_type = format!("{} {nullability}", base_sql_type(field));
    debug!(field = %field.name, %sql_name, %sql_type, "mapped field");
    FieldDescriptor { sql_name, sql_type, ..field.clone() }
}

/// Only the canonical `Id` identity gets the table prefix (`Id` on table
/// `test` → `test_id`); compound or renamed identities keep their own name.
fn sql_name(field: &FieldDescriptor, table_name: &str) -> String {
    let name = snake_case(&field.name);
    if field.is_identity && field.name == DEFAULT_IDENTITY {
        format!("{table_name}_{name}")
    } else {
        name
    }
}

fn base_sql_type(field: &FieldDescriptor) -> String {
    match field.semantic_type {
        SemanticType::Bool => "BIT".to_string(),
        SemanticType::Int | SemanticType::Enum => "INT".to_string(),
        SemanticType::DateTime => "DATETIME".to_string(),
        SemanticType::Decimal | SemanticType::Double => {
            format!("DECIMAL({}, {})", field.precision, field.scale)
        }
        // lists are never asked for a length, so they default to unbounded
        SemanticType::List | SemanticType::String => {
            format!("VARCHAR({})", field.length.unwrap_or(Length::Max))
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn chars(n: u32) -> Length {
        Length::Chars(NonZeroU32::new(n).unwrap())
    }

    #[test]
    fn sql_name_is_snake_case() {
        let field = FieldDescriptor::new("PublicTestString", SemanticType::Int);
        assert_eq!(map_field(&field, "test").sql_name, "public_test_string");
    }

    #[test]
    fn default_identity_gets_table_prefix() {
        let id = FieldDescriptor::new("Id", SemanticType::Int).identity();
        assert_eq!(map_field(&id, "test").sql_name, "test_id");

        // an `Id` that is not the identity, or an identity under another name, is left alone
        let plain = FieldDescriptor::new("Id", SemanticType::Int);
        assert_eq!(map_field(&plain, "test").sql_name, "id");
        let renamed = FieldDescriptor::new("TestIdProperty", SemanticType::Int).identity();
        assert_eq!(map_field(&renamed, "test").sql_name, "test_id_property");
    }

    #[test]
    fn base_types() {
        let cases = [
            (SemanticType::Bool, "BIT"),
            (SemanticType::Int, "INT"),
            (SemanticType::DateTime, "DATETIME"),
            (SemanticType::Decimal, "DECIMAL"),
            (SemanticType::Double, "DECIMAL"),
            (SemanticType::Enum, "INT"),
            (SemanticType::List, "VARCHAR"),
            (SemanticType::String, "VARCHAR"),
        ];
        assert_eq!(cases.len(), SemanticType::ALL.len());
        for (ty, expected) in cases {
            let mapped = map_field(&FieldDescriptor::new("x", ty), "t");
            assert!(mapped.sql_type.starts_with(expected), "{ty}: {}", mapped.sql_type);
        }
    }

    #[test]
    fn sizes_are_rendered() {
        let string = FieldDescriptor::new("s", SemanticType::String).with_length(chars(5));
        assert_eq!(map_field(&string, "t").sql_type, "VARCHAR(5) NOT NULL");

        let max = FieldDescriptor::new("s", SemanticType::String).with_length(Length::Max);
        assert_eq!(map_field(&max, "t").sql_type, "VARCHAR(MAX) NOT NULL");

        let list = FieldDescriptor::new("l", SemanticType::List);
        assert_eq!(map_field(&list, "t").sql_type, "VARCHAR(MAX) NOT NULL");

        for ty in [SemanticType::Decimal, SemanticType::Double] {
            let field = FieldDescriptor::new("d", ty).with_precision(7, 5);
            assert_eq!(map_field(&field, "t").sql_type, "DECIMAL(7, 5) NOT NULL");
        }
    }

    #[test]
    fn nullability_suffix() {
        let nullable = FieldDescriptor::new("Count", SemanticType::Int).nullable(true);
        assert_eq!(map_field(&nullable, "t").sql_type, "INT NULL");
        let required = FieldDescriptor::new("Count", SemanticType::Int);
        assert_eq!(map_field(&required, "t").sql_type, "INT NOT NULL");
    }

    #[test]
    fn mapping_twice_changes_nothing() {
        let field = FieldDescriptor::new("Id", SemanticType::Int).identity();
        let once = map_field(&field, "test_class");
        let twice = map_field(&once, "test_class");
        assert_eq!(once, twice);
    }

    #[test]
    fn lower_schema_maps_every_field_in_place() {
        let schema = TypeSchema {
            type_name: "TestClass".into(),
            table_name: "test_class".into(),
            fields: vec![
                FieldDescriptor::new("Id", SemanticType::Int).identity(),
                FieldDescriptor::new("TestProperty", SemanticType::String).with_length(chars(128)),
            ],
        };
        let mapped = lower_schema(schema);
        let columns: Vec<_> = mapped
            .fields
            .iter()
            .map(|f| (f.sql_name.as_str(), f.sql_type.as_str()))
            .collect();
        assert_eq!(
            columns,
            [("test_class_id", "INT NOT NULL"), ("test_property", "VARCHAR(128) NOT NULL")]
        );
    }
}
