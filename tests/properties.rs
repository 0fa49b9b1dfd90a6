use std::collections::BTreeSet;

use proptest::prelude::*;

use crud_sqlgen::catalog::SemanticType;
use crud_sqlgen::codegen::generate;
use crud_sqlgen::ir::{FieldDescriptor, Length, TypeSchema};
use crud_sqlgen::lower::{lower_schema, map_field};
use crud_sqlgen::naming::snake_case;

fn semantic_type() -> impl Strategy<Value = SemanticType> {
    prop::sample::select(SemanticType::ALL.to_vec())
}

fn pascal_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{1,6}([A-Z][a-z]{1,6})?"
}

// distinct names; the first `id_count` become identities (ints, never null)
fn schema() -> impl Strategy<Value = TypeSchema> {
    (
        prop::collection::btree_set(pascal_name(), 1..8),
        1usize..3,
        prop::collection::vec((semantic_type(), any::<bool>(), 1u32..40), 8),
    )
        .prop_map(|(names, id_count, shapes): (BTreeSet<String>, usize, Vec<_>)| {
            let fields = names
                .into_iter()
                .zip(shapes)
                .enumerate()
                .map(|(i, (name, (ty, nullable, size)))| {
                    if i < id_count {
                        return FieldDescriptor::new(name, SemanticType::Int).identity();
                    }
                    let field = FieldDescriptor::new(name, ty).nullable(nullable);
                    match ty {
                        SemanticType::String => field.with_length(Length::Chars(size.try_into().unwrap())),
                        SemanticType::Decimal | SemanticType::Double => field.with_precision(size, size / 2),
                        _ => field,
                    }
                })
                .collect();
            TypeSchema { type_name: "Generated".into(), table_name: "generated".into(), fields }
        })
}

fn sorted_columns(schema: &TypeSchema) -> (Vec<String>, Vec<String>) {
    let mut ids: Vec<String> = schema.identity_fields().map(|f| f.sql_name.clone()).collect();
    ids.sort();
    let mut rest: Vec<String> = schema.fields.iter().filter(|f| !f.is_identity).map(|f| f.sql_name.clone()).collect();
    rest.sort();
    (ids, rest)
}

fn parameters(procedure: &str) -> Vec<String> {
    procedure
        .lines()
        .skip(1)
        .take_while(|line| *line != "AS")
        .filter_map(|line| line.strip_prefix("\t@"))
        .filter_map(|line| line.split(' ').next())
        .map(String::from)
        .collect()
}

proptest! {
    #[test]
    fn six_distinct_artifact_names(schema in schema(), schema_name in "[a-z]{1,8}") {
        let artifacts = generate(&lower_schema(schema), &schema_name);
        let names: BTreeSet<_> = artifacts.iter().map(|a| a.name.as_str()).collect();
        prop_assert_eq!(artifacts.len(), 6);
        prop_assert_eq!(names.len(), 6);
        let table_prefix = format!("{schema_name}.generated");
        prop_assert!(artifacts.iter().all(|a| a.name.starts_with(&table_prefix) && a.name.ends_with(".sql")));
    }

    #[test]
    fn table_lists_identities_first(schema in schema()) {
        let mapped = lower_schema(schema);
        let artifacts = generate(&mapped, "dbo");
        let table = &artifacts[0].content;
        let columns: Vec<&str> = table
            .lines()
            .skip(1)
            .take(mapped.fields.len())
            .map(|line| line.trim_start_matches('\t').split(' ').next().unwrap_or(""))
            .collect();
        let mut ids: Vec<&str> = mapped.identity_fields().map(|f| f.sql_name.as_str()).collect();
        ids.sort();
        let mut rest: Vec<&str> = mapped.fields.iter().filter(|f| !f.is_identity).map(|f| f.sql_name.as_str()).collect();
        rest.sort();
        let expected: Vec<&str> = ids.into_iter().chain(rest).collect();
        prop_assert_eq!(columns, expected);
    }

    #[test]
    fn every_column_list_puts_identities_first(schema in schema()) {
        let mapped = lower_schema(schema);
        let artifacts = generate(&mapped, "dbo");
        let content = |suffix: &str| {
            let name = format!("dbo.generated_{suffix}.sql");
            artifacts.iter().find(|a| a.name == name).map(|a| a.content.clone()).unwrap_or_default()
        };
        let (ids, rest) = sorted_columns(&mapped);
        let all: Vec<String> = ids.iter().chain(&rest).cloned().collect();

        // parameter blocks: `\t@name TYPE` lines between the header and `AS`
        prop_assert_eq!(parameters(&content("get_by_id")), ids.clone());
        prop_assert_eq!(parameters(&content("delete")), ids.clone());
        prop_assert_eq!(parameters(&content("update")), all.clone());
        prop_assert_eq!(parameters(&content("insert")), rest.clone());

        // select list: `\t\t[Name] = [sql_name]`
        for suffix in ["get_by_id", "get_all"] {
            let selected: Vec<String> = content(suffix)
                .lines()
                .filter_map(|line| line.strip_prefix("\t\t["))
                .filter_map(|line| line.split("] = [").nth(1))
                .map(|rest| rest.trim_end_matches(',').trim_end_matches(']').to_string())
                .collect();
            prop_assert_eq!(selected, all.clone());
        }
    }

    #[test]
    fn generated_text_has_no_trailing_newline(schema in schema()) {
        for artifact in generate(&lower_schema(schema), "dbo") {
            prop_assert!(!artifact.content.ends_with('\n'), "{}", artifact.name);
            prop_assert!(!artifact.content.contains('\r'));
        }
    }

    #[test]
    fn mapping_is_idempotent(schema in schema()) {
        let once = lower_schema(schema);
        for field in &once.fields {
            prop_assert_eq!(&map_field(field, &once.table_name), field);
        }
    }

    #[test]
    fn snake_case_is_idempotent(name in "[A-Za-z][A-Za-z0-9_ ]{0,20}") {
        let once = snake_case(&name);
        prop_assert_eq!(snake_case(&once), once.clone());
        prop_assert!(!once.chars().any(|c| c.is_ascii_uppercase()));
    }
}
