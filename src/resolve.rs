//! Raw field list → validated `TypeSchema`.
//!
//! - Fields outside the visibility policy are ignored.
//! - Fields whose native type has no semantic type are dropped, not rejected.
//! - The identity is the `Id` field, or whatever the user names when there is
//!   none. Every identity field must be a non-nullable `Int`.
pub mod identity;

use tracing::{debug, info};

use crate::catalog::{self, SemanticType};
use crate::describe::{TypeDescription, VisibilityPolicy};
use crate::error::{Result, SchemaError};
use crate::ir::{FieldDescriptor, TypeSchema};
use crate::naming::snake_case;
use crate::prompt::InputProvider;

pub use identity::{DEFAULT_IDENTITY, IDENTITY_PROMPT};

pub fn resolve(
    description: &TypeDescription,
    policy: VisibilityPolicy,
    input: &mut dyn InputProvider,
) -> Result<TypeSchema> {
    let type_name = description.name.clone();
    let visible = description.fields.iter().filter(|f| policy.admits(f.visibility));

    let mut fields = Vec::new();
    let mut dropped_default_identity = false;
    for raw in visible {
        match catalog::classify(&raw.type_tag, &description.enums) {
            Some(class) => {
                let field = FieldDescriptor::new(raw.name.clone(), class.semantic)
                    .nullable(raw.nullable || class.optional);
                fields.push(field);
            }
            None => {
                debug!(type_name = %type_name, field = %raw.name, tag = %raw.type_tag, "dropping field with unsupported type");
                dropped_default_identity |= raw.name == DEFAULT_IDENTITY;
            }
        }
    }

    // an `Id` of an unsupported type is still the identity, just an unusable one
    if dropped_default_identity {
        return Err(SchemaError::NonIntegerIdentity {
            type_name,
            field: DEFAULT_IDENTITY.to_string(),
        }
        .into());
    }

    let identity_names = if fields.iter().any(|f| f.name == DEFAULT_IDENTITY) {
        vec![DEFAULT_IDENTITY.to_string()]
    } else {
        identity::ask_for_identity(input, &type_name)?
    };

    for name in &identity_names {
        let field = fields
            .iter_mut()
            .find(|f| &f.name == name)
            .ok_or_else(|| SchemaError::UnknownIdentityField {
                type_name: type_name.clone(),
                field: name.clone(),
            })?;
        check_identity(&type_name, field)?;
        field.is_identity = true;
    }

    info!(
        type_name = %type_name,
        fields = fields.len(),
        identity = ?identity_names,
        "resolved type schema"
    );
    Ok(TypeSchema {
        table_name: snake_case(&type_name),
        type_name,
        fields,
    })
}

fn check_identity(type_name: &str, field: &FieldDescriptor) -> std::result::Result<(), SchemaError> {
    if field.semantic_type != SemanticType::Int {
        return Err(SchemaError::NonIntegerIdentity {
            type_name: type_name.to_string(),
            field: field.name.clone(),
        });
    }
    if field.is_nullable {
        return Err(SchemaError::NullableIdentity {
            type_name: type_name.to_string(),
            field: field.name.clone(),
        });
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
