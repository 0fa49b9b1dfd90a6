//! Mapped schema → table DDL plus the five CRUD stored procedures.
//!
//! Wherever several columns are listed (columns, select lists, parameters,
//! primary key) identity fields come first, ordered by `sql_name`, then the
//! remaining fields, ordered by `sql_name`. Lines end in `\n`, bodies are
//! indented with tabs, and the text carries no trailing newline.
use crate::ir::{FieldDescriptor, MappedSchema, SqlArtifact};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    GetById,
    GetAll,
    Insert,
    Update,
    Delete,
}

impl Procedure {
    /// Emission order.
    pub const ALL: [Procedure; 5] = [
        Procedure::GetById,
        Procedure::GetAll,
        Procedure::Insert,
        Procedure::Update,
        Procedure::Delete,
    ];

    pub fn suffix(self) -> &'static str {
        match self {
            Procedure::GetById => "get_by_id",
            Procedure::GetAll => "get_all",
            Procedure::Insert => "insert",
            Procedure::Update => "update",
            Procedure::Delete => "delete",
        }
    }
}

pub struct Codegen<'a> {
    schema_name: &'a str,
    table_name: &'a str,
    ids: Vec<&'a FieldDescriptor>,      // sorted by sql_name
    non_ids: Vec<&'a FieldDescriptor>,  // sorted by sql_name
    out: String,
}

/// Render all six artifacts: table first, then the procedures in
/// `Procedure::ALL` order.
pub fn generate(schema: &MappedSchema, schema_name: &str) -> Vec<SqlArtifact> {
    let mut cg = Codegen::new(schema, schema_name);
    let mut artifacts = Vec::with_capacity(1 + Procedure::ALL.len());
    artifacts.push(cg.emit_table());
    for procedure in Procedure::ALL {
        artifacts.push(cg.emit_procedure(procedure));
    }
    artifacts
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl<'a> Codegen<'a> {
    pub fn new(schema: &'a MappedSchema, schema_name: &'a str) -> Self {
        let (mut ids, mut non_ids): (Vec<_>, Vec<_>) =
            schema.fields.iter().partition(|f| f.is_identity);
        ids.sort_by(|a, b| a.sql_name.cmp(&b.sql_name));
        non_ids.sort_by(|a, b| a.sql_name.cmp(&b.sql_name));
        Self {
            schema_name,
            table_name: &schema.table_name,
            ids,
            non_ids,
            out: String::new(),
        }
    }

    /// `<schema>.<table>`
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }

    pub fn procedure_name(&self, procedure: Procedure) -> String {
        format!("{}.{}_{}", self.schema_name, self.table_name, procedure.suffix())
    }

    fn ordered(&self) -> impl Iterator<Item = &'a FieldDescriptor> + '_ {
        self.ids.iter().chain(self.non_ids.iter()).copied()
    }

    /// `CREATE TABLE <schema>.<table> (`: the table name is schema-qualified
    /// rather than bare, so the table lands in the same schema as its
    /// procedures. Byte comparisons against unqualified DDL must account for
    /// the prefix.
    pub fn emit_table(&mut self) -> SqlArtifact {
        let table = self.qualified_table();
        self.line(&format!("CREATE TABLE {table} ("));
        let columns: Vec<String> = self
            .ordered()
            .map(|f| format!("\t{} {},", f.sql_name, f.sql_type))
            .collect();
        for column in columns {
            self.line(&column);
        }
        let key = join(&self.ids, ", ", |f| f.sql_name.clone());
        self.line(&format!("\tCONSTRAINT pk_{} PRIMARY KEY ({key})", self.table_name));
        self.out.push(')');
        self.take(format!("{table}.sql"))
    }

    pub fn emit_procedure(&mut self, procedure: Procedure) -> SqlArtifact {
        let name = self.procedure_name(procedure);
        let params: Vec<&'a FieldDescriptor> = match procedure {
            Procedure::GetById | Procedure::Delete => self.ids.clone(),
            Procedure::GetAll => Vec::new(),
            Procedure::Insert => self.non_ids.clone(),
            Procedure::Update => self.ordered().collect(),
        };
        self.procedure_start(&name, &params);
        match procedure {
            Procedure::GetById => {
                self.select();
                self.where_by_id();
            }
            Procedure::GetAll => self.select(),
            Procedure::Insert => self.insert(),
            Procedure::Update => self.update(),
            Procedure::Delete => {
                self.line("\tDELETE");
                self.line(&format!("\tFROM {}", self.qualified_table()));
                self.where_by_id();
            }
        }
        self.out.push_str("END");
        self.take(format!("{name}.sql"))
    }

    // header up to and including BEGIN; no parameter block when there are none
    fn procedure_start(&mut self, name: &str, params: &[&FieldDescriptor]) {
        self.line(&format!("CREATE OR ALTER PROCEDURE {name}"));
        if !params.is_empty() {
            let declarations = join(params, ",\n", |f| format!("\t@{} {}", f.sql_name, f.sql_base_type()));
            self.line(&declarations);
        }
        self.line("AS");
        self.line("BEGIN");
    }

    fn select(&mut self) {
        let columns: Vec<&FieldDescriptor> = self.ordered().collect();
        self.line("\tSELECT");
        self.line(&join(&columns, ",\n", |f| format!("\t\t[{}] = [{}]", f.name, f.sql_name)));
        self.line(&format!("\tFROM {}", self.qualified_table()));
    }

    fn where_by_id(&mut self) {
        let conditions: Vec<String> = self
            .ids
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let lead = if i == 0 { "\tWHERE" } else { "\t\tAND" };
                format!("{lead} [{0}] = @{0}", f.sql_name)
            })
            .collect();
        for condition in conditions {
            self.line(&condition);
        }
    }

    fn insert(&mut self) {
        let table = self.qualified_table();
        if self.non_ids.is_empty() {
            self.line(&format!("\tINSERT {table} DEFAULT VALUES;"));
        } else {
            let columns = join(&self.non_ids, ",\n", |f| format!("\t\t[{}]", f.sql_name));
            let values = join(&self.non_ids, ",\n", |f| format!("\t\t@{}", f.sql_name));
            self.line(&format!("\tINSERT {table} ("));
            self.line(&columns);
            self.line("\t)");
            self.line("\tVALUES (");
            self.line(&values);
            self.line("\t);");
        }
        self.line("");
        self.line("\tSELECT SCOPE_IDENTITY()");
    }

    fn update(&mut self) {
        // nothing to SET: keep the procedure so callers can rely on it existing
        if self.non_ids.is_empty() {
            self.line("\tRETURN");
            return;
        }
        let assignments = join(&self.non_ids, ",\n", |f| format!("\t\t[{0}] = @{0}", f.sql_name));
        self.line(&format!("\tUPDATE {}", self.qualified_table()));
        self.line("\tSET");
        self.line(&assignments);
        self.where_by_id();
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn take(&mut self, name: String) -> SqlArtifact {
        SqlArtifact { name, content: std::mem::take(&mut self.out) }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn join(fields: &[&FieldDescriptor], sep: &str, render: impl Fn(&FieldDescriptor) -> String) -> String {
    fields.iter().map(|f| render(f)).collect::<Vec<_>>().join(sep)
}

// ------------------------------- Tests ------------------------------------ //
