//! DBML emitter (dbdiagram.io).

use super::types::dbml_type;
use super::{placeholder, title};
use crate::format::Format;
use crate::model::{Column, ColumnType, RelationKind};
use crate::resolve::{EndRole, Resolution};
use std::collections::HashSet;

pub fn emit(res: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&Format::Dbml.comment(&title(res, "DBML Schema")));
    output.push_str("\n\n");

    if !res.has_tables() {
        output.push_str(&placeholder(Format::Dbml, "DBML schema"));
        return output;
    }

    for (idx, table, columns) in res.tables() {
        output.push_str(&format!("Table {} {{\n", table.lower_name()));
        for column in columns {
            output.push_str(&column_line(column, false));
        }
        for column in res.synthesized_columns(idx) {
            output.push_str(&column_line(&column, true));
        }
        output.push_str("}\n\n");
    }

    for line in refs(res) {
        output.push_str(&line);
        output.push('\n');
    }

    output
}

fn column_line(column: &Column, not_null: bool) -> String {
    let mut settings = Vec::new();

    if column.is_primary {
        settings.push("pk");
        match column.column_type {
            ColumnType::Uuid => settings.push("default: `gen_random_uuid()`"),
            ColumnType::Integer => settings.push("increment"),
            _ => {}
        }
    }
    if column.is_unique {
        settings.push("unique");
    }
    if not_null {
        settings.push("not null");
    }

    let mut line = format!("  {} {}", column.name, dbml_type(&column.column_type));
    if !settings.is_empty() {
        line.push_str(&format!(" [{}]", settings.join(", ")));
    }
    line.push('\n');
    line
}

/// One `Ref:` per relationship, written from the source table's side.
/// Relationships sharing a foreign key column share the ref.
fn refs(res: &Resolution) -> Vec<String> {
    let mut lines = Vec::new();
    let mut seen = HashSet::new();

    for (idx, end) in res.ends().iter().enumerate() {
        if idx > end.inverse {
            continue;
        }
        let source = res.table(end.table).lower_name();
        let target = res.table(end.related).lower_name();

        let line = match end.role {
            EndRole::Junction { junction, source: forward } => {
                let junction = res.junction(junction);
                let (near, far) = if forward {
                    (&junction.source, &junction.target)
                } else {
                    (&junction.target, &junction.source)
                };
                format!(
                    "Ref: {}.{} <> {}.{}",
                    source, near.references_column, target, far.references_column
                )
            }
            EndRole::Owner { foreign_key } | EndRole::Inverse { foreign_key } => {
                let fk = res.foreign_key(foreign_key);
                let owner = res.table(fk.table).lower_name();
                let referenced = res.table(fk.references_table).lower_name();
                match end.kind {
                    // Source is the referenced "one" side
                    RelationKind::OneToMany => format!(
                        "Ref: {}.{} < {}.{}",
                        referenced, fk.references_column, owner, fk.column
                    ),
                    RelationKind::OneToOne => format!(
                        "Ref: {}.{} - {}.{}",
                        owner, fk.column, referenced, fk.references_column
                    ),
                    _ => format!(
                        "Ref: {}.{} > {}.{}",
                        owner, fk.column, referenced, fk.references_column
                    ),
                }
            }
        };
        if seen.insert(line.clone()) {
            lines.push(line);
        }
    }

    lines
}
