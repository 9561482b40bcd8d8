//! PostgreSQL DDL emitter.
//!
//! Tables are created parents first so foreign keys can be declared inline.
//! A foreign key pointing at a table that is not created yet (a reference
//! cycle) is added afterwards with `ALTER TABLE`. Many-to-many relationships
//! get a junction table with a composite primary key.

use super::types::sql_type;
use super::{placeholder, title};
use crate::format::Format;
use crate::model::{Column, ColumnType};
use crate::resolve::{ForeignKey, Junction, Resolution};
use std::collections::HashSet;

pub fn emit(res: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&Format::Sql.comment(&title(res, "SQL Schema")));
    output.push_str("\n\n");

    if !res.has_tables() {
        output.push_str(&placeholder(Format::Sql, "SQL schema"));
        return output;
    }

    let mut created = HashSet::new();
    let mut deferred = Vec::new();

    for idx in res.dependency_order() {
        let table = res.table(idx);
        created.insert(idx);

        let mut lines: Vec<String> = res.columns(idx).iter().map(column_definition).collect();
        lines.extend(
            res.synthesized_columns(idx)
                .iter()
                .map(|c| format!("{} NOT NULL", column_definition(c))),
        );

        let mut seen = HashSet::new();
        for fk in res.foreign_keys_for(idx) {
            let key = (&fk.column, fk.references_table, &fk.references_column);
            if !seen.insert(key) {
                continue;
            }
            if created.contains(&fk.references_table) {
                lines.push(format!("  {}", foreign_key_clause(res, fk)));
            } else {
                deferred.push(format!(
                    "ALTER TABLE {} ADD {};",
                    table.lower_name(),
                    foreign_key_clause(res, fk)
                ));
            }
        }

        output.push_str(&format!("CREATE TABLE {} (\n", table.lower_name()));
        output.push_str(&lines.join(",\n"));
        if !lines.is_empty() {
            output.push('\n');
        }
        output.push_str(");\n\n");
    }

    for junction in res.junctions() {
        emit_junction(&mut output, res, junction);
    }

    for statement in &deferred {
        output.push_str(statement);
        output.push('\n');
    }

    output
}

fn column_definition(column: &Column) -> String {
    let mut def = format!("  {} {}", column.name, sql_type(&column.column_type));

    if column.is_primary {
        def.push_str(" PRIMARY KEY");
        match column.column_type {
            ColumnType::Uuid => def.push_str(" DEFAULT gen_random_uuid()"),
            ColumnType::Integer => def.push_str(" GENERATED BY DEFAULT AS IDENTITY"),
            _ => {}
        }
    }
    if column.is_unique {
        def.push_str(" UNIQUE");
    }

    def
}

fn foreign_key_clause(res: &Resolution, fk: &ForeignKey) -> String {
    format!(
        "FOREIGN KEY ({}) REFERENCES {}({})",
        fk.column,
        res.table(fk.references_table).lower_name(),
        fk.references_column
    )
}

fn emit_junction(output: &mut String, res: &Resolution, junction: &Junction) {
    let sides = [&junction.source, &junction.target];

    output.push_str(&format!("CREATE TABLE {} (\n", junction.name));
    for side in sides {
        output.push_str(&format!(
            "  {} {} NOT NULL,\n",
            side.column,
            sql_type(&side.column_type)
        ));
    }
    output.push_str(&format!(
        "  PRIMARY KEY ({}, {}),\n",
        junction.source.column, junction.target.column
    ));
    let constraints: Vec<String> = sides
        .iter()
        .map(|side| {
            format!(
                "  FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE CASCADE",
                side.column,
                res.table(side.table).lower_name(),
                side.references_column
            )
        })
        .collect();
    output.push_str(&constraints.join(",\n"));
    output.push_str("\n);\n\n");
}
