//! Prisma schema emitter.

use super::types::{prisma_native, prisma_type};
use super::{placeholder, title};
use crate::format::Format;
use crate::model::{Column, ColumnType, Table};
use crate::resolve::{Cardinality, EndRole, Resolution};

const PREAMBLE: &str = "generator client {
  provider = \"prisma-client-js\"
}

datasource db {
  provider = \"postgresql\"
  url      = env(\"DATABASE_URL\")
}

";

pub fn emit(res: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&Format::Prisma.comment(&title(res, "Prisma schema")));
    output.push_str("\n\n");
    output.push_str(PREAMBLE);

    if !res.has_tables() {
        output.push_str(&placeholder(Format::Prisma, "Prisma schema"));
        return output;
    }

    for (idx, table, columns) in res.tables() {
        emit_model(&mut output, res, idx, table, columns);
    }

    output
}

fn emit_model(
    output: &mut String,
    res: &Resolution,
    idx: usize,
    table: &Table,
    columns: &[Column],
) {
    output.push_str(&format!("model {} {{\n", table.name));

    for column in columns {
        output.push_str(&field_line(column));
    }

    let mut relations = String::new();
    for end in res.ends_for(idx) {
        let related = &res.table(end.related).name;
        match end.role {
            EndRole::Owner { foreign_key } => {
                let fk = res.foreign_key(foreign_key);
                relations.push_str(&format!(
                    "  {} {} @relation(\"{}\", fields: [{}], references: [{}])\n",
                    end.field, related, end.relation_name, fk.column, fk.references_column
                ));
                if fk.synthesized {
                    relations.push_str(&field_line(&fk.to_column()));
                }
            }
            EndRole::Inverse { .. } | EndRole::Junction { .. } => {
                let suffix = match end.cardinality {
                    Cardinality::Many => "[]",
                    Cardinality::One => "?",
                };
                relations.push_str(&format!(
                    "  {} {}{} @relation(\"{}\")\n",
                    end.field, related, suffix, end.relation_name
                ));
            }
        }
    }

    if !relations.is_empty() {
        output.push_str("\n  // Relationships\n");
        output.push_str(&relations);
    }

    output.push_str("}\n\n");
}

fn field_line(column: &Column) -> String {
    let mut line = format!("  {} {}", column.name, prisma_type(&column.column_type));

    if column.is_primary {
        match column.column_type {
            ColumnType::Uuid => line.push_str(" @id @default(uuid())"),
            ColumnType::Integer => line.push_str(" @id @default(autoincrement())"),
            _ => line.push_str(" @id"),
        }
    }
    if column.is_unique {
        line.push_str(" @unique");
    }
    if let Some(native) = prisma_native(&column.column_type) {
        line.push(' ');
        line.push_str(native);
    }

    line.push('\n');
    line
}
