//! SQLAlchemy declarative model emitter.

use super::types::sqlalchemy_type;
use super::{placeholder, title};
use crate::format::Format;
use crate::model::{Column, ColumnType};
use crate::resolve::{Cardinality, EndRole, ForeignKey, Junction, RelationEnd, Resolution};
use std::collections::BTreeSet;

pub fn emit(res: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&Format::SqlAlchemy.comment(&title(res, "SQLAlchemy Models")));
    output.push_str("\n\n");

    if !res.has_tables() {
        output.push_str(&placeholder(Format::SqlAlchemy, "SQLAlchemy models"));
        return output;
    }

    let mut imports = BTreeSet::from(["Column"]);
    let mut needs_uuid = false;
    let mut blocks = Vec::new();

    for junction in res.junctions() {
        imports.extend(["Table", "ForeignKey"]);
        blocks.push(association_table(res, junction, &mut imports));
    }

    for (idx, table, columns) in res.tables() {
        let mut block = format!(
            "class {}(Base):\n    __tablename__ = \"{}\"\n\n",
            table.name,
            table.lower_name()
        );

        for column in columns {
            let fk = res.foreign_key_on(idx, &column.name);
            needs_uuid |= column.is_primary && column.column_type == ColumnType::Uuid;
            block.push_str(&column_line(res, column, fk, &mut imports));
        }
        for fk in res.foreign_keys_for(idx).filter(|fk| fk.synthesized) {
            block.push_str(&column_line(res, &fk.to_column(), Some(fk), &mut imports));
        }

        let relations: Vec<String> = res
            .ends_for(idx)
            .map(|end| relationship_line(res, end))
            .collect();
        if !relations.is_empty() {
            block.push('\n');
            for line in &relations {
                block.push_str(line);
            }
        }
        blocks.push(block);
    }

    if needs_uuid {
        output.push_str("import uuid\n\n");
    }
    let names: Vec<&str> = imports.into_iter().collect();
    output.push_str(&format!("from sqlalchemy import {}\n", names.join(", ")));
    if res.ends().is_empty() {
        output.push_str("from sqlalchemy.orm import declarative_base\n\n");
    } else {
        output.push_str("from sqlalchemy.orm import declarative_base, relationship\n\n");
    }
    output.push_str("Base = declarative_base()\n");

    for block in &blocks {
        output.push_str("\n\n");
        output.push_str(block);
    }

    output
}

fn column_line(
    res: &Resolution,
    column: &Column,
    fk: Option<&ForeignKey>,
    imports: &mut BTreeSet<&'static str>,
) -> String {
    let (expr, import) = sqlalchemy_type(&column.column_type);
    imports.insert(import);
    let mut args = vec![expr.to_string()];

    if let Some(fk) = fk {
        imports.insert("ForeignKey");
        args.push(format!(
            "ForeignKey(\"{}.{}\")",
            res.table(fk.references_table).lower_name(),
            fk.references_column
        ));
    }
    if column.is_primary {
        args.push("primary_key=True".to_string());
        match column.column_type {
            ColumnType::Uuid => args.push("default=uuid.uuid4".to_string()),
            ColumnType::Integer => args.push("autoincrement=True".to_string()),
            _ => {}
        }
    }
    if column.is_unique {
        args.push("unique=True".to_string());
    }
    if fk.is_some() {
        args.push("nullable=False".to_string());
    }

    format!("    {} = Column({})\n", column.name, args.join(", "))
}

fn relationship_line(res: &Resolution, end: &RelationEnd) -> String {
    let related = res.table(end.related);
    let inverse = res.inverse(end);
    let mut args = vec![
        format!("\"{}\"", related.name),
        format!("back_populates=\"{}\"", inverse.field),
    ];

    match end.role {
        EndRole::Owner { foreign_key } => {
            let fk = res.foreign_key(foreign_key);
            args.push(format!("foreign_keys=[{}]", fk.column));
            if end.table == end.related {
                args.push(format!("remote_side=[{}]", fk.references_column));
            }
        }
        EndRole::Inverse { foreign_key } => {
            let fk = res.foreign_key(foreign_key);
            args.push(format!(
                "foreign_keys=\"[{}.{}]\"",
                res.table(fk.table).name,
                fk.column
            ));
            if end.cardinality == Cardinality::One {
                args.push("uselist=False".to_string());
            }
        }
        EndRole::Junction { junction, source } => {
            let junction = res.junction(junction);
            let variable = python_identifier(&junction.name);
            args.push(format!("secondary={}", variable));
            if end.table == end.related {
                // Self-referencing association needs explicit join conditions
                let (near, far) = if source {
                    (&junction.source, &junction.target)
                } else {
                    (&junction.target, &junction.source)
                };
                args.push(format!(
                    "primaryjoin=\"{}.{} == {}.c.{}\"",
                    related.name, near.references_column, variable, near.column
                ));
                args.push(format!(
                    "secondaryjoin=\"{}.{} == {}.c.{}\"",
                    related.name, far.references_column, variable, far.column
                ));
            }
        }
    }

    format!("    {} = relationship({})\n", end.field, args.join(", "))
}

fn association_table(
    res: &Resolution,
    junction: &Junction,
    imports: &mut BTreeSet<&'static str>,
) -> String {
    let mut block = format!(
        "{} = Table(\n    \"{}\",\n    Base.metadata,\n",
        python_identifier(&junction.name),
        junction.name
    );
    for side in [&junction.source, &junction.target] {
        let (expr, import) = sqlalchemy_type(&side.column_type);
        imports.insert(import);
        block.push_str(&format!(
            "    Column(\"{}\", {}, ForeignKey(\"{}.{}\", ondelete=\"CASCADE\"), primary_key=True),\n",
            side.column,
            expr,
            res.table(side.table).lower_name(),
            side.references_column
        ));
    }
    block.push_str(")\n");
    block
}

/// Junction names are free text; module-level variables are not.
fn python_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
