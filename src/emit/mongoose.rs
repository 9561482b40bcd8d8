//! Mongoose schema emitter.
//!
//! Documents reference each other by `ObjectId`. The owning side of a to-one
//! relationship stores the reference in its foreign key field; the other side
//! gets a virtual populate. Many-to-many keeps an id array on the source
//! document and a virtual on the target.

use super::types::mongoose_type;
use super::{lower_first, placeholder, title};
use crate::format::Format;
use crate::model::{Column, ColumnType};
use crate::resolve::{Cardinality, EndRole, ForeignKey, RelationEnd, Resolution};

pub fn emit(res: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&Format::Mongoose.comment(&title(res, "Mongoose Schemas")));
    output.push_str("\n\n");

    if !res.has_tables() {
        output.push_str(&placeholder(Format::Mongoose, "Mongoose schemas"));
        return output;
    }

    let needs_uuid = res.tables().any(|(_, _, columns)| {
        columns
            .iter()
            .any(|c| c.is_primary && c.column_type == ColumnType::Uuid)
    });
    output.push_str("const mongoose = require('mongoose');\n");
    if needs_uuid {
        output.push_str("const { randomUUID } = require('crypto');\n");
    }
    output.push_str("\nconst { Schema } = mongoose;\n\n");

    let mut models = Vec::new();
    for (idx, table, columns) in res.tables() {
        let schema_var = format!("{}Schema", lower_first(&table.name));

        let mut fields: Vec<String> = columns
            .iter()
            .map(|c| field(res, c, res.foreign_key_on(idx, &c.name)))
            .collect();
        for fk in res.foreign_keys_for(idx).filter(|fk| fk.synthesized) {
            fields.push(field(res, &fk.to_column(), Some(fk)));
        }

        let mut virtuals = Vec::new();
        for end in res.ends_for(idx) {
            match end.role {
                EndRole::Junction { source: true, .. } => fields.push(format!(
                    "  {}: [{{ type: Schema.Types.ObjectId, ref: '{}' }}]",
                    end.field,
                    res.table(end.related).name
                )),
                EndRole::Owner { .. } => {}
                _ => virtuals.push(virtual_populate(res, &schema_var, end)),
            }
        }

        output.push_str(&format!("const {} = new Schema({{\n", schema_var));
        output.push_str(&fields.join(",\n"));
        if !fields.is_empty() {
            output.push('\n');
        }
        if virtuals.is_empty() {
            output.push_str("});\n\n");
        } else {
            output.push_str("}, {\n  toJSON: { virtuals: true },\n  toObject: { virtuals: true }\n});\n\n");
            for v in &virtuals {
                output.push_str(v);
            }
        }

        output.push_str(&format!(
            "const {} = mongoose.model('{}', {});\n\n",
            table.name, table.name, schema_var
        ));
        models.push(table.name.as_str());
    }

    output.push_str(&format!("module.exports = {{ {} }};\n", models.join(", ")));
    output
}

fn field(res: &Resolution, column: &Column, fk: Option<&ForeignKey>) -> String {
    let mut options = Vec::new();

    match fk {
        Some(fk) => {
            options.push("type: Schema.Types.ObjectId".to_string());
            options.push(format!("ref: '{}'", res.table(fk.references_table).name));
            options.push("required: true".to_string());
        }
        None => options.push(format!("type: {}", mongoose_type(&column.column_type))),
    }

    if column.is_primary {
        match column.column_type {
            ColumnType::Uuid => options.push("default: () => randomUUID()".to_string()),
            _ if fk.is_none() => options.push("required: true".to_string()),
            _ => {}
        }
        options.push("unique: true".to_string());
        options.push("immutable: true".to_string());
    } else if column.is_unique {
        options.push("unique: true".to_string());
    }

    format!("  {}: {{ {} }}", column.name, options.join(", "))
}

fn virtual_populate(res: &Resolution, schema_var: &str, end: &RelationEnd) -> String {
    let related = &res.table(end.related).name;
    let foreign_field = match end.role {
        EndRole::Inverse { foreign_key } => res.foreign_key(foreign_key).column.clone(),
        // Target side of a many-to-many looks at the source's id array
        _ => res.inverse(end).field.clone(),
    };

    let mut options = vec![
        format!("ref: '{}'", related),
        "localField: '_id'".to_string(),
        format!("foreignField: '{}'", foreign_field),
    ];
    if end.cardinality == Cardinality::One {
        options.push("justOne: true".to_string());
    }

    format!(
        "{}.virtual('{}', {{\n  {}\n}});\n\n",
        schema_var,
        end.field,
        options.join(",\n  ")
    )
}
