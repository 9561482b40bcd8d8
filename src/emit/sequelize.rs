//! Sequelize model emitter.

use super::types::sequelize_type;
use super::{placeholder, title};
use crate::format::Format;
use crate::model::{Column, ColumnType};
use crate::resolve::{Cardinality, EndRole, ForeignKey, Resolution};

const PREAMBLE: &str = "const { Sequelize, DataTypes } = require('sequelize');

const sequelize = new Sequelize('database', 'username', 'password', {
  host: 'localhost',
  dialect: 'postgres'
});

";

pub fn emit(res: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&Format::Sequelize.comment(&title(res, "Sequelize Models")));
    output.push_str("\n\n");

    if !res.has_tables() {
        output.push_str(&placeholder(Format::Sequelize, "Sequelize models"));
        return output;
    }

    output.push_str(PREAMBLE);

    let mut models = Vec::new();
    for (idx, table, columns) in res.tables() {
        let mut attributes: Vec<String> = columns
            .iter()
            .map(|c| attribute(res, c, res.foreign_key_on(idx, &c.name)))
            .collect();
        for fk in res.foreign_keys_for(idx).filter(|fk| fk.synthesized) {
            attributes.push(attribute(res, &fk.to_column(), Some(fk)));
        }

        output.push_str(&format!(
            "const {} = sequelize.define('{}', {{\n",
            table.name, table.name
        ));
        output.push_str(&attributes.join(",\n"));
        if !attributes.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!(
            "}}, {{\n  tableName: '{}'\n}});\n\n",
            table.lower_name()
        ));
        models.push(table.name.as_str());
    }

    let associations = associations(res);
    if !associations.is_empty() {
        output.push_str("// Associations\n");
        for line in &associations {
            output.push_str(line);
            output.push('\n');
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "module.exports = {{ sequelize, {} }};\n",
        models.join(", ")
    ));

    output
}

fn attribute(res: &Resolution, column: &Column, fk: Option<&ForeignKey>) -> String {
    let mut options = vec![format!("type: {}", sequelize_type(&column.column_type))];

    if column.is_primary {
        match column.column_type {
            ColumnType::Uuid => options.push("defaultValue: DataTypes.UUIDV4".to_string()),
            ColumnType::Integer => options.push("autoIncrement: true".to_string()),
            _ => {}
        }
        options.push("primaryKey: true".to_string());
    }
    if column.is_unique {
        options.push("unique: true".to_string());
    }
    if let Some(fk) = fk {
        options.push("allowNull: false".to_string());
        options.push(format!(
            "references: {{ model: '{}', key: '{}' }}",
            res.table(fk.references_table).lower_name(),
            fk.references_column
        ));
    }

    format!("  {}: {{\n    {}\n  }}", column.name, options.join(",\n    "))
}

/// One pair of association calls per resolved relationship.
fn associations(res: &Resolution) -> Vec<String> {
    let mut lines = Vec::new();

    for (idx, end) in res.ends().iter().enumerate() {
        if idx > end.inverse {
            continue;
        }
        let other = res.inverse(end);
        let this_model = &res.table(end.table).name;
        let other_model = &res.table(other.table).name;

        match (end.role, other.role) {
            (EndRole::Junction { junction, source }, _) => {
                let junction = res.junction(junction);
                let (from, to) = if source {
                    (&junction.source, &junction.target)
                } else {
                    (&junction.target, &junction.source)
                };
                lines.push(format!(
                    "{}.belongsToMany({}, {{ through: '{}', foreignKey: '{}', otherKey: '{}', as: '{}' }});",
                    this_model, other_model, junction.name, from.column, to.column, end.field
                ));
                lines.push(format!(
                    "{}.belongsToMany({}, {{ through: '{}', foreignKey: '{}', otherKey: '{}', as: '{}' }});",
                    other_model, this_model, junction.name, to.column, from.column, other.field
                ));
            }
            (EndRole::Owner { foreign_key }, _) | (_, EndRole::Owner { foreign_key }) => {
                let (owner, inverse) = match end.role {
                    EndRole::Owner { .. } => (end, other),
                    _ => (other, end),
                };
                let fk = res.foreign_key(foreign_key);
                let owner_model = &res.table(owner.table).name;
                let inverse_model = &res.table(inverse.table).name;
                let has = match inverse.cardinality {
                    Cardinality::Many => "hasMany",
                    Cardinality::One => "hasOne",
                };
                lines.push(format!(
                    "{}.{}({}, {{ foreignKey: '{}', sourceKey: '{}', as: '{}' }});",
                    inverse_model, has, owner_model, fk.column, fk.references_column, inverse.field
                ));
                lines.push(format!(
                    "{}.belongsTo({}, {{ foreignKey: '{}', targetKey: '{}', as: '{}' }});",
                    owner_model, inverse_model, fk.column, fk.references_column, owner.field
                ));
            }
            _ => {}
        }
    }

    lines
}
