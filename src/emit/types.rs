//! Column type mapping for every target format.
//!
//! Unrecognised types always land on the format's generic string type.

use crate::model::ColumnType;

pub fn prisma_type(typ: &ColumnType) -> &'static str {
    match typ {
        ColumnType::Integer => "Int",
        ColumnType::Decimal => "Decimal",
        ColumnType::Boolean => "Boolean",
        ColumnType::Timestamp | ColumnType::Date => "DateTime",
        ColumnType::Json => "Json",
        // uuid is stored as a string in Prisma
        ColumnType::Uuid | ColumnType::Varchar | ColumnType::Text | ColumnType::Other(_) => {
            "String"
        }
    }
}

/// Native type attribute Prisma needs to tell same-named scalars apart.
pub fn prisma_native(typ: &ColumnType) -> Option<&'static str> {
    match typ {
        ColumnType::Uuid => Some("@db.Uuid"),
        ColumnType::Text => Some("@db.Text"),
        ColumnType::Date => Some("@db.Date"),
        _ => None,
    }
}

pub fn sql_type(typ: &ColumnType) -> &'static str {
    match typ {
        ColumnType::Uuid => "UUID",
        ColumnType::Text => "TEXT",
        ColumnType::Integer => "INTEGER",
        ColumnType::Decimal => "DECIMAL(10, 2)",
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Timestamp => "TIMESTAMP",
        ColumnType::Date => "DATE",
        ColumnType::Json => "JSONB",
        ColumnType::Varchar | ColumnType::Other(_) => "VARCHAR(255)",
    }
}

pub fn sequelize_type(typ: &ColumnType) -> &'static str {
    match typ {
        ColumnType::Uuid => "DataTypes.UUID",
        ColumnType::Text => "DataTypes.TEXT",
        ColumnType::Integer => "DataTypes.INTEGER",
        ColumnType::Decimal => "DataTypes.DECIMAL(10, 2)",
        ColumnType::Boolean => "DataTypes.BOOLEAN",
        ColumnType::Timestamp => "DataTypes.DATE",
        ColumnType::Date => "DataTypes.DATEONLY",
        ColumnType::Json => "DataTypes.JSON",
        ColumnType::Varchar | ColumnType::Other(_) => "DataTypes.STRING",
    }
}

/// TypeORM column options: `type: ...` plus any length/precision options.
pub fn typeorm_column(typ: &ColumnType) -> &'static str {
    match typ {
        ColumnType::Uuid => "type: \"uuid\"",
        ColumnType::Text => "type: \"text\"",
        ColumnType::Integer => "type: \"int\"",
        ColumnType::Decimal => "type: \"decimal\", precision: 10, scale: 2",
        ColumnType::Boolean => "type: \"boolean\"",
        ColumnType::Timestamp => "type: \"timestamp\"",
        ColumnType::Date => "type: \"date\"",
        ColumnType::Json => "type: \"jsonb\"",
        ColumnType::Varchar | ColumnType::Other(_) => "type: \"varchar\", length: 255",
    }
}

/// TypeScript property type, shared by TypeORM entities and plain interfaces.
pub fn ts_type(typ: &ColumnType) -> &'static str {
    match typ {
        ColumnType::Integer | ColumnType::Decimal => "number",
        ColumnType::Boolean => "boolean",
        ColumnType::Timestamp | ColumnType::Date => "Date",
        ColumnType::Json => "Record<string, unknown>",
        ColumnType::Uuid | ColumnType::Varchar | ColumnType::Text | ColumnType::Other(_) => {
            "string"
        }
    }
}

/// SQLAlchemy column type expression and the name it imports.
pub fn sqlalchemy_type(typ: &ColumnType) -> (&'static str, &'static str) {
    match typ {
        ColumnType::Uuid => ("Uuid", "Uuid"),
        ColumnType::Text => ("Text", "Text"),
        ColumnType::Integer => ("Integer", "Integer"),
        ColumnType::Decimal => ("Numeric(10, 2)", "Numeric"),
        ColumnType::Boolean => ("Boolean", "Boolean"),
        ColumnType::Timestamp => ("DateTime", "DateTime"),
        ColumnType::Date => ("Date", "Date"),
        ColumnType::Json => ("JSON", "JSON"),
        ColumnType::Varchar | ColumnType::Other(_) => ("String(255)", "String"),
    }
}

pub fn mongoose_type(typ: &ColumnType) -> &'static str {
    match typ {
        ColumnType::Integer => "Number",
        ColumnType::Decimal => "Schema.Types.Decimal128",
        ColumnType::Boolean => "Boolean",
        ColumnType::Timestamp | ColumnType::Date => "Date",
        ColumnType::Json => "Schema.Types.Mixed",
        ColumnType::Uuid | ColumnType::Varchar | ColumnType::Text | ColumnType::Other(_) => {
            "String"
        }
    }
}

pub fn dbml_type(typ: &ColumnType) -> &'static str {
    match typ {
        ColumnType::Uuid => "uuid",
        ColumnType::Text => "text",
        ColumnType::Integer => "integer",
        ColumnType::Decimal => "decimal(10,2)",
        ColumnType::Boolean => "boolean",
        ColumnType::Timestamp => "timestamp",
        ColumnType::Date => "date",
        ColumnType::Json => "json",
        ColumnType::Varchar | ColumnType::Other(_) => "varchar(255)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types() {
        assert_eq!(prisma_type(&ColumnType::Integer), "Int");
        assert_eq!(sql_type(&ColumnType::Decimal), "DECIMAL(10, 2)");
        assert_eq!(sequelize_type(&ColumnType::Date), "DataTypes.DATEONLY");
        assert_eq!(ts_type(&ColumnType::Timestamp), "Date");
        assert_eq!(sqlalchemy_type(&ColumnType::Decimal), ("Numeric(10, 2)", "Numeric"));
        assert_eq!(dbml_type(&ColumnType::Uuid), "uuid");
    }

    #[test]
    fn test_unknown_types_become_strings() {
        let other = ColumnType::Other("money".to_string());
        assert_eq!(prisma_type(&other), "String");
        assert_eq!(sql_type(&other), "VARCHAR(255)");
        assert_eq!(sequelize_type(&other), "DataTypes.STRING");
        assert_eq!(typeorm_column(&other), "type: \"varchar\", length: 255");
        assert_eq!(ts_type(&other), "string");
        assert_eq!(sqlalchemy_type(&other).1, "String");
        assert_eq!(mongoose_type(&other), "String");
        assert_eq!(dbml_type(&other), "varchar(255)");
        assert_eq!(prisma_native(&other), None);
    }
}
