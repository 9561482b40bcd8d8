//! Target format selection and the top-level generation entry point.

use crate::emit;
use crate::model::Schema;
use crate::resolve::Resolution;
use std::panic::{self, AssertUnwindSafe};
use tracing::error;

/// Output formats the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// Prisma schema (the editor's default)
    #[default]
    Prisma,
    /// PostgreSQL DDL
    Sql,
    Sequelize,
    TypeOrm,
    SqlAlchemy,
    Mongoose,
    Dbml,
    TypeScript,
}

impl Format {
    pub const ALL: [Format; 8] = [
        Self::Prisma,
        Self::Sql,
        Self::Sequelize,
        Self::TypeOrm,
        Self::SqlAlchemy,
        Self::Mongoose,
        Self::Dbml,
        Self::TypeScript,
    ];

    /// Parse format from its id (case-insensitive, a few aliases accepted).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "prisma" => Some(Self::Prisma),
            "sql" | "postgres" | "postgresql" => Some(Self::Sql),
            "sequelize" => Some(Self::Sequelize),
            "typeorm" => Some(Self::TypeOrm),
            "sqlalchemy" | "py" | "python" => Some(Self::SqlAlchemy),
            "mongoose" => Some(Self::Mongoose),
            "dbml" => Some(Self::Dbml),
            "typescript" | "ts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Prisma => "prisma",
            Self::Sql => "sql",
            Self::Sequelize => "sequelize",
            Self::TypeOrm => "typeorm",
            Self::SqlAlchemy => "sqlalchemy",
            Self::Mongoose => "mongoose",
            Self::Dbml => "dbml",
            Self::TypeScript => "typescript",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Prisma => "Prisma",
            Self::Sql => "SQL",
            Self::Sequelize => "Sequelize",
            Self::TypeOrm => "TypeORM",
            Self::SqlAlchemy => "SQLAlchemy",
            Self::Mongoose => "Mongoose",
            Self::Dbml => "DBML",
            Self::TypeScript => "TypeScript",
        }
    }

    /// Default file name when the generated code is saved.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Prisma => "schema.prisma",
            Self::Sql => "schema.sql",
            Self::Sequelize => "models.js",
            Self::TypeOrm => "entities.ts",
            Self::SqlAlchemy => "models.py",
            Self::Mongoose => "schemas.js",
            Self::Dbml => "schema.dbml",
            Self::TypeScript => "types.ts",
        }
    }

    fn comment_prefix(self) -> &'static str {
        match self {
            Self::Sql => "--",
            Self::SqlAlchemy => "#",
            _ => "//",
        }
    }

    /// A single line comment in this format's syntax.
    pub fn comment(self, text: &str) -> String {
        format!("{} {}", self.comment_prefix(), text)
    }
}

/// Generate source text for `schema` in `format`.
///
/// Never fails: any panic inside an emitter is turned into a commented
/// placeholder so a live editor always has something to show.
pub fn generate(schema: &Schema, format: Format) -> String {
    match panic::catch_unwind(AssertUnwindSafe(|| render(schema, format))) {
        Ok(code) => code,
        Err(_) => {
            error!(format = format.id(), "code generation panicked");
            format!("{}\n", format.comment("Error generating code. Please try again."))
        }
    }
}

fn render(schema: &Schema, format: Format) -> String {
    let res = Resolution::new(schema);
    match format {
        Format::Prisma => emit::prisma::emit(&res),
        Format::Sql => emit::sql::emit(&res),
        Format::Sequelize => emit::sequelize::emit(&res),
        Format::TypeOrm => emit::typeorm::emit(&res),
        Format::SqlAlchemy => emit::sqlalchemy::emit(&res),
        Format::Mongoose => emit::mongoose::emit(&res),
        Format::Dbml => emit::dbml::emit(&res),
        Format::TypeScript => emit::typescript::emit(&res),
    }
}
