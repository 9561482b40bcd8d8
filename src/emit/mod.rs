//! One emitter per target format.
//!
//! Every emitter is a pure `fn(&Resolution) -> String`. They share the
//! relationship decisions made in [`crate::resolve`] and only differ in how
//! those decisions are spelled.

pub mod dbml;
pub mod mongoose;
pub mod prisma;
pub mod sequelize;
pub mod sql;
pub mod sqlalchemy;
pub mod typeorm;
pub mod typescript;
mod types;

use crate::format::Format;
use crate::resolve::Resolution;

/// Header title, e.g. `Prisma schema for Blog`.
fn title(res: &Resolution, label: &str) -> String {
    match res.schema().name.as_deref() {
        Some(name) if !name.trim().is_empty() => format!("{} for {}", label, name.trim()),
        _ => label.to_string(),
    }
}

/// Comment shown in place of models while the diagram has no tables.
fn placeholder(format: Format, what: &str) -> String {
    format!(
        "{}\n",
        format.comment(&format!("Add tables to your diagram to generate {}", what))
    )
}

/// `User` -> `user`, `OrderItem` -> `orderItem`.
fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
