//! Plain TypeScript interface emitter.

use super::types::ts_type;
use super::{placeholder, title};
use crate::format::Format;
use crate::resolve::{Cardinality, Resolution};

pub fn emit(res: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&Format::TypeScript.comment(&title(res, "TypeScript Interfaces")));
    output.push_str("\n\n");

    if !res.has_tables() {
        output.push_str(&placeholder(Format::TypeScript, "TypeScript interfaces"));
        return output;
    }

    for (idx, table, columns) in res.tables() {
        output.push_str(&format!("export interface {} {{\n", table.name));
        for column in columns {
            output.push_str(&format!(
                "  {}: {};\n",
                column.name,
                ts_type(&column.column_type)
            ));
        }

        let mut first = true;
        for end in res.ends_for(idx) {
            if first {
                output.push('\n');
                first = false;
            }
            let related = &res.table(end.related).name;
            let suffix = match end.cardinality {
                Cardinality::Many => "[]",
                Cardinality::One => "",
            };
            output.push_str(&format!("  {}?: {}{};\n", end.field, related, suffix));
        }
        output.push_str("}\n\n");
    }

    output
}
