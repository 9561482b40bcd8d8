//! TypeORM entity emitter.

use super::types::{ts_type, typeorm_column};
use super::{lower_first, placeholder, title};
use crate::format::Format;
use crate::model::{Column, ColumnType, RelationKind};
use crate::resolve::{Cardinality, EndRole, RelationEnd, Resolution};
use std::collections::BTreeSet;

pub fn emit(res: &Resolution) -> String {
    let mut output = String::new();
    output.push_str(&Format::TypeOrm.comment(&title(res, "TypeORM Entities")));
    output.push_str("\n\n");

    if !res.has_tables() {
        output.push_str(&placeholder(Format::TypeOrm, "TypeORM entities"));
        return output;
    }

    // Entities are rendered first so only used decorators get imported
    let mut decorators = BTreeSet::from(["Entity"]);
    let mut body = String::new();
    for (idx, table, columns) in res.tables() {
        let mut members: Vec<String> = columns
            .iter()
            .map(|c| column_member(c, &mut decorators))
            .collect();

        let mut relations = Vec::new();
        for fk in res.foreign_keys_for(idx).filter(|fk| fk.synthesized) {
            relations.push(column_member(&fk.to_column(), &mut decorators));
        }
        for end in res.ends_for(idx) {
            relations.push(relation_member(res, end, &mut decorators));
        }
        if let Some(first) = relations.first_mut() {
            first.insert_str(0, "  // Relationships\n");
        }
        members.extend(relations);

        body.push_str(&format!(
            "@Entity(\"{}\")\nexport class {} {{\n",
            table.lower_name(),
            table.name
        ));
        body.push_str(&members.join("\n\n"));
        if !members.is_empty() {
            body.push('\n');
        }
        body.push_str("}\n\n");
    }

    let imports: Vec<&str> = decorators.into_iter().collect();
    output.push_str(&format!(
        "import {{ {} }} from \"typeorm\";\n\n",
        imports.join(", ")
    ));
    output.push_str(&body);
    output
}

fn column_member(column: &Column, decorators: &mut BTreeSet<&'static str>) -> String {
    let mut lines = Vec::new();
    let options = typeorm_column(&column.column_type);
    let unique = if column.is_unique { ", unique: true" } else { "" };

    match (column.is_primary, &column.column_type) {
        (true, ColumnType::Uuid) | (true, ColumnType::Integer) => {
            decorators.insert("PrimaryGeneratedColumn");
            if column.column_type == ColumnType::Uuid {
                lines.push("@PrimaryGeneratedColumn(\"uuid\")".to_string());
            } else {
                lines.push("@PrimaryGeneratedColumn()".to_string());
            }
            if column.is_unique {
                decorators.insert("Index");
                lines.push("@Index({ unique: true })".to_string());
            }
        }
        (true, _) => {
            decorators.insert("PrimaryColumn");
            lines.push(format!("@PrimaryColumn({{ {}{} }})", options, unique));
        }
        (false, _) => {
            decorators.insert("Column");
            lines.push(format!("@Column({{ {}{} }})", options, unique));
        }
    }

    lines.push(format!("{}: {};", column.name, ts_type(&column.column_type)));
    indent(&lines)
}

fn relation_member(
    res: &Resolution,
    end: &RelationEnd,
    decorators: &mut BTreeSet<&'static str>,
) -> String {
    let related = &res.table(end.related).name;
    let param = lower_first(related);
    let inverse = res.inverse(end);
    let decorator = match (end.kind, end.cardinality) {
        (RelationKind::ManyToMany, _) => "ManyToMany",
        (RelationKind::OneToOne, _) => "OneToOne",
        (_, Cardinality::Many) => "OneToMany",
        (_, Cardinality::One) => "ManyToOne",
    };
    decorators.insert(decorator);

    let mut lines = vec![format!(
        "@{}(() => {}, ({}) => {}.{})",
        decorator, related, param, param, inverse.field
    )];

    match end.role {
        EndRole::Owner { foreign_key } => {
            let fk = res.foreign_key(foreign_key);
            decorators.insert("JoinColumn");
            lines.push(format!(
                "@JoinColumn({{ name: \"{}\", referencedColumnName: \"{}\" }})",
                fk.column, fk.references_column
            ));
        }
        EndRole::Junction {
            junction,
            source: true,
        } => {
            let junction = res.junction(junction);
            decorators.insert("JoinTable");
            lines.push(format!(
                "@JoinTable({{ name: \"{}\", joinColumn: {{ name: \"{}\", referencedColumnName: \"{}\" }}, inverseJoinColumn: {{ name: \"{}\", referencedColumnName: \"{}\" }} }})",
                junction.name,
                junction.source.column,
                junction.source.references_column,
                junction.target.column,
                junction.target.references_column
            ));
        }
        _ => {}
    }

    let field_type = match end.cardinality {
        Cardinality::Many => format!("{}[]", related),
        Cardinality::One => related.clone(),
    };
    lines.push(format!("{}: {};", end.field, field_type));
    indent(&lines)
}

fn indent(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| format!("  {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Relationship, Schema, Table};

    fn user_and_post(kind: RelationKind) -> Schema {
        Schema::new(
            vec![
                Table::new(
                    "t1",
                    "User",
                    vec![
                        Column::new("id", ColumnType::Uuid).primary(),
                        Column::new("email", ColumnType::Varchar).unique(),
                    ],
                ),
                Table::new("t2", "Post", vec![Column::new("id", ColumnType::Uuid).primary()]),
            ],
            vec![Relationship::new("r1", "t1", "t2", "id", "user_id", kind)],
        )
    }

    #[test]
    fn test_empty_schema_placeholder() {
        let result = emit(&Resolution::new(&Schema::default()));
        assert!(result.contains("// Add tables to your diagram to generate TypeORM entities"));
        assert!(!result.contains("import"));
    }

    #[test]
    fn test_columns() {
        let schema = Schema::new(
            vec![Table::new(
                "t1",
                "Tag",
                vec![
                    Column::new("slug", ColumnType::Varchar).primary(),
                    Column::new("weight", ColumnType::Decimal),
                ],
            )],
            vec![],
        );
        let result = emit(&Resolution::new(&schema));
        assert!(result.contains("import { Column, Entity, PrimaryColumn } from \"typeorm\";"));
        assert!(result.contains("@Entity(\"tag\")\nexport class Tag {\n"));
        assert!(result.contains(
            "  @PrimaryColumn({ type: \"varchar\", length: 255 })\n  slug: string;\n\n"
        ));
        assert!(result.contains(
            "  @Column({ type: \"decimal\", precision: 10, scale: 2 })\n  weight: number;\n}"
        ));
    }

    #[test]
    fn test_one_to_many() {
        let result = emit(&Resolution::new(&user_and_post(RelationKind::OneToMany)));
        assert!(result.contains("  @PrimaryGeneratedColumn(\"uuid\")\n  id: string;"));
        assert!(result.contains("  @Column({ type: \"varchar\", length: 255, unique: true })\n  email: string;"));
        assert!(result.contains("  @OneToMany(() => Post, (post) => post.user)\n  posts: Post[];"));
        assert!(result.contains(
            "  @ManyToOne(() => User, (user) => user.posts)\n  @JoinColumn({ name: \"user_id\", referencedColumnName: \"id\" })\n  user: User;"
        ));
        assert!(result.contains("  // Relationships\n  @Column({ type: \"uuid\" })\n  user_id: string;"));
    }

    #[test]
    fn test_one_to_one() {
        let result = emit(&Resolution::new(&user_and_post(RelationKind::OneToOne)));
        assert!(result.contains("  @OneToOne(() => Post, (post) => post.user)\n  @JoinColumn("));
        assert!(result.contains("  @OneToOne(() => User, (user) => user.post)\n  user: User;"));
    }

    #[test]
    fn test_many_to_many() {
        let result = emit(&Resolution::new(&user_and_post(RelationKind::ManyToMany)));
        assert!(result.contains(
            "  @ManyToMany(() => Post, (post) => post.users)\n  @JoinTable({ name: \"user_post\", joinColumn: { name: \"user_id\", referencedColumnName: \"id\" }, inverseJoinColumn: { name: \"post_user_id\", referencedColumnName: \"user_id\" } })\n  posts: Post[];"
        ));
        assert!(result.contains("  @ManyToMany(() => User, (user) => user.posts)\n  users: User[];"));
    }
}
