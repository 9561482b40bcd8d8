//! Relationship resolution shared by every emitter.
//!
//! Turns the flat, directed relationship list into relation ends attached to
//! tables, decides which table carries the physical foreign key, names the
//! fields and foreign key columns, and synthesizes junctions for
//! many-to-many. Emitters only render what is decided here.

use crate::model::{Column, ColumnType, RelationKind, Schema, Table};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Whether a relation field holds one related row or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndRole {
    /// Carries the foreign key column
    Owner { foreign_key: usize },
    /// Referenced side of an owned relationship
    Inverse { foreign_key: usize },
    /// Either side of a many-to-many; `source` is true on the source table's end
    Junction { junction: usize, source: bool },
}

/// One side of a resolved relationship, as seen from `table`.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationEnd {
    pub kind: RelationKind,
    pub table: usize,
    pub related: usize,
    pub field: String,
    pub cardinality: Cardinality,
    pub relation_name: String,
    pub inverse: usize,
    pub role: EndRole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub table: usize,
    pub column: String,
    pub column_type: ColumnType,
    pub references_table: usize,
    pub references_column: String,
    pub unique: bool,
    /// The column does not exist on the table and must be emitted
    pub synthesized: bool,
}

impl ForeignKey {
    /// The foreign key as a plain column declaration.
    pub fn to_column(&self) -> Column {
        Column {
            name: self.column.clone(),
            column_type: self.column_type.clone(),
            is_primary: false,
            is_unique: self.unique,
            is_foreign: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    pub name: String,
    pub source: JunctionSide,
    pub target: JunctionSide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JunctionSide {
    pub table: usize,
    pub column: String,
    pub column_type: ColumnType,
    pub references_column: String,
}

#[derive(Debug)]
pub struct Resolution<'a> {
    schema: &'a Schema,
    ends: Vec<RelationEnd>,
    by_table: Vec<Vec<usize>>,
    foreign_keys: Vec<ForeignKey>,
    junctions: Vec<Junction>,
    /// Junction index by requested name (`through` or `a_b`)
    junction_keys: HashMap<String, usize>,
    /// Table and junction names already emitted as tables
    table_names: HashSet<String>,
    /// Declared columns with foreign key flags applied
    columns: Vec<Option<Vec<Column>>>,
}

struct Owned {
    owner: usize,
    referenced: usize,
    local_key: String,
    referenced_key: String,
    inverse_cardinality: Cardinality,
    unique: bool,
}

impl<'a> Resolution<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        let mut res = Self {
            schema,
            ends: Vec::new(),
            by_table: vec![Vec::new(); schema.tables.len()],
            foreign_keys: Vec::new(),
            junctions: Vec::new(),
            junction_keys: HashMap::new(),
            table_names: schema
                .tables
                .iter()
                .filter(|t| t.columns.is_some())
                .map(Table::lower_name)
                .collect(),
            columns: Vec::new(),
        };

        // Names already used on each table: columns first, then synthesized
        // FK columns and relation fields as they are assigned.
        let mut taken: Vec<HashSet<String>> = schema
            .tables
            .iter()
            .map(|t| {
                t.columns
                    .iter()
                    .flatten()
                    .map(|c| c.name.clone())
                    .collect()
            })
            .collect();
        let mut relation_names = HashSet::new();

        for rel in &schema.relationships {
            let Some(source) = res.usable_table(&rel.source) else {
                debug!(
                    relationship = %rel.id,
                    kind = rel.kind().as_str(),
                    source = %rel.source,
                    "dropping relationship with unusable source"
                );
                continue;
            };
            let Some(target) = res.usable_table(&rel.target) else {
                debug!(
                    relationship = %rel.id,
                    kind = rel.kind().as_str(),
                    target = %rel.target,
                    "dropping relationship with unusable target"
                );
                continue;
            };

            let kind = rel.kind();
            let source_table = &schema.tables[source];
            let target_table = &schema.tables[target];

            let owned = match kind {
                RelationKind::OneToMany => Some(Owned {
                    owner: target,
                    referenced: source,
                    local_key: rel.target_key.clone(),
                    referenced_key: rel.source_key.clone(),
                    inverse_cardinality: Cardinality::Many,
                    unique: false,
                }),
                RelationKind::ManyToOne => Some(Owned {
                    owner: source,
                    referenced: target,
                    local_key: rel.source_key.clone(),
                    referenced_key: rel.target_key.clone(),
                    inverse_cardinality: Cardinality::Many,
                    unique: false,
                }),
                RelationKind::OneToOne => Some(Owned {
                    owner: source,
                    referenced: target,
                    local_key: rel.source_key.clone(),
                    referenced_key: rel.target_key.clone(),
                    inverse_cardinality: Cardinality::One,
                    unique: true,
                }),
                RelationKind::ManyToMany => None,
            };

            let relation_name = match (&owned, &rel.through) {
                (None, Some(through)) if !through.is_empty() => through.clone(),
                _ => format!("{}To{}", source_table.name, target_table.name),
            };
            let relation_name = unique_name(&mut relation_names, relation_name);

            match owned {
                Some(owned) => {
                    let fk = res.resolve_foreign_key(&owned, &mut taken);
                    let owner_field =
                        field_name(&schema.tables[owned.referenced], Cardinality::One);
                    let inverse_field =
                        field_name(&schema.tables[owned.owner], owned.inverse_cardinality);

                    let owner_end = RelationEnd {
                        kind,
                        table: owned.owner,
                        related: owned.referenced,
                        field: unique_name(&mut taken[owned.owner], owner_field),
                        cardinality: Cardinality::One,
                        relation_name: relation_name.clone(),
                        inverse: 0,
                        role: EndRole::Owner { foreign_key: fk },
                    };
                    let inverse_end = RelationEnd {
                        kind,
                        table: owned.referenced,
                        related: owned.owner,
                        field: unique_name(&mut taken[owned.referenced], inverse_field),
                        cardinality: owned.inverse_cardinality,
                        relation_name,
                        inverse: 0,
                        role: EndRole::Inverse { foreign_key: fk },
                    };
                    // Source side first so ends read in relationship direction
                    if owned.owner == source {
                        res.push_pair(owner_end, inverse_end);
                    } else {
                        res.push_pair(inverse_end, owner_end);
                    }
                }
                None => {
                    let junction = res.resolve_junction(
                        rel.through.as_deref(),
                        source,
                        target,
                        &rel.source_key,
                        &rel.target_key,
                    );
                    // A shared junction may have been created from the other direction
                    let forward = res.junctions[junction].source.table == source;
                    let source_field = field_name(target_table, Cardinality::Many);
                    let target_field = field_name(source_table, Cardinality::Many);
                    let source_end = RelationEnd {
                        kind,
                        table: source,
                        related: target,
                        field: unique_name(&mut taken[source], source_field),
                        cardinality: Cardinality::Many,
                        relation_name: relation_name.clone(),
                        inverse: 0,
                        role: EndRole::Junction {
                            junction,
                            source: forward,
                        },
                    };
                    let target_end = RelationEnd {
                        kind,
                        table: target,
                        related: source,
                        field: unique_name(&mut taken[target], target_field),
                        cardinality: Cardinality::Many,
                        relation_name,
                        inverse: 0,
                        role: EndRole::Junction {
                            junction,
                            source: !forward,
                        },
                    };
                    res.push_pair(source_end, target_end);
                }
            }
        }

        res.columns = res.flagged_columns();
        res
    }

    /// A reused key column takes on the foreign key's flags, so a one-to-one
    /// owner stays unique whether its column was declared or synthesized.
    fn flagged_columns(&self) -> Vec<Option<Vec<Column>>> {
        self.schema
            .tables
            .iter()
            .enumerate()
            .map(|(idx, table)| {
                table.columns.as_ref().map(|columns| {
                    columns
                        .iter()
                        .map(|declared| {
                            let mut column = declared.clone();
                            for fk in self
                                .foreign_keys_for(idx)
                                .filter(|fk| fk.column == declared.name)
                            {
                                column.is_foreign = true;
                                column.is_unique |= fk.unique;
                            }
                            column
                        })
                        .collect()
                })
            })
            .collect()
    }

    /// Index of a table that can take part in generated code.
    fn usable_table(&self, id: &str) -> Option<usize> {
        self.schema
            .tables
            .iter()
            .position(|t| t.id == id && t.columns.is_some())
    }

    fn push_pair(&mut self, first: RelationEnd, second: RelationEnd) {
        let a = self.ends.len();
        let b = a + 1;
        for (idx, mut end, inverse) in [(a, first, b), (b, second, a)] {
            end.inverse = inverse;
            self.by_table[end.table].push(idx);
            self.ends.push(end);
        }
    }

    fn resolve_foreign_key(&mut self, owned: &Owned, taken: &mut [HashSet<String>]) -> usize {
        let owner = &self.schema.tables[owned.owner];
        let referenced = &self.schema.tables[owned.referenced];
        let referenced_key = non_empty_key(&owned.referenced_key);

        let local_is_usable = owner
            .column(&owned.local_key)
            .is_some_and(|c| !c.is_primary);

        let (column, synthesized) = if local_is_usable {
            (owned.local_key.clone(), false)
        } else {
            let name = format!("{}_{}", referenced.lower_name(), referenced_key);
            let exists = owner.has_column(&name)
                || self
                    .foreign_keys
                    .iter()
                    .any(|fk| fk.table == owned.owner && fk.column == name);
            if !exists {
                taken[owned.owner].insert(name.clone());
            }
            (name, !exists)
        };

        self.foreign_keys.push(ForeignKey {
            table: owned.owner,
            column,
            column_type: referenced_type(referenced, referenced_key),
            references_table: owned.referenced,
            references_column: referenced_key.to_string(),
            unique: owned.unique,
            synthesized,
        });
        self.foreign_keys.len() - 1
    }

    fn resolve_junction(
        &mut self,
        through: Option<&str>,
        source: usize,
        target: usize,
        source_key: &str,
        target_key: &str,
    ) -> usize {
        let source_table = &self.schema.tables[source];
        let target_table = &self.schema.tables[target];
        let key = match through {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}_{}", source_table.lower_name(), target_table.lower_name()),
        };
        if let Some(&existing) = self.junction_keys.get(&key) {
            return existing;
        }
        // A modelled table may already own the name
        let name = unique_name(&mut self.table_names, key.clone());
        if name != key {
            debug!(junction = %key, renamed = %name, "junction name taken by a table");
        }

        let source_key = non_empty_key(source_key);
        let target_key = non_empty_key(target_key);
        let source_column = format!("{}_{}", source_table.lower_name(), source_key);
        let mut target_column = format!("{}_{}", target_table.lower_name(), target_key);
        if target_column == source_column {
            target_column = format!("related_{}", target_column);
        }

        self.junctions.push(Junction {
            name,
            source: JunctionSide {
                table: source,
                column: source_column,
                column_type: referenced_type(source_table, source_key),
                references_column: source_key.to_string(),
            },
            target: JunctionSide {
                table: target,
                column: target_column,
                column_type: referenced_type(target_table, target_key),
                references_column: target_key.to_string(),
            },
        });
        let idx = self.junctions.len() - 1;
        self.junction_keys.insert(key, idx);
        idx
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn table(&self, idx: usize) -> &'a Table {
        &self.schema.tables[idx]
    }

    /// Tables that get a model, in input order, with their columns.
    ///
    /// Columns used as foreign keys come back with `is_foreign` set, and a
    /// one-to-one key column is always unique.
    pub fn tables(&self) -> impl Iterator<Item = (usize, &'a Table, &[Column])> + '_ {
        self.schema
            .tables
            .iter()
            .zip(&self.columns)
            .enumerate()
            .filter_map(|(idx, (t, cols))| cols.as_deref().map(|cols| (idx, t, cols)))
    }

    /// Declared columns of a well-formed table, flagged as in [`Self::tables`].
    pub fn columns(&self, table: usize) -> &[Column] {
        self.columns
            .get(table)
            .and_then(|cols| cols.as_deref())
            .unwrap_or_default()
    }

    pub fn has_tables(&self) -> bool {
        !self.schema.tables.is_empty()
    }

    pub fn end(&self, idx: usize) -> &RelationEnd {
        &self.ends[idx]
    }

    pub fn inverse(&self, end: &RelationEnd) -> &RelationEnd {
        &self.ends[end.inverse]
    }

    pub fn ends(&self) -> &[RelationEnd] {
        &self.ends
    }

    pub fn ends_for(&self, table: usize) -> impl Iterator<Item = &RelationEnd> + '_ {
        self.by_table
            .get(table)
            .into_iter()
            .flatten()
            .map(|&idx| &self.ends[idx])
    }

    pub fn foreign_key(&self, idx: usize) -> &ForeignKey {
        &self.foreign_keys[idx]
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    /// Foreign keys physically stored on `table`, in relationship order.
    pub fn foreign_keys_for(&self, table: usize) -> impl Iterator<Item = &ForeignKey> + '_ {
        self.foreign_keys.iter().filter(move |fk| fk.table == table)
    }

    /// The first foreign key stored in `column` of `table`, if any.
    pub fn foreign_key_on(&self, table: usize, column: &str) -> Option<&ForeignKey> {
        self.foreign_keys_for(table).find(|fk| fk.column == column)
    }

    /// Foreign key columns that `table` lacks and emitters must add.
    pub fn synthesized_columns(&self, table: usize) -> Vec<Column> {
        self.foreign_keys_for(table)
            .filter(|fk| fk.synthesized)
            .map(ForeignKey::to_column)
            .collect()
    }

    pub fn junction(&self, idx: usize) -> &Junction {
        &self.junctions[idx]
    }

    pub fn junctions(&self) -> &[Junction] {
        &self.junctions
    }

    /// Well-formed tables ordered so that referenced tables come before the
    /// tables holding foreign keys to them. Ties keep input order; tables in
    /// a reference cycle go last.
    pub fn dependency_order(&self) -> Vec<usize> {
        let tables: Vec<usize> = self.tables().map(|(idx, _, _)| idx).collect();
        let count = self.schema.tables.len();

        let mut parents: Vec<HashSet<usize>> = vec![HashSet::new(); count];
        for fk in &self.foreign_keys {
            if fk.table != fk.references_table {
                parents[fk.table].insert(fk.references_table);
            }
        }

        let mut levels: Vec<Option<usize>> = vec![None; count];
        for &t in &tables {
            if parents[t].is_empty() {
                levels[t] = Some(0);
            }
        }

        let mut changed = true;
        while changed {
            changed = false;
            for &t in &tables {
                if levels[t].is_some() {
                    continue;
                }
                let parent_levels: Vec<usize> =
                    parents[t].iter().filter_map(|&p| levels[p]).collect();
                if parent_levels.len() == parents[t].len() {
                    levels[t] = Some(parent_levels.iter().max().copied().unwrap_or(0) + 1);
                    changed = true;
                }
            }
        }

        let max_level = levels.iter().flatten().copied().max().unwrap_or(0);
        let mut ordered = tables;
        ordered.sort_by_key(|&t| (levels[t].unwrap_or(max_level + 1), t));
        ordered
    }
}

/// `posts` for a to-many end on `Post`, `post` for a to-one end.
pub fn field_name(table: &Table, cardinality: Cardinality) -> String {
    match cardinality {
        Cardinality::One => table.lower_name(),
        Cardinality::Many => format!("{}s", table.lower_name()),
    }
}

fn unique_name(taken: &mut HashSet<String>, base: String) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}{}", base, n);
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn non_empty_key(key: &str) -> &str {
    if key.is_empty() { "id" } else { key }
}

fn referenced_type(table: &Table, key: &str) -> ColumnType {
    table
        .column(key)
        .map(|c| c.column_type.clone())
        .unwrap_or(ColumnType::Varchar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Relationship, Table};

    fn user() -> Table {
        Table::new(
            "t1",
            "User",
            vec![Column::new("id", ColumnType::Uuid).primary()],
        )
    }

    fn post() -> Table {
        Table::new(
            "t2",
            "Post",
            vec![Column::new("id", ColumnType::Uuid).primary()],
        )
    }

    #[test]
    fn test_one_to_many_target_owns() {
        let schema = Schema::new(
            vec![user(), post()],
            vec![Relationship::new("r1", "t1", "t2", "id", "user_id", RelationKind::OneToMany)],
        );
        let res = Resolution::new(&schema);

        let user_ends: Vec<_> = res.ends_for(0).collect();
        assert_eq!(user_ends.len(), 1);
        assert_eq!(user_ends[0].field, "posts");
        assert_eq!(user_ends[0].cardinality, Cardinality::Many);
        assert!(matches!(user_ends[0].role, EndRole::Inverse { .. }));

        let post_ends: Vec<_> = res.ends_for(1).collect();
        assert_eq!(post_ends[0].field, "user");
        assert_eq!(res.inverse(post_ends[0]).field, "posts");

        let fk = res.foreign_keys_for(1).next().unwrap();
        assert_eq!(fk.column, "user_id");
        assert_eq!(fk.references_table, 0);
        assert_eq!(fk.references_column, "id");
        assert_eq!(fk.column_type, ColumnType::Uuid);
        assert!(fk.synthesized);
        assert_eq!(res.synthesized_columns(1).len(), 1);
        assert!(res.synthesized_columns(0).is_empty());
    }

    #[test]
    fn test_many_to_one_source_owns() {
        let schema = Schema::new(
            vec![post(), user()],
            vec![Relationship::new("r1", "t2", "t1", "author_id", "id", RelationKind::ManyToOne)],
        );
        let res = Resolution::new(&schema);

        let fk = &res.foreign_keys()[0];
        assert_eq!(fk.table, 0);
        assert_eq!(fk.column, "user_id");
        assert_eq!(res.ends_for(1).next().unwrap().field, "posts");
    }

    #[test]
    fn test_existing_column_is_reused() {
        let mut post = post();
        post.columns
            .as_mut()
            .unwrap()
            .push(Column::new("author_id", ColumnType::Uuid));
        let schema = Schema::new(
            vec![user(), post],
            vec![Relationship::new("r1", "t1", "t2", "id", "author_id", RelationKind::OneToMany)],
        );
        let res = Resolution::new(&schema);

        let fk = &res.foreign_keys()[0];
        assert_eq!(fk.column, "author_id");
        assert!(!fk.synthesized);
        assert!(res.synthesized_columns(1).is_empty());
    }

    #[test]
    fn test_one_to_one_owner_is_unique() {
        let profile = Table::new("t3", "Profile", vec![Column::new("id", ColumnType::Integer).primary()]);
        let schema = Schema::new(
            vec![user(), profile],
            vec![Relationship::new("r1", "t1", "t3", "id", "id", RelationKind::OneToOne)],
        );
        let res = Resolution::new(&schema);

        let fk = &res.foreign_keys()[0];
        assert_eq!(fk.table, 0);
        assert_eq!(fk.column, "profile_id");
        assert_eq!(fk.column_type, ColumnType::Integer);
        assert!(fk.unique);
        let inverse = res.ends_for(1).next().unwrap();
        assert_eq!(inverse.field, "user");
        assert_eq!(inverse.cardinality, Cardinality::One);
    }

    #[test]
    fn test_one_to_one_reused_column_becomes_unique() {
        let user = Table::new(
            "t1",
            "User",
            vec![
                Column::new("id", ColumnType::Uuid).primary(),
                Column::new("profile_id", ColumnType::Uuid),
            ],
        );
        let profile = Table::new("t3", "Profile", vec![Column::new("id", ColumnType::Uuid).primary()]);
        let schema = Schema::new(
            vec![user, profile],
            vec![Relationship::new("r1", "t1", "t3", "profile_id", "id", RelationKind::OneToOne)],
        );
        let res = Resolution::new(&schema);

        assert!(!res.foreign_keys()[0].synthesized);
        let column = &res.columns(0)[1];
        assert_eq!(column.name, "profile_id");
        assert!(column.is_unique);
        assert!(column.is_foreign);
        // The input schema is left as it was
        assert!(!schema.tables[0].columns.as_ref().unwrap()[1].is_unique);
    }

    #[test]
    fn test_many_to_one_reused_column_stays_non_unique() {
        let mut post = post();
        post.columns
            .as_mut()
            .unwrap()
            .push(Column::new("author_id", ColumnType::Uuid));
        let schema = Schema::new(
            vec![post, user()],
            vec![Relationship::new("r1", "t2", "t1", "author_id", "id", RelationKind::ManyToOne)],
        );
        let res = Resolution::new(&schema);

        let (_, _, columns) = res.tables().next().unwrap();
        assert!(columns[1].is_foreign);
        assert!(!columns[1].is_unique);
    }

    #[test]
    fn test_junction_name_taken_by_table() {
        let student = Table::new("s", "Student", vec![Column::new("id", ColumnType::Uuid).primary()]);
        let course = Table::new("c", "Course", vec![Column::new("id", ColumnType::Uuid).primary()]);
        let enrollment = Table::new("e", "Enrollment", vec![Column::new("grade", ColumnType::Text)]);
        let schema = Schema::new(
            vec![student, course, enrollment],
            vec![
                Relationship::new("r1", "s", "c", "id", "id", RelationKind::ManyToMany).through("enrollment"),
                Relationship::new("r2", "c", "s", "id", "id", RelationKind::ManyToMany).through("enrollment"),
            ],
        );
        let res = Resolution::new(&schema);

        assert_eq!(res.junctions().len(), 1);
        assert_eq!(res.junctions()[0].name, "enrollment2");
        // Relation names keep the requested name
        assert_eq!(res.ends()[0].relation_name, "enrollment");
        // Course is the junction's target even when it starts the relationship
        assert!(matches!(res.ends()[2].role, EndRole::Junction { source: false, .. }));
        assert!(matches!(res.ends()[3].role, EndRole::Junction { source: true, .. }));
    }

    #[test]
    fn test_many_to_many_junction() {
        let student = Table::new("s", "Student", vec![Column::new("id", ColumnType::Uuid).primary()]);
        let course = Table::new("c", "Course", vec![Column::new("id", ColumnType::Uuid).primary()]);
        let schema = Schema::new(
            vec![student, course],
            vec![Relationship::new("r1", "s", "c", "id", "id", RelationKind::ManyToMany)],
        );
        let res = Resolution::new(&schema);

        assert!(res.foreign_keys().is_empty());
        let junction = &res.junctions()[0];
        assert_eq!(junction.name, "student_course");
        assert_eq!(junction.source.column, "student_id");
        assert_eq!(junction.target.column, "course_id");
        assert_eq!(res.ends_for(0).next().unwrap().field, "courses");
        assert_eq!(res.ends_for(1).next().unwrap().field, "students");
    }

    #[test]
    fn test_self_many_to_many_columns_differ() {
        let schema = Schema::new(
            vec![user()],
            vec![Relationship::new("r1", "t1", "t1", "id", "id", RelationKind::ManyToMany).through("follows")],
        );
        let res = Resolution::new(&schema);

        let junction = &res.junctions()[0];
        assert_eq!(junction.name, "follows");
        assert_eq!(junction.source.column, "user_id");
        assert_eq!(junction.target.column, "related_user_id");
        let fields: Vec<_> = res.ends_for(0).map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["users", "users2"]);
    }

    #[test]
    fn test_dangling_and_malformed_endpoints_are_dropped() {
        let schema = Schema::new(
            vec![user(), Table::malformed("t9", "Draft")],
            vec![
                Relationship::new("r1", "t1", "missing", "id", "x_id", RelationKind::OneToMany),
                Relationship::new("r2", "t1", "t9", "id", "user_id", RelationKind::OneToMany),
            ],
        );
        let res = Resolution::new(&schema);

        assert!(res.ends().is_empty());
        assert!(res.foreign_keys().is_empty());
        assert_eq!(res.tables().count(), 1);
    }

    #[test]
    fn test_field_collisions_get_suffixes() {
        let mut post = post();
        post.columns
            .as_mut()
            .unwrap()
            .push(Column::new("user", ColumnType::Text));
        let schema = Schema::new(
            vec![user(), post],
            vec![
                Relationship::new("r1", "t1", "t2", "id", "author_id", RelationKind::OneToMany),
                Relationship::new("r2", "t1", "t2", "id", "editor_id", RelationKind::OneToMany),
            ],
        );
        let res = Resolution::new(&schema);

        let post_fields: Vec<_> = res.ends_for(1).map(|e| e.field.as_str()).collect();
        assert_eq!(post_fields, ["user2", "user3"]);
        let user_fields: Vec<_> = res.ends_for(0).map(|e| e.field.as_str()).collect();
        assert_eq!(user_fields, ["posts", "posts2"]);
        let names: Vec<_> = res.ends_for(0).map(|e| e.relation_name.as_str()).collect();
        assert_eq!(names, ["UserToPost", "UserToPost2"]);
        // Both relationships synthesize user_id; it is emitted once
        assert_eq!(res.synthesized_columns(1).len(), 1);
    }

    #[test]
    fn test_dependency_order_puts_parents_first() {
        let schema = Schema::new(
            vec![post(), user()],
            vec![Relationship::new("r1", "t1", "t2", "id", "user_id", RelationKind::OneToMany)],
        );
        let res = Resolution::new(&schema);
        assert_eq!(res.dependency_order(), vec![1, 0]);
    }

    #[test]
    fn test_dependency_order_cycle_goes_last() {
        let tag = Table::new("t3", "Tag", vec![Column::new("id", ColumnType::Uuid).primary()]);
        let schema = Schema::new(
            vec![user(), post(), tag],
            vec![
                Relationship::new("r1", "t1", "t2", "id", "user_id", RelationKind::OneToMany),
                Relationship::new("r2", "t2", "t1", "id", "post_id", RelationKind::OneToMany),
            ],
        );
        let res = Resolution::new(&schema);
        assert_eq!(res.dependency_order(), vec![2, 0, 1]);
    }
}
