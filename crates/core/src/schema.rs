//! Logical schema description.
//!
//! The reconciler consumes this closed description instead of interpolating
//! arbitrary table names into SQL: every table, column, and constraint the
//! application can touch is declared here with a compile-time-known shape.

/// A single column: name plus the DDL fragment that follows it.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    /// Column name.
    pub name: &'static str,
    /// Type and constraints, e.g. `TEXT NOT NULL`.
    pub ddl: &'static str,
}

/// Referential action taken when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    /// Clear the referencing column (lookup references).
    SetNull,
    /// Delete the referencing row (owned children).
    Cascade,
}

impl ReferentialAction {
    /// SQL rendering of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::SetNull => "SET NULL",
            Self::Cascade => "CASCADE",
        }
    }
}

/// A foreign key declared on a table.
#[derive(Debug, Clone)]
pub struct ForeignKeySpec {
    /// Referencing column.
    pub column: &'static str,
    /// Referenced table. Must appear earlier in the schema ordering.
    pub references_table: &'static str,
    /// Referenced column.
    pub references_column: &'static str,
    /// Action on parent deletion.
    pub on_delete: ReferentialAction,
}

/// A secondary index on a single column.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    /// Index name.
    pub name: &'static str,
    /// Indexed column.
    pub column: &'static str,
}

/// Target shape of one table.
#[derive(Debug, Clone)]
pub struct TableSpec {
    /// Table name.
    pub name: &'static str,
    /// Full target column set, in order.
    pub columns: Vec<ColumnSpec>,
    /// Declared foreign keys.
    pub foreign_keys: Vec<ForeignKeySpec>,
    /// Secondary indexes.
    pub indexes: Vec<IndexSpec>,
    /// Names seeded insert-if-absent into lookup tables.
    pub seed_names: Vec<&'static str>,
}

impl TableSpec {
    /// Render the idempotent create statement with the full target
    /// definition, foreign key clauses included.
    #[must_use]
    pub fn create_table_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.ddl))
            .collect();

        for fk in &self.foreign_keys {
            parts.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {}",
                fk.column,
                fk.references_table,
                fk.references_column,
                fk.on_delete.as_sql()
            ));
        }

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            self.name,
            parts.join(",\n  ")
        )
    }

    /// Render the best-effort column addition for a legacy table.
    #[must_use]
    pub fn add_column_sql(&self, column: &ColumnSpec) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            self.name, column.name, column.ddl
        )
    }

    /// Render the idempotent index creation.
    #[must_use]
    pub fn create_index_sql(&self, index: &IndexSpec) -> String {
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
            index.name, self.name, index.column
        )
    }
}

/// The full schema, ordered parents-first so that foreign key creation always
/// finds its referenced table.
#[derive(Debug, Clone)]
pub struct SchemaSpec {
    /// Tables in reconciliation order.
    pub tables: Vec<TableSpec>,
}

impl SchemaSpec {
    /// Find a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableSpec> {
        self.tables.iter().find(|t| t.name == name)
    }
}

fn lookup_table(name: &'static str, seed_names: Vec<&'static str>) -> TableSpec {
    TableSpec {
        name,
        columns: vec![
            ColumnSpec {
                name: "id",
                ddl: "INTEGER PRIMARY KEY AUTOINCREMENT",
            },
            ColumnSpec {
                name: "name",
                ddl: "TEXT NOT NULL UNIQUE",
            },
        ],
        foreign_keys: vec![],
        indexes: vec![],
        seed_names,
    }
}

/// The inventory schema: lookups first, then primary tables, then children.
#[must_use]
pub fn inventory_schema() -> SchemaSpec {
    SchemaSpec {
        tables: vec![
            lookup_table("types", vec!["Schroeven", "PVC", "Boren", "Spijkers"]),
            lookup_table("locations", vec!["Zolder", "Schuur", "Garage"]),
            lookup_table("sizes", vec!["-"]),
            TableSpec {
                name: "items",
                columns: vec![
                    ColumnSpec {
                        name: "id",
                        ddl: "INTEGER PRIMARY KEY AUTOINCREMENT",
                    },
                    ColumnSpec {
                        name: "label",
                        ddl: "TEXT NOT NULL",
                    },
                    ColumnSpec {
                        name: "type_id",
                        ddl: "INTEGER NULL",
                    },
                    ColumnSpec {
                        name: "size_id",
                        ddl: "INTEGER NULL",
                    },
                    ColumnSpec {
                        name: "location_id",
                        ddl: "INTEGER NULL",
                    },
                    ColumnSpec {
                        name: "box_no",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "qty",
                        ddl: "INTEGER NULL",
                    },
                    ColumnSpec {
                        name: "description",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "store",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "purchase_date",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "warranty_months",
                        ddl: "INTEGER NULL",
                    },
                    ColumnSpec {
                        name: "article_no",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "link_url",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "notes",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "created_at",
                        ddl: "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP",
                    },
                ],
                foreign_keys: vec![
                    ForeignKeySpec {
                        column: "type_id",
                        references_table: "types",
                        references_column: "id",
                        on_delete: ReferentialAction::SetNull,
                    },
                    ForeignKeySpec {
                        column: "size_id",
                        references_table: "sizes",
                        references_column: "id",
                        on_delete: ReferentialAction::SetNull,
                    },
                    ForeignKeySpec {
                        column: "location_id",
                        references_table: "locations",
                        references_column: "id",
                        on_delete: ReferentialAction::SetNull,
                    },
                ],
                indexes: vec![IndexSpec {
                    name: "idx_items_label",
                    column: "label",
                }],
                seed_names: vec![],
            },
            TableSpec {
                name: "boxes",
                columns: vec![
                    ColumnSpec {
                        name: "id",
                        ddl: "INTEGER PRIMARY KEY AUTOINCREMENT",
                    },
                    ColumnSpec {
                        name: "label",
                        ddl: "TEXT NOT NULL",
                    },
                    ColumnSpec {
                        name: "location_id",
                        ddl: "INTEGER NULL",
                    },
                    ColumnSpec {
                        name: "created_at",
                        ddl: "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP",
                    },
                ],
                foreign_keys: vec![ForeignKeySpec {
                    column: "location_id",
                    references_table: "locations",
                    references_column: "id",
                    on_delete: ReferentialAction::SetNull,
                }],
                indexes: vec![],
                seed_names: vec![],
            },
            TableSpec {
                name: "box_items",
                columns: vec![
                    ColumnSpec {
                        name: "id",
                        ddl: "INTEGER PRIMARY KEY AUTOINCREMENT",
                    },
                    ColumnSpec {
                        name: "box_id",
                        ddl: "INTEGER NOT NULL",
                    },
                    ColumnSpec {
                        name: "name",
                        ddl: "TEXT NOT NULL",
                    },
                    ColumnSpec {
                        name: "qty",
                        ddl: "INTEGER NULL",
                    },
                    ColumnSpec {
                        name: "created_at",
                        ddl: "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP",
                    },
                ],
                foreign_keys: vec![ForeignKeySpec {
                    column: "box_id",
                    references_table: "boxes",
                    references_column: "id",
                    on_delete: ReferentialAction::Cascade,
                }],
                indexes: vec![IndexSpec {
                    name: "idx_box_items_box_id",
                    column: "box_id",
                }],
                seed_names: vec![],
            },
            TableSpec {
                name: "attachments",
                columns: vec![
                    ColumnSpec {
                        name: "id",
                        ddl: "INTEGER PRIMARY KEY AUTOINCREMENT",
                    },
                    ColumnSpec {
                        name: "item_id",
                        ddl: "INTEGER NOT NULL",
                    },
                    ColumnSpec {
                        name: "kind",
                        ddl: "TEXT NOT NULL",
                    },
                    ColumnSpec {
                        name: "stored_name",
                        ddl: "TEXT NOT NULL UNIQUE",
                    },
                    ColumnSpec {
                        name: "original_name",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "mime_type",
                        ddl: "TEXT NULL",
                    },
                    ColumnSpec {
                        name: "size_bytes",
                        ddl: "INTEGER NULL",
                    },
                    ColumnSpec {
                        name: "created_at",
                        ddl: "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP",
                    },
                ],
                foreign_keys: vec![ForeignKeySpec {
                    column: "item_id",
                    references_table: "items",
                    references_column: "id",
                    on_delete: ReferentialAction::Cascade,
                }],
                indexes: vec![IndexSpec {
                    name: "idx_attachments_item_id",
                    column: "item_id",
                }],
                seed_names: vec![],
            },
        ],
    }
}
