#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::core::patch::{FieldPatch, RelationshipPatch};
    use crate::core::snapshot;
    use crate::core::{
        Cardinality, DdlOptions, DefaultValue, Diagram, Dialect, Endpoint, Field,
        ForeignKeyAction, Index, Relationship, RelationshipBuilder, Session, Table,
        create_demo_diagram, generate, generate_statements,
    };

    // ========================================================================
    // Helpers
    // ========================================================================

    struct Demo {
        session: Session,
        users: String,
        users_id: String,
        users_name: String,
        orders: String,
        orders_user_id: String,
    }

    fn demo(dialect: Dialect) -> Demo {
        let diagram = create_demo_diagram(dialect);
        let (users, orders) = (diagram.tables[0].clone(), diagram.tables[1].clone());
        Demo {
            session: Session::new(diagram),
            users: users.id.clone(),
            users_id: users.fields[0].id.clone(),
            users_name: users.fields[1].id.clone(),
            orders: orders.id.clone(),
            orders_user_id: orders.fields[1].id.clone(),
        }
    }

    fn relationships_touching(diagram: &Diagram, table_id: &str) -> usize {
        diagram
            .relationships
            .iter()
            .filter(|r| r.start_table_id == table_id || r.end_table_id == table_id)
            .count()
    }

    // ========================================================================
    // Cascades
    // ========================================================================

    #[test]
    fn test_delete_table_with_two_relationships() {
        let mut d = demo(Dialect::MySql);
        let audit = Table::new("audit")
            .add_field(Field::new("id", "INT").primary_key())
            .add_field(Field::new("order_id", "INT"));
        let (audit_id, audit_fk) = (audit.id.clone(), audit.fields[1].id.clone());
        let orders_pk = d.session.diagram().tables[1].fields[0].id.clone();
        d.session.add_table(audit).unwrap();
        d.session
            .add_relationship(Relationship::new(
                Endpoint::new(&audit_id, &audit_fk),
                Endpoint::new(&d.orders, &orders_pk),
            ))
            .unwrap();

        // orders is the source of one relationship and the target of another
        assert_eq!(relationships_touching(d.session.diagram(), &d.orders), 2);

        d.session.delete_table(&d.orders).unwrap();

        assert_eq!(relationships_touching(d.session.diagram(), &d.orders), 0);
        assert!(d.session.diagram().relationships.is_empty());
        assert!(d.session.diagram().table(&d.orders).is_none());
    }

    #[test]
    fn test_delete_field_removes_only_exact_endpoint() {
        let mut d = demo(Dialect::MySql);
        // second relationship on users.name; deleting users.id must keep it
        let rel = Relationship::new(
            Endpoint::new(&d.orders, &d.orders_user_id),
            Endpoint::new(&d.users, &d.users_name),
        );
        let keep = rel.id.clone();
        d.session.add_relationship(rel).unwrap();

        d.session.delete_field(&d.users, &d.users_id).unwrap();

        let ids: Vec<&str> = d
            .session
            .diagram()
            .relationships
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec![keep.as_str()]);
    }

    #[test]
    fn test_cascades_never_leave_dangling_relationships() {
        let mut d = demo(Dialect::PostgreSql);
        d.session.delete_field(&d.orders, &d.orders_user_id).unwrap();
        d.session.delete_table(&d.users).unwrap();
        let diagram = d.session.diagram();
        for r in &diagram.relationships {
            assert!(diagram.resolve(&r.start()).is_some());
            assert!(diagram.resolve(&r.end()).is_some());
        }
    }

    // ========================================================================
    // History
    // ========================================================================

    #[test]
    fn test_undo_redo_restore_exact_states() {
        let d = demo(Dialect::MySql);
        let mut session = d.session;
        let (users, users_name, orders, orders_user_id) =
            (d.users, d.users_name, d.orders, d.orders_user_id);
        let rel_id = session.diagram().relationships[0].id.clone();

        let steps: Vec<Box<dyn FnOnce(&mut Session)>> = vec![
            Box::new({
                let users = users.clone();
                move |s: &mut Session| {
                    s.add_index(&users, Index::new(["name"]).unique()).unwrap();
                }
            }),
            Box::new({
                let (users, users_name) = (users.clone(), users_name.clone());
                move |s: &mut Session| {
                    s.update_field(&users, &users_name, &FieldPatch::rename("full_name"))
                        .unwrap();
                }
            }),
            Box::new({
                let (users, users_name) = (users.clone(), users_name.clone());
                move |s: &mut Session| s.reorder_field(&users, &users_name, 0).unwrap()
            }),
            Box::new(move |s: &mut Session| {
                s.update_relationship(&rel_id, &RelationshipPatch {
                    cardinality: Some(Cardinality::OneToOne),
                    delete_constraint: Some(ForeignKeyAction::Cascade),
                    ..RelationshipPatch::default()
                })
                .unwrap();
            }),
            Box::new(|s: &mut Session| s.set_dialect(Dialect::Oracle)),
            Box::new({
                let orders = orders.clone();
                move |s: &mut Session| {
                    s.delete_field(&orders, &orders_user_id).unwrap();
                }
            }),
            Box::new({
                let users = users.clone();
                move |s: &mut Session| {
                    s.delete_table(&users).unwrap();
                }
            }),
            Box::new(|s: &mut Session| {
                s.add_table(Table::new("tags").add_field(Field::new("id", "INT")))
                    .unwrap();
            }),
        ];

        for step in steps {
            let before = session.diagram().clone();
            step(&mut session);
            let after = session.diagram().clone();
            assert_ne!(before, after);

            assert!(session.undo());
            assert_eq!(session.diagram(), &before);
            assert!(session.redo());
            assert_eq!(session.diagram(), &after);
        }
        assert!(session.diagram().table(&orders).is_some());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = Session::default();
        for i in 0..120 {
            session.set_title(format!("title {}", i));
            assert!(session.history().len() <= 50);
        }
        assert_eq!(session.history().len(), 50);

        let mut undone = 0;
        while session.undo() {
            undone += 1;
        }
        assert_eq!(undone, 50);
        assert_eq!(session.diagram().title, "title 69");
    }

    #[test]
    fn test_new_mutation_discards_redo() {
        let mut d = demo(Dialect::MySql);
        d.session.set_title("a");
        d.session.undo();
        assert!(d.session.can_redo());
        d.session.set_title("b");
        assert!(!d.session.can_redo());
        assert!(!d.session.redo());
        assert_eq!(d.session.diagram().title, "b");
    }

    #[test]
    fn test_builder_commit_is_undoable() {
        let mut d = demo(Dialect::MySql);
        let mut builder = RelationshipBuilder::new();
        builder.start_connection(&d.orders, &d.orders_user_id);
        builder
            .end_connection(&mut d.session, &d.users, &d.users_name)
            .unwrap();
        assert_eq!(d.session.diagram().relationships.len(), 2);

        d.session.undo();
        assert_eq!(d.session.diagram().relationships.len(), 1);
    }

    #[test]
    fn test_builder_rejections_leave_count_unchanged() {
        let mut d = demo(Dialect::MySql);
        let mut builder = RelationshipBuilder::new();

        builder.start_connection(&d.users, &d.users_name);
        assert!(builder.end_connection(&mut d.session, &d.users, &d.users_name).is_none());

        builder.start_connection(&d.orders, &d.orders_user_id);
        assert!(builder.end_connection(&mut d.session, &d.users, &d.users_id).is_none());

        builder.start_connection(&d.users, &d.users_id);
        assert!(builder.end_connection(&mut d.session, &d.orders, &d.orders_user_id).is_none());

        assert_eq!(d.session.diagram().relationships.len(), 1);
        assert!(!d.session.can_undo());
    }

    // ========================================================================
    // DDL scenarios
    // ========================================================================

    #[test]
    fn test_users_orders_in_every_dialect() {
        for dialect in Dialect::ALL {
            let config = dialect.config();
            let q = |name: &str| config.quote_identifier(name);
            let sql = generate(
                &create_demo_diagram(dialect),
                dialect.id(),
                &DdlOptions::default(),
            );

            assert!(sql.contains(&format!("CREATE TABLE {} (", q("users"))), "{}", sql);
            assert!(sql.contains(&format!("CREATE TABLE {} (", q("orders"))), "{}", sql);
            if dialect == Dialect::Sqlite {
                assert!(sql.contains("\"id\" INTEGER PRIMARY KEY AUTOINCREMENT"), "{}", sql);
            } else {
                assert!(sql.contains(&format!("PRIMARY KEY({})", q("id"))), "{}", sql);
            }
            assert!(
                sql.contains(&format!(
                    "CONSTRAINT {} FOREIGN KEY({}) REFERENCES {}({})",
                    q("fk_orders_user_id_users"),
                    q("user_id"),
                    q("users"),
                    q("id")
                )),
                "{}",
                sql
            );
        }
    }

    #[test]
    fn test_mysql_demo_exact_output() {
        let sql = generate(
            &create_demo_diagram(Dialect::MySql),
            "mysql",
            &DdlOptions::default(),
        );
        let expected = "CREATE TABLE `users` (\n\
             \t`id` INT NOT NULL AUTO_INCREMENT,\n\
             \t`name` VARCHAR(255) NOT NULL,\n\
             \tPRIMARY KEY(`id`)\n\
             );\n\n\
             CREATE TABLE `orders` (\n\
             \t`id` INT NOT NULL AUTO_INCREMENT,\n\
             \t`user_id` INT NOT NULL,\n\
             \tPRIMARY KEY(`id`)\n\
             );\n\n\
             ALTER TABLE `orders` ADD CONSTRAINT `fk_orders_user_id_users` FOREIGN KEY(`user_id`) REFERENCES `users`(`id`) ON UPDATE NO ACTION ON DELETE NO ACTION;";
        assert_eq!(sql, expected);
    }

    #[test]
    fn test_statement_order_tables_then_indexes_then_foreign_keys() {
        let mut diagram = create_demo_diagram(Dialect::PostgreSql);
        Arc::make_mut(&mut diagram.tables[1])
            .indexes
            .push(Index::new(["user_id"]));
        let statements = generate_statements(&diagram, "postgresql", &DdlOptions::default());

        assert_eq!(statements.len(), 4);
        assert!(statements[0].starts_with("CREATE TABLE \"users\""));
        assert!(statements[1].starts_with("CREATE TABLE \"orders\""));
        assert!(statements[2].starts_with("CREATE INDEX \"orders_user_id_index\""));
        assert!(statements[3].starts_with("ALTER TABLE \"orders\" ADD CONSTRAINT"));
    }

    #[test]
    fn test_foreign_key_names_capped_in_every_dialect() {
        let parent = Table::new("p".repeat(40)).add_field(Field::new("id", "INT").primary_key());
        let child = Table::new("c".repeat(40))
            .add_field(Field::new("id", "INT").primary_key())
            .add_field(Field::new("r".repeat(40), "INT"));
        let rel = Relationship::new(
            Endpoint::new(&child.id, &child.fields[1].id),
            Endpoint::new(&parent.id, &parent.fields[0].id),
        );
        let mut diagram = Diagram::new("long", Dialect::MySql);
        diagram.tables.push(Arc::new(parent));
        diagram.tables.push(Arc::new(child));
        diagram.relationships.push(rel);

        let full = format!("fk_{}_{}_{}", "c".repeat(40), "r".repeat(40), "p".repeat(40));
        let capped: String = full.chars().take(64).collect();
        for dialect in Dialect::ALL {
            let sql = generate(&diagram, dialect.id(), &DdlOptions::default());
            let quoted = dialect.config().quote_identifier(&capped);
            assert!(sql.contains(&format!("CONSTRAINT {} FOREIGN KEY", quoted)), "{}", sql);
            assert!(!sql.contains(&full));
        }
    }

    #[test]
    fn test_default_values_quoting() {
        for dialect in Dialect::ALL {
            let config = dialect.config();
            let table = Table::new("accounts")
                .add_field(Field::new("id", "INT").primary_key())
                .add_field(
                    Field::new("created_at", "TIMESTAMP")
                        .with_default(DefaultValue::infer("current_timestamp", config)),
                )
                .add_field(
                    Field::new("status", "VARCHAR")
                        .with_default(DefaultValue::infer("active", config)),
                )
                .add_field(
                    Field::new("motto", "VARCHAR")
                        .with_default(DefaultValue::infer("it's fine", config)),
                );
            let mut diagram = Diagram::new("defaults", dialect);
            diagram.tables.push(Arc::new(table));

            let sql = generate(&diagram, dialect.id(), &DdlOptions::default());
            assert!(sql.contains("DEFAULT CURRENT_TIMESTAMP"), "{}", sql);
            assert!(!sql.contains("'CURRENT_TIMESTAMP'"), "{}", sql);
            assert!(sql.contains("DEFAULT 'active'"), "{}", sql);
            assert!(sql.contains("DEFAULT 'it''s fine'"), "{}", sql);
        }
    }

    #[test]
    fn test_function_default_unquoted() {
        let config = Dialect::PostgreSql.config();
        let table = Table::new("sessions")
            .add_field(Field::new("id", "UUID").with_default(DefaultValue::infer("gen_random_uuid()", config)))
            .add_field(Field::new("seen", "TIMESTAMP").with_default(DefaultValue::infer("NOW()", config)));
        let mut diagram = Diagram::new("fn", Dialect::PostgreSql);
        diagram.tables.push(Arc::new(table));

        let sql = generate(&diagram, "postgresql", &DdlOptions::default());
        assert!(sql.contains("\"id\" UUID DEFAULT gen_random_uuid()"), "{}", sql);
        assert!(sql.contains("\"seen\" TIMESTAMP DEFAULT NOW()"), "{}", sql);
    }

    #[test]
    fn test_unique_two_field_index_in_every_dialect() {
        for dialect in Dialect::ALL {
            let config = dialect.config();
            let q = |name: &str| config.quote_identifier(name);
            let table = Table::new("users")
                .add_field(Field::new("id", "INT").primary_key())
                .add_field(Field::new("email", "VARCHAR"))
                .add_field(Field::new("org", "INT"))
                .add_index(Index::new(["email", "org"]).unique());
            let mut diagram = Diagram::new("idx", dialect);
            diagram.tables.push(Arc::new(table));

            let sql = generate(&diagram, dialect.id(), &DdlOptions::default());
            let name = q("users_email_org_index");
            let line = sql
                .lines()
                .find(|line| line.contains(&name))
                .unwrap_or_else(|| panic!("no index line in {}", sql));
            assert!(line.contains("UNIQUE INDEX"), "{}", line);
            assert!(line.contains(&format!("({}, {})", q("email"), q("org"))), "{}", line);
        }
    }

    #[test]
    fn test_stale_relationship_skipped() {
        let mut diagram = create_demo_diagram(Dialect::PostgreSql);
        diagram.relationships.push(Relationship::new(
            Endpoint::new("missing-table", "missing-field"),
            Endpoint::new(&diagram.tables[0].id, &diagram.tables[0].fields[0].id),
        ));
        for dialect in Dialect::ALL {
            let sql = generate(&diagram, dialect.id(), &DdlOptions::default());
            assert_eq!(sql.matches("FOREIGN KEY").count(), 1, "{}", dialect.id());
        }
    }

    #[test]
    fn test_unknown_dialect_falls_back() {
        let diagram = create_demo_diagram(Dialect::MySql);
        let options = DdlOptions::default();
        assert_eq!(
            generate(&diagram, "db2", &options),
            generate(&diagram, "mysql", &options)
        );
        assert_eq!(
            generate(&diagram, "SQLServer", &options),
            generate(&diagram, "mssql", &options)
        );
    }

    #[test]
    fn test_mssql_batches_every_statement() {
        let statements = generate_statements(
            &create_demo_diagram(Dialect::MsSql),
            "mssql",
            &DdlOptions::default(),
        );
        assert_eq!(statements.len(), 3);
        for statement in &statements {
            assert!(statement.ends_with(";\nGO"), "{}", statement);
        }
        assert!(statements[0].contains("[id] INT IDENTITY(1,1) NOT NULL"));
    }

    #[test]
    fn test_empty_diagram_generates_empty_document() {
        for dialect in Dialect::ALL {
            let diagram = Diagram::new("empty", dialect);
            assert_eq!(generate(&diagram, dialect.id(), &DdlOptions::default()), "");
        }
    }

    #[test]
    fn test_generation_does_not_mutate() {
        let diagram = create_demo_diagram(Dialect::Oracle);
        let before = diagram.clone();
        for dialect in Dialect::ALL {
            generate(&diagram, dialect.id(), &DdlOptions::default());
        }
        assert_eq!(diagram, before);
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    #[test]
    fn test_session_snapshot_round_trip() {
        let mut d = demo(Dialect::Sqlite);
        d.session
            .set_field_default(&d.users, &d.users_name, Some("anonymous"))
            .unwrap();
        let json = snapshot::to_json(&d.session.save_snapshot()).unwrap();

        let mut restored = Session::default();
        restored.load_snapshot(snapshot::from_json(&json).unwrap());

        assert_eq!(restored.diagram(), d.session.diagram());
        assert_eq!(
            restored.export_ddl(&DdlOptions::default()),
            d.session.export_ddl(&DdlOptions::default())
        );
        assert!(!restored.can_undo());
    }
}
