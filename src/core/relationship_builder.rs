//! Interactive relationship drawing: pick a source column, then a target.

use crate::core::schema::{Cardinality, Endpoint, ForeignKeyAction, Relationship};
use crate::core::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BuilderState {
    #[default]
    Idle,
    /// Source endpoint captured, waiting for a target
    Pending(Endpoint),
}

#[derive(Debug, Clone, Default)]
pub struct RelationshipBuilder {
    state: BuilderState,
}

impl RelationshipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, BuilderState::Pending(_))
    }

    /// Capture the source endpoint, replacing any earlier pending one
    pub fn start_connection(&mut self, table_id: impl Into<String>, field_id: impl Into<String>) {
        self.state = BuilderState::Pending(Endpoint::new(table_id, field_id));
    }

    pub fn cancel_connection(&mut self) {
        self.state = BuilderState::Idle;
    }

    /// Complete the pending connection through `session`.
    ///
    /// Returns `None` without touching the diagram when nothing is pending,
    /// the target is the source itself, the pair is already connected in
    /// either direction, or an endpoint does not resolve. The builder is idle
    /// afterwards in every case.
    pub fn end_connection(
        &mut self,
        session: &mut Session,
        table_id: &str,
        field_id: &str,
    ) -> Option<Relationship> {
        let BuilderState::Pending(source) = std::mem::take(&mut self.state) else {
            return None;
        };
        let target = Endpoint::new(table_id, field_id);

        if source == target {
            tracing::debug!("Rejected self-loop on {}.{}", table_id, field_id);
            return None;
        }
        if session.diagram().relationship_between(&source, &target).is_some() {
            tracing::debug!("Rejected duplicate relationship");
            return None;
        }

        let relationship = Relationship::new(source, target)
            .with_cardinality(Cardinality::OneToMany)
            .on_update(ForeignKeyAction::NoAction)
            .on_delete(ForeignKeyAction::NoAction);
        match session.add_relationship(relationship) {
            Ok(created) => Some(created.clone()),
            Err(e) => {
                tracing::debug!("Connection not created: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dialect::Dialect;
    use crate::core::schema::create_demo_diagram;

    fn endpoints(session: &Session) -> (Endpoint, Endpoint, Endpoint) {
        let users = &session.diagram().tables[0];
        let orders = &session.diagram().tables[1];
        (
            Endpoint::new(&users.id, &users.fields[0].id),
            Endpoint::new(&users.id, &users.fields[1].id),
            Endpoint::new(&orders.id, &orders.fields[1].id),
        )
    }

    #[test]
    fn test_connection_created_with_defaults() {
        let mut session = Session::new(create_demo_diagram(Dialect::MySql));
        let (_, users_name, orders_user_id) = endpoints(&session);
        let mut builder = RelationshipBuilder::new();

        builder.start_connection(&orders_user_id.table_id, &orders_user_id.field_id);
        assert!(builder.is_pending());
        let rel = builder
            .end_connection(&mut session, &users_name.table_id, &users_name.field_id)
            .unwrap();

        assert_eq!(rel.cardinality, Cardinality::OneToMany);
        assert_eq!(rel.update_constraint, ForeignKeyAction::NoAction);
        assert_eq!(rel.start(), orders_user_id);
        assert_eq!(session.diagram().relationships.len(), 2);
        assert!(session.can_undo());
        assert!(!builder.is_pending());
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut session = Session::new(create_demo_diagram(Dialect::MySql));
        let (users_id, _, _) = endpoints(&session);
        let mut builder = RelationshipBuilder::new();

        builder.start_connection(&users_id.table_id, &users_id.field_id);
        assert!(
            builder
                .end_connection(&mut session, &users_id.table_id, &users_id.field_id)
                .is_none()
        );
        assert_eq!(session.diagram().relationships.len(), 1);
        assert_eq!(builder.state(), &BuilderState::Idle);
    }

    #[test]
    fn test_reverse_duplicate_rejected() {
        let mut session = Session::new(create_demo_diagram(Dialect::MySql));
        let (users_id, _, orders_user_id) = endpoints(&session);
        let mut builder = RelationshipBuilder::new();

        // demo already has orders.user_id -> users.id
        builder.start_connection(&users_id.table_id, &users_id.field_id);
        assert!(
            builder
                .end_connection(&mut session, &orders_user_id.table_id, &orders_user_id.field_id)
                .is_none()
        );
        assert_eq!(session.diagram().relationships.len(), 1);
        assert!(!session.can_undo());
    }

    #[test]
    fn test_unresolved_target_rejected() {
        let mut session = Session::new(create_demo_diagram(Dialect::MySql));
        let (users_id, _, _) = endpoints(&session);
        let mut builder = RelationshipBuilder::new();

        builder.start_connection(&users_id.table_id, &users_id.field_id);
        assert!(builder.end_connection(&mut session, "gone", "gone").is_none());
        assert!(!builder.is_pending());
    }

    #[test]
    fn test_end_without_start_and_cancel() {
        let mut session = Session::new(create_demo_diagram(Dialect::MySql));
        let (users_id, users_name, _) = endpoints(&session);
        let mut builder = RelationshipBuilder::new();

        assert!(
            builder
                .end_connection(&mut session, &users_id.table_id, &users_id.field_id)
                .is_none()
        );

        builder.start_connection(&users_id.table_id, &users_id.field_id);
        builder.cancel_connection();
        assert!(
            builder
                .end_connection(&mut session, &users_name.table_id, &users_name.field_id)
                .is_none()
        );
        assert_eq!(session.diagram().relationships.len(), 1);
    }
}
