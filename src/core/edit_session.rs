//! Caller-owned lifecycle of an interactive zone boundary edit.
//!
//! The session only tracks the draft vertex list the editor produces. It never
//! touches stored zones; committing goes through
//! [`ZoneService::commit_edit`](crate::core::zones::ZoneService::commit_edit).

use crate::core::geometry::is_closed;
use crate::domain::model::{Position, Zone};
use crate::utils::error::{AdminError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    Viewing,
    Editing { draft: Vec<Position> },
}

#[derive(Debug, Clone)]
pub struct ZoneEditSession {
    zone_id: String,
    state: EditState,
}

impl ZoneEditSession {
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            state: EditState::Viewing,
        }
    }

    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Viewing → Editing. The editor gets the ring without its closing vertex,
    /// so every draft index is a real corner.
    pub fn start(&mut self, zone: &Zone) -> Result<()> {
        if zone.id != self.zone_id {
            return Err(AdminError::session_state(format!(
                "session belongs to zone '{}', not '{}'",
                self.zone_id, zone.id
            )));
        }
        if self.is_editing() {
            return Err(AdminError::session_state(format!(
                "zone '{}' is already being edited",
                self.zone_id
            )));
        }

        let ring = zone.polygon.outer_ring();
        let draft = if is_closed(ring) {
            ring[..ring.len() - 1].to_vec()
        } else {
            ring.to_vec()
        };
        tracing::debug!("Editing zone {} with {} vertices", self.zone_id, draft.len());
        self.state = EditState::Editing { draft };
        Ok(())
    }

    pub fn draft(&self) -> Result<&[Position]> {
        match &self.state {
            EditState::Editing { draft } => Ok(draft),
            EditState::Viewing => Err(self.not_editing()),
        }
    }

    fn draft_mut(&mut self) -> Result<&mut Vec<Position>> {
        match self.state {
            EditState::Editing { ref mut draft } => Ok(draft),
            EditState::Viewing => Err(AdminError::session_state(format!(
                "zone '{}' is not being edited",
                self.zone_id
            ))),
        }
    }

    fn not_editing(&self) -> AdminError {
        AdminError::session_state(format!("zone '{}' is not being edited", self.zone_id))
    }

    pub fn move_vertex(&mut self, index: usize, to: Position) -> Result<()> {
        let draft = self.draft_mut()?;
        let len = draft.len();
        let vertex = draft.get_mut(index).ok_or_else(|| {
            AdminError::validation("index", format!("vertex {} out of range (0..{})", index, len))
        })?;
        *vertex = to;
        Ok(())
    }

    /// Inserts `at` right after vertex `after`. On an empty draft `after`
    /// must be 0 and `at` becomes the first vertex.
    pub fn insert_vertex(&mut self, after: usize, at: Position) -> Result<()> {
        let draft = self.draft_mut()?;
        if draft.is_empty() && after == 0 {
            draft.push(at);
            return Ok(());
        }
        if after >= draft.len() {
            return Err(AdminError::validation(
                "after",
                format!("vertex {} out of range (0..{})", after, draft.len()),
            ));
        }
        draft.insert(after + 1, at);
        Ok(())
    }

    /// Removal is not validated here; a draft that drops below 3 corners is
    /// rejected on commit.
    pub fn remove_vertex(&mut self, index: usize) -> Result<Position> {
        let draft = self.draft_mut()?;
        if index >= draft.len() {
            return Err(AdminError::validation(
                "index",
                format!("vertex {} out of range (0..{})", index, draft.len()),
            ));
        }
        Ok(draft.remove(index))
    }

    pub fn replace_draft(&mut self, vertices: Vec<Position>) -> Result<()> {
        *self.draft_mut()? = vertices;
        Ok(())
    }

    /// Editing → Viewing, draft discarded.
    pub fn cancel(&mut self) -> Result<()> {
        if !self.is_editing() {
            return Err(self.not_editing());
        }
        tracing::debug!("Edit of zone {} cancelled", self.zone_id);
        self.state = EditState::Viewing;
        Ok(())
    }

    /// Ends the session after a successful commit.
    pub(crate) fn finish(&mut self) {
        self.state = EditState::Viewing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PolygonGeometry;
    use chrono::Utc;

    fn zone() -> Zone {
        Zone {
            id: "zone-001".to_string(),
            name: "Al Olaya Zone".to_string(),
            warehouse_ids: vec!["wh-001".to_string()],
            polygon: PolygonGeometry::from_ring(vec![
                [46.66, 24.81],
                [46.70, 24.81],
                [46.70, 24.77],
                [46.66, 24.77],
                [46.66, 24.81],
            ]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_start_strips_closing_vertex() {
        let mut session = ZoneEditSession::new("zone-001");
        session.start(&zone()).unwrap();
        assert_eq!(session.draft().unwrap().len(), 4);
    }

    #[test]
    fn test_cannot_start_twice() {
        let mut session = ZoneEditSession::new("zone-001");
        session.start(&zone()).unwrap();
        assert!(matches!(
            session.start(&zone()),
            Err(AdminError::SessionStateError { .. })
        ));
    }

    #[test]
    fn test_cancel_returns_to_viewing() {
        let mut session = ZoneEditSession::new("zone-001");
        session.start(&zone()).unwrap();
        session.move_vertex(1, [46.70, 24.85]).unwrap();
        session.cancel().unwrap();
        assert_eq!(session.state(), &EditState::Viewing);
        assert!(session.draft().is_err());
        assert!(session.cancel().is_err());
    }

    #[test]
    fn test_vertex_operations() {
        let mut session = ZoneEditSession::new("zone-001");
        session.start(&zone()).unwrap();
        session.insert_vertex(0, [46.68, 24.82]).unwrap();
        assert_eq!(session.draft().unwrap()[1], [46.68, 24.82]);
        assert_eq!(session.remove_vertex(1).unwrap(), [46.68, 24.82]);
        assert!(session.move_vertex(9, [0.0, 0.0]).is_err());
        assert!(session.insert_vertex(4, [0.0, 0.0]).is_err());
    }

    #[test]
    fn test_empty_draft_can_be_rebuilt() {
        let mut session = ZoneEditSession::new("zone-001");
        session.start(&zone()).unwrap();
        session.replace_draft(Vec::new()).unwrap();

        assert!(session.insert_vertex(1, [46.66, 24.81]).is_err());
        session.insert_vertex(0, [46.66, 24.81]).unwrap();
        session.insert_vertex(0, [46.70, 24.81]).unwrap();
        session.insert_vertex(1, [46.70, 24.77]).unwrap();
        assert_eq!(
            session.draft().unwrap(),
            &[[46.66, 24.81], [46.70, 24.81], [46.70, 24.77]]
        );
    }

    #[test]
    fn test_editing_requires_session() {
        let mut session = ZoneEditSession::new("zone-001");
        assert!(session.move_vertex(0, [0.0, 0.0]).is_err());
    }

    #[test]
    fn test_wrong_zone_rejected() {
        let mut session = ZoneEditSession::new("zone-002");
        assert!(session.start(&zone()).is_err());
        assert!(!session.is_editing());
    }
}
