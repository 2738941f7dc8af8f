use crate::config::session_config::{OnStepError, SessionScript, SessionStep};
use crate::core::edit_session::ZoneEditSession;
use crate::core::orders::OrderService;
use crate::core::riders::RiderService;
use crate::core::zones::ZoneService;
use crate::domain::model::Point;
use crate::domain::ports::{OrderRepository, RiderRepository, WarehouseRepository, ZoneRepository};
use crate::utils::error::{AdminError, Result};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    pub index: usize,
    pub action: &'static str,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    pub session: String,
    pub steps: Vec<StepOutcome>,
    pub aborted: bool,
    /// Zone whose edit was still open when the script ended; it was discarded.
    pub discarded_edit: Option<String>,
}

impl ReplayReport {
    pub fn succeeded(&self) -> usize {
        self.steps.iter().filter(|s| s.ok).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.iter().filter(|s| !s.ok).count()
    }
}

/// Runs a session script step by step against one store. At most one zone
/// edit is open at any time.
pub struct SessionReplay<'a, S> {
    store: &'a mut S,
    actor: String,
    edit: Option<ZoneEditSession>,
}

impl<'a, S> SessionReplay<'a, S>
where
    S: ZoneRepository + OrderRepository + WarehouseRepository + RiderRepository,
{
    pub fn new(store: &'a mut S, actor: impl Into<String>) -> Self {
        Self {
            store,
            actor: actor.into(),
            edit: None,
        }
    }

    pub fn run(mut self, script: &SessionScript) -> ReplayReport {
        let started = Instant::now();
        tracing::info!(
            "🚀 Replaying session '{}' ({} steps)",
            script.session.name,
            script.steps.len()
        );

        let mut report = ReplayReport {
            session: script.session.name.clone(),
            ..Default::default()
        };

        for (index, step) in script.steps.iter().enumerate() {
            let action = step.action();
            match self.apply(step) {
                Ok(message) => {
                    tracing::debug!("✅ step {} {}: {}", index, action, message);
                    report.steps.push(StepOutcome {
                        index,
                        action,
                        ok: true,
                        message,
                    });
                }
                Err(e) => {
                    tracing::warn!("❌ step {} {} failed: {}", index, action, e);
                    report.steps.push(StepOutcome {
                        index,
                        action,
                        ok: false,
                        message: e.user_friendly_message(),
                    });
                    if script.error_handling.on_step_error == OnStepError::Abort {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        if let Some(open) = self.edit.take() {
            tracing::warn!("⚠️ Edit of zone {} was never committed; discarded", open.zone_id());
            report.discarded_edit = Some(open.zone_id().to_string());
        }

        tracing::info!(
            "📊 Session '{}' finished in {:?}: {} ok, {} failed{}",
            report.session,
            started.elapsed(),
            report.succeeded(),
            report.failed(),
            if report.aborted { " (aborted)" } else { "" }
        );
        report
    }

    fn open_edit(&mut self) -> Result<&mut ZoneEditSession> {
        self.edit
            .as_mut()
            .ok_or_else(|| AdminError::session_state("no zone edit is open"))
    }

    fn apply(&mut self, step: &SessionStep) -> Result<String> {
        match step {
            SessionStep::Locate { lng, lat } => {
                let zones = ZoneService::new(&mut *self.store);
                let found = zones.locate(&Point::new(*lng, *lat))?;
                Ok(match found {
                    Some(zone) => format!("inside {} ({})", zone.id, zone.name),
                    None => "no zone found for this location".to_string(),
                })
            }
            SessionStep::CreateOrder { order } => {
                let mut orders = OrderService::new(&mut *self.store, self.actor.clone());
                let created = orders.create_order(order.clone())?;
                Ok(format!(
                    "created {} in {}",
                    created.id,
                    created.zone_id.as_deref().unwrap_or("no zone")
                ))
            }
            SessionStep::CancelOrder { order_id } => {
                let mut orders = OrderService::new(&mut *self.store, self.actor.clone());
                orders.cancel_order(order_id)?;
                Ok(format!("cancelled {}", order_id))
            }
            SessionStep::ReassignOrder { order_id, rider_id } => {
                let mut orders = OrderService::new(&mut *self.store, self.actor.clone());
                orders.reassign_order(order_id, rider_id)?;
                Ok(format!("{} reassigned to {}", order_id, rider_id))
            }
            SessionStep::RenameZone { zone_id, name } => {
                let zone = ZoneService::new(&mut *self.store).rename_zone(zone_id, name)?;
                Ok(format!("{} renamed to '{}'", zone.id, zone.name))
            }
            SessionStep::BeginEdit { zone_id } => {
                if let Some(open) = &self.edit {
                    return Err(AdminError::session_state(format!(
                        "zone '{}' is already being edited",
                        open.zone_id()
                    )));
                }
                let session = ZoneService::new(&mut *self.store).begin_edit(zone_id)?;
                let vertices = session.draft()?.len();
                self.edit = Some(session);
                Ok(format!("editing {} ({} vertices)", zone_id, vertices))
            }
            SessionStep::MoveVertex { index, to } => {
                self.open_edit()?.move_vertex(*index, *to)?;
                Ok(format!("vertex {} moved to [{}, {}]", index, to[0], to[1]))
            }
            SessionStep::InsertVertex { after, at } => {
                self.open_edit()?.insert_vertex(*after, *at)?;
                Ok(format!("vertex inserted after {}", after))
            }
            SessionStep::RemoveVertex { index } => {
                self.open_edit()?.remove_vertex(*index)?;
                Ok(format!("vertex {} removed", index))
            }
            SessionStep::CommitEdit => {
                let mut session = self
                    .edit
                    .take()
                    .ok_or_else(|| AdminError::session_state("no zone edit is open"))?;
                let result = ZoneService::new(&mut *self.store).commit_edit(&mut session);
                match result {
                    Ok(zone) => Ok(format!(
                        "{} boundary saved ({} ring positions)",
                        zone.id,
                        zone.polygon.outer_ring().len()
                    )),
                    Err(e) => {
                        // rejected rings keep the session open
                        self.edit = Some(session);
                        Err(e)
                    }
                }
            }
            SessionStep::CancelEdit => {
                let mut session = self
                    .edit
                    .take()
                    .ok_or_else(|| AdminError::session_state("no zone edit is open"))?;
                session.cancel()?;
                Ok(format!("edit of {} cancelled", session.zone_id()))
            }
            SessionStep::AddWarehouse {
                zone_ids,
                warehouse_id,
            } => {
                let changed =
                    ZoneService::new(&mut *self.store).bulk_add_warehouse(zone_ids, warehouse_id)?;
                Ok(format!("{} added to {} zone(s)", warehouse_id, changed))
            }
            SessionStep::RemoveWarehouse {
                zone_ids,
                warehouse_id,
            } => {
                let changed =
                    ZoneService::new(&mut *self.store).bulk_remove_warehouse(zone_ids, warehouse_id);
                Ok(format!("{} removed from {} zone(s)", warehouse_id, changed))
            }
            SessionStep::AssignRider { rider_id, zone_id } => {
                let added = RiderService::new(&mut *self.store).add_rider_zone(rider_id, zone_id)?;
                Ok(if added {
                    format!("{} now covers {}", rider_id, zone_id)
                } else {
                    format!("{} already covers {}", rider_id, zone_id)
                })
            }
            SessionStep::UnassignRider { rider_id, zone_id } => {
                if !RiderService::new(&mut *self.store).remove_rider_zone(rider_id, zone_id) {
                    return Err(AdminError::not_found(
                        "Rider zone",
                        format!("{}/{}", rider_id, zone_id),
                    ));
                }
                Ok(format!("{} no longer covers {}", rider_id, zone_id))
            }
        }
    }
}
