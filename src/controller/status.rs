// File: src/controller/status.rs
use crate::controller::list::ListController;
use crate::error::{ServiceError, UPDATE_STATUS_FALLBACK};
use crate::model::DeliveryStatus;
use std::collections::HashMap;

/// A staged status that has been submitted and is waiting for the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub event_id: String,
    pub status: DeliveryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { notice: String },
    Failed { message: String },
}

/// Staged (not yet submitted) delivery statuses, keyed by event id.
///
/// An entry only exists while it differs from the row's committed status,
/// so "show the confirm control" is simply "has an entry".
#[derive(Debug, Clone, Default)]
pub struct StatusEditController {
    pending: HashMap<String, DeliveryStatus>,
    in_flight: Option<StatusUpdate>,
}

impl StatusEditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_status(
        &mut self,
        event_id: &str,
        status: DeliveryStatus,
        committed: &DeliveryStatus,
    ) {
        if &status == committed {
            self.pending.remove(event_id);
        } else {
            self.pending.insert(event_id.to_string(), status);
        }
    }

    /// The value the row's dropdown shows.
    pub fn staged<'a>(&'a self, event_id: &str, committed: &'a DeliveryStatus) -> &'a DeliveryStatus {
        self.pending.get(event_id).unwrap_or(committed)
    }

    pub fn show_confirm(&self, event_id: &str) -> bool {
        self.pending.contains_key(event_id)
    }

    /// Global, not per row: one mutation in flight blocks every confirm button.
    pub fn is_updating(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&StatusUpdate> {
        self.in_flight.as_ref()
    }

    pub fn can_confirm(&self, event_id: &str) -> bool {
        !self.is_updating() && self.show_confirm(event_id)
    }

    pub fn begin_update(&mut self, event_id: &str) -> Option<StatusUpdate> {
        if self.is_updating() {
            tracing::debug!(event_id, "status update already in flight");
            return None;
        }
        let update = StatusUpdate {
            event_id: event_id.to_string(),
            status: self.pending.get(event_id)?.clone(),
        };
        self.in_flight = Some(update.clone());
        Some(update)
    }

    pub fn finish_update(
        &mut self,
        update: &StatusUpdate,
        result: Result<(), ServiceError>,
        list: &mut ListController,
    ) -> UpdateOutcome {
        self.in_flight = None;
        match result {
            Ok(()) => {
                list.patch_status(&update.event_id, &update.status);
                if self.pending.get(&update.event_id) == Some(&update.status) {
                    self.pending.remove(&update.event_id);
                }
                tracing::info!(
                    event_id = %update.event_id,
                    status = update.status.as_wire(),
                    "delivery status updated"
                );
                UpdateOutcome::Updated {
                    notice: format!("Delivery status updated to {}", update.status.label()),
                }
            }
            // The staged value stays so the admin can simply retry.
            Err(e) => {
                tracing::warn!(event_id = %update.event_id, "status update failed: {}", e);
                UpdateOutcome::Failed {
                    message: e.user_message(UPDATE_STATUS_FALLBACK),
                }
            }
        }
    }

    /// Called on a full list refresh. The row being submitted keeps its
    /// staged value until `finish_update` settles it.
    pub fn clear(&mut self) {
        match &self.in_flight {
            Some(update) => self.pending.retain(|id, _| *id == update.event_id),
            None => self.pending.clear(),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
