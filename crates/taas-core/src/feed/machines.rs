//! Local copy of the `machines` collection

use tracing::debug;

use crate::models::Machine;

use super::ChangeEvent;

/// Machines in backend order; inserts append
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineSet {
    machines: Vec<Machine>,
}

impl MachineSet {
    /// Build from a full-table read
    pub fn from_rows(rows: Vec<Machine>) -> Self {
        Self { machines: rows }
    }

    /// Replace the contents with a full-table read
    pub fn replace(&mut self, rows: Vec<Machine>) {
        self.machines = rows;
    }

    /// Apply one change event
    pub fn apply(&mut self, event: ChangeEvent<Machine>) {
        match event {
            ChangeEvent::Insert { new } => {
                debug!(id = %new.id, "Machine inserted");
                self.machines.push(new);
            }
            ChangeEvent::Update { new } => {
                if let Some(slot) = self.machines.iter_mut().find(|m| m.id == new.id) {
                    debug!(id = %new.id, status = ?new.status, "Machine updated");
                    *slot = new;
                }
            }
            ChangeEvent::Delete { old } => {
                debug!(id = %old.id, "Machine deleted");
                self.machines.retain(|m| m.id != old.id);
            }
        }
    }

    /// Machines in backend order
    pub fn as_slice(&self) -> &[Machine] {
        &self.machines
    }

    /// Number of machines
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    /// Machines currently reporting a fault
    pub fn faulted(&self) -> impl Iterator<Item = &Machine> {
        self.machines.iter().filter(|m| m.is_faulted())
    }
}
