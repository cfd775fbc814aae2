//! In-memory calendar state with two-phase transitions.
//!
//! Every remote operation starts with a ticket taken from the session and
//! ends by handing that ticket back together with the store's result. The
//! session decides on completion whether the result still applies: loads
//! are tied to a load generation, commits to the month they were made in
//! and to a per-date sequence number so that only the newest click on a
//! date may confirm or roll back.

use crate::calendar::{render_grid, Cell, WEEKDAY_LABELS};
use crate::consumption::cycle_day;
use crate::errors::ConsumptionError;
use crate::models::{ConsumptionMap, Direction, MonthResponse, MonthView};
use std::collections::HashMap;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub view: MonthView,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitTicket {
    pub view: MonthView,
    pub day: u32,
    pub date_key: String,
    pub quantity: u8,
    generation: u64,
    seq: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Confirmed,
    RolledBack,
    /// A newer click on the same date owns the outcome.
    Superseded,
    /// The month changed while the write was in flight.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRejection {
    /// The month's counts are not known yet.
    Loading,
    OutsideMonth,
}

/// Outstanding writes for one date.
#[derive(Debug, Clone, Copy)]
struct PendingWrite {
    /// Newest click on the date.
    seq: u64,
    /// Last value known to be stored, and the click that stored it (0 for a read).
    confirmed: Option<u8>,
    confirmed_seq: u64,
}

#[derive(Debug)]
pub struct CalendarSession {
    view: MonthView,
    consumption: ConsumptionMap,
    loading: bool,
    load_generation: u64,
    view_generation: u64,
    next_seq: u64,
    pending: HashMap<String, PendingWrite>,
}

impl CalendarSession {
    pub fn new(view: MonthView) -> Self {
        Self {
            view,
            consumption: ConsumptionMap::new(),
            loading: false,
            load_generation: 0,
            view_generation: 0,
            next_seq: 0,
            pending: HashMap::new(),
        }
    }

    pub fn view(&self) -> MonthView {
        self.view
    }

    pub fn consumption(&self) -> &ConsumptionMap {
        &self.consumption
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn quantity(&self, day: u32) -> u8 {
        self.consumption
            .get(&self.view.date_key(day))
            .copied()
            .unwrap_or(0)
    }

    /// Issues a ticket to refetch the displayed month. Writes already in
    /// flight for this month stay pending.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        self.loading = true;
        LoadTicket {
            view: self.view,
            generation: self.load_generation,
        }
    }

    pub fn navigate(&mut self, direction: Direction) -> LoadTicket {
        self.view = self.view.step(direction);
        self.view_generation += 1;
        self.consumption.clear();
        self.pending.clear();
        self.begin_load()
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ConsumptionMap, ConsumptionError>,
    ) -> LoadOutcome {
        if ticket.generation != self.load_generation {
            warn!(month = %ticket.view.label(), "discarding stale month load");
            return LoadOutcome::Stale;
        }

        self.loading = false;
        let (mut consumption, outcome) = match result {
            Ok(consumption) => (consumption, LoadOutcome::Applied),
            Err(err) => {
                error!("{err}");
                (ConsumptionMap::new(), LoadOutcome::Failed)
            }
        };

        // Dates with a write in flight keep their optimistic value.
        for date_key in self.pending.keys() {
            match self.consumption.get(date_key) {
                Some(quantity) => consumption.insert(date_key.clone(), *quantity),
                None => consumption.remove(date_key),
            };
        }
        self.consumption = consumption;
        outcome
    }

    /// Applies the click locally and returns the write to send.
    pub fn click(&mut self, day: u32) -> Result<CommitTicket, ClickRejection> {
        if self.loading {
            return Err(ClickRejection::Loading);
        }
        if self.view.date(day).is_none() {
            return Err(ClickRejection::OutsideMonth);
        }

        let date_key = self.view.date_key(day);
        let current = self.consumption.get(&date_key).copied();
        let (quantity, updated) = cycle_day(&self.consumption, self.view, day);
        self.consumption = updated;

        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending
            .entry(date_key.clone())
            .and_modify(|pending| pending.seq = seq)
            .or_insert(PendingWrite {
                seq,
                confirmed: current,
                confirmed_seq: 0,
            });

        Ok(CommitTicket {
            view: self.view,
            day,
            date_key,
            quantity,
            generation: self.view_generation,
            seq,
        })
    }

    pub fn finish_commit(
        &mut self,
        ticket: &CommitTicket,
        result: Result<(), ConsumptionError>,
    ) -> CommitOutcome {
        if let Err(err) = &result {
            error!("{err}");
        }

        if ticket.generation != self.view_generation {
            return CommitOutcome::Stale;
        }

        let Some(pending) = self.pending.get_mut(&ticket.date_key) else {
            return CommitOutcome::Superseded;
        };
        if pending.seq != ticket.seq {
            if result.is_ok() && ticket.seq > pending.confirmed_seq {
                pending.confirmed = Some(ticket.quantity);
                pending.confirmed_seq = ticket.seq;
            }
            return CommitOutcome::Superseded;
        }

        let confirmed = pending.confirmed;
        self.pending.remove(&ticket.date_key);

        match result {
            Ok(()) => CommitOutcome::Confirmed,
            Err(_) => {
                match confirmed {
                    Some(quantity) => self.consumption.insert(ticket.date_key.clone(), quantity),
                    None => self.consumption.remove(&ticket.date_key),
                };
                CommitOutcome::RolledBack
            }
        }
    }

    pub fn has_pending(&self, date_key: &str) -> bool {
        self.pending.contains_key(date_key)
    }

    pub fn grid(&self) -> Vec<Cell> {
        render_grid(self.view.year, self.view.month, &self.consumption)
    }

    pub fn snapshot(&self) -> MonthResponse {
        MonthResponse {
            year: self.view.year,
            month: self.view.month,
            label: self.view.label(),
            loading: self.loading,
            weekdays: WEEKDAY_LABELS.to_vec(),
            cells: self.grid(),
        }
    }
}
