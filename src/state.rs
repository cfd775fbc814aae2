use crate::consumption::{commit_day, load_month};
use crate::models::{Direction, MonthView};
use crate::session::{
    CalendarSession, ClickRejection, CommitOutcome, CommitTicket, LoadOutcome, LoadTicket,
};
use crate::storage::DrinkStore;
use std::sync::Arc;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DrinkStore>,
    pub session: Arc<Mutex<CalendarSession>>,
}

impl AppState {
    pub fn new(store: Arc<dyn DrinkStore>, view: MonthView) -> Self {
        Self {
            store,
            session: Arc::new(Mutex::new(CalendarSession::new(view))),
        }
    }

    /// Starts a fetch for the session's month.
    pub async fn mount(&self) -> JoinHandle<LoadOutcome> {
        let ticket = self.session.lock().await.begin_load();
        self.spawn_load(ticket)
    }

    pub async fn navigate(&self, direction: Direction) -> JoinHandle<LoadOutcome> {
        let ticket = self.session.lock().await.navigate(direction);
        info!(month = %ticket.view.label(), "navigated");
        self.spawn_load(ticket)
    }

    /// Cycles `day` locally and sends the new quantity in the background.
    pub async fn click(
        &self,
        day: u32,
    ) -> Result<(CommitTicket, JoinHandle<CommitOutcome>), ClickRejection> {
        let ticket = self.session.lock().await.click(day)?;
        let handle = self.spawn_commit(ticket.clone());
        Ok((ticket, handle))
    }

    fn spawn_load(&self, ticket: LoadTicket) -> JoinHandle<LoadOutcome> {
        let store = Arc::clone(&self.store);
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            let result = load_month(store.as_ref(), ticket.view).await;
            session.lock().await.finish_load(ticket, result)
        })
    }

    fn spawn_commit(&self, ticket: CommitTicket) -> JoinHandle<CommitOutcome> {
        let store = Arc::clone(&self.store);
        let session = Arc::clone(&self.session);
        tokio::spawn(async move {
            let result = commit_day(store.as_ref(), ticket.view, ticket.day, ticket.quantity).await;
            let outcome = session.lock().await.finish_commit(&ticket, result);
            if outcome == CommitOutcome::RolledBack {
                warn!(date_key = %ticket.date_key, "rolled back unsaved click");
            }
            outcome
        })
    }
}
