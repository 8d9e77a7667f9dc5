//! Detail-view counter.
//!
//! Reading a card and counting the view are two separate steps. The handler
//! reads first, then hands the increment to [`ViewCounter::spawn_increment`];
//! the two are not in one transaction. A failed increment is logged and
//! dropped.

use metrics::counter;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::db::Store;
use crate::domain::CardId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOutcome {
    Counted,
    Missing,
    Failed,
}

impl IncrementOutcome {
    const fn label(self) -> &'static str {
        match self {
            Self::Counted => "counted",
            Self::Missing => "missing",
            Self::Failed => "failed",
        }
    }
}

#[derive(Clone)]
pub struct ViewCounter {
    store: Store,
}

impl ViewCounter {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// One atomic `views = views + 1` update.
    pub async fn increment(&self, id: CardId) -> IncrementOutcome {
        let outcome = match self.store.increment_card_views(id.value()).await {
            Ok(true) => IncrementOutcome::Counted,
            Ok(false) => {
                debug!(card_id = %id, "View increment skipped, card is gone");
                IncrementOutcome::Missing
            }
            Err(e) => {
                warn!(card_id = %id, error = %e, "Failed to increment card views");
                IncrementOutcome::Failed
            }
        };

        counter!("card_view_increments_total", "outcome" => outcome.label()).increment(1);
        outcome
    }

    /// Runs [`Self::increment`] in the background.
    pub fn spawn_increment(&self, id: CardId) -> JoinHandle<IncrementOutcome> {
        let counter = self.clone();
        tokio::spawn(async move { counter.increment(id).await })
    }
}
