use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::ExecutionError;
use crate::fixtures::Event;

use super::{ExecutionResult, Runner};

type Responder = dyn Fn(&Event) -> Result<ExecutionResult, ExecutionError> + Send + Sync;

/// Runner returning canned results without touching any backend.
///
/// Every call is counted and the most recent event is kept so tests can
/// check what would have been sent.
pub struct CannedRunner {
    responder: Box<Responder>,
    runs: AtomicUsize,
    last_event: Mutex<Option<Event>>,
}

impl CannedRunner {
    /// Answer every event with `result`.
    pub fn returning(result: ExecutionResult) -> Self {
        Self::from_fn(move |_| Ok(result.clone()))
    }

    /// Fail every event with `err`.
    pub fn failing(err: ExecutionError) -> Self {
        Self::from_fn(move |_| Err(err.clone()))
    }

    /// Compute the answer from the event.
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&Event) -> Result<ExecutionResult, ExecutionError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            runs: AtomicUsize::new(0),
            last_event: Mutex::new(None),
        }
    }

    /// Number of events executed so far.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }

    /// The most recently executed event.
    pub fn last_event(&self) -> Option<Event> {
        self.last_event
            .lock()
            .ok()
            .and_then(|event| event.clone())
    }
}

impl Runner for CannedRunner {
    fn name(&self) -> String {
        "canned".to_string()
    }

    fn run(&self, event: &Event) -> Result<ExecutionResult, ExecutionError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_event.lock() {
            *last = Some(event.clone());
        }
        (self.responder)(event)
    }
}
