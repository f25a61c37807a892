use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Instant;

use log::{debug, warn};

use crate::studio::{TraceCompletion, TraceJob};
use crate::vectorizer::Tracer;

/// Runs trace jobs on worker threads and hands completions back in arrival order.
///
/// Jobs are never cancelled; completions may arrive out of issue order, which
/// [`Studio::complete`](crate::Studio::complete) resolves.
pub struct ThreadedExecutor<T> {
    tracer: Arc<T>,
    tx: Sender<TraceCompletion>,
    rx: Receiver<TraceCompletion>,
    in_flight: usize,
}

impl<T> ThreadedExecutor<T>
where
    T: Tracer + Send + Sync + 'static,
{
    pub fn new(tracer: T) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tracer: Arc::new(tracer),
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Number of submitted jobs whose completion has not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start a job on its own thread. `None` is ignored.
    pub fn submit(&mut self, job: Option<TraceJob>) {
        let Some(job) = job else {
            return;
        };
        let tracer = Arc::clone(&self.tracer);
        let tx = self.tx.clone();
        self.in_flight += 1;
        thread::spawn(move || {
            let started = Instant::now();
            let completion = job.run(tracer.as_ref());
            debug!("Trace #{} finished in {:?}", job.seq, started.elapsed());
            if tx.send(completion).is_err() {
                warn!("Trace #{} finished after the session closed", job.seq);
            }
        });
    }

    /// Take a completion if one is ready.
    pub fn try_next(&mut self) -> Option<TraceCompletion> {
        match self.rx.try_recv() {
            Ok(completion) => {
                self.in_flight -= 1;
                Some(completion)
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Block until the next completion, or return `None` when nothing is in flight.
    pub fn next_blocking(&mut self) -> Option<TraceCompletion> {
        if self.in_flight == 0 {
            return None;
        }
        // `self.tx` keeps the channel open; every worker sends exactly once, even on panic.
        let completion = self.rx.recv().ok()?;
        self.in_flight -= 1;
        Some(completion)
    }
}
