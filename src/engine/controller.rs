//! Engine controller implementation.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::debug;
use parking_lot::Mutex;

use super::{SearchEngine, DEFAULT_MAX_TIME_SECS};
use crate::board::{
    SearchConfig, SearchError, SearchInfoCallback, SearchIterationInfo, SearchResult,
    MAX_SEARCH_DEPTH,
};

/// Search thread stack size (32 MB)
const SEARCH_STACK_SIZE: usize = 32 * 1024 * 1024;

/// Active search job state
pub struct SearchJob {
    /// Stop flag for the search
    pub stop: Arc<AtomicBool>,
    /// Set once the job's result has been reported, by `stop` or on completion
    answered: Arc<AtomicBool>,
    /// Handle to the search thread
    handle: JoinHandle<()>,
}

impl SearchJob {
    /// Stop the search and wait for the thread to finish
    pub fn stop_and_wait(self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.handle.join();
    }

    /// Wait for the search to finish on its own.
    pub fn wait(self) {
        let _ = self.handle.join();
    }

    /// Signal stop without waiting
    pub fn signal_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Limits for one `go` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GoParams {
    /// Maximum depth to search (None = unlimited)
    pub depth: Option<u32>,
    /// Time budget in milliseconds (None = default budget)
    pub time_ms: Option<u64>,
}

/// Runs [`SearchEngine`] searches on a background thread.
///
/// The last completed iteration of the running search is published as it
/// finishes, so a stop request can be answered without waiting for the
/// thread.
pub struct EngineController {
    engine: Arc<Mutex<SearchEngine>>,
    current_job: Option<SearchJob>,
    last_iteration: Arc<Mutex<Option<SearchIterationInfo>>>,
    info_callback: Option<SearchInfoCallback>,
}

impl EngineController {
    #[must_use]
    pub fn new(engine: SearchEngine) -> Self {
        EngineController {
            engine: Arc::new(Mutex::new(engine)),
            current_job: None,
            last_iteration: Arc::new(Mutex::new(None)),
            info_callback: None,
        }
    }

    /// Run `f` on the engine after stopping any active search.
    pub fn with_engine<F, R>(&mut self, f: F) -> R
    where
        F: FnOnce(&mut SearchEngine) -> R,
    {
        self.stop_search();
        f(&mut self.engine.lock())
    }

    /// Set callback for iteration info reporting.
    pub fn set_info_callback(&mut self, cb: Option<SearchInfoCallback>) {
        self.info_callback = cb;
    }

    /// Check if there's an active search
    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.current_job.as_ref().is_some_and(|job| !job.is_finished())
    }

    /// Stop any active search and wait for its thread.
    pub fn stop_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.stop_and_wait();
        }
    }

    /// Wait for the active search to finish without stopping it.
    pub fn wait_for_search(&mut self) {
        if let Some(job) = self.current_job.take() {
            job.wait();
        }
    }

    /// Request a stop and return the last completed iteration, which the
    /// caller then reports. Returns `None` if the job already reported or
    /// no iteration has finished yet; the search thread reports then.
    pub fn signal_stop(&mut self) -> Option<SearchIterationInfo> {
        let job = self.current_job.as_ref()?;
        job.signal_stop();
        let info = self.last_iteration.lock().clone()?;
        if job.answered.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(info)
    }

    /// Start a search on the engine's current position.
    ///
    /// `on_complete` runs on the search thread when the search ends, unless
    /// [`EngineController::signal_stop`] already reported a result.
    ///
    /// # Errors
    /// Returns the error from spawning the search thread.
    pub fn start_search<F>(&mut self, params: GoParams, on_complete: F) -> io::Result<()>
    where
        F: FnOnce(Result<SearchResult, SearchError>) + Send + 'static,
    {
        self.stop_search();
        *self.last_iteration.lock() = None;

        let stop = Arc::new(AtomicBool::new(false));
        let answered = Arc::new(AtomicBool::new(false));
        let config = self.build_search_config(params);
        debug!(
            "starting search: depth {:?} time {}ms",
            config.max_depth, config.time_limit_ms
        );

        let engine = Arc::clone(&self.engine);
        let stop_clone = Arc::clone(&stop);
        let answered_clone = Arc::clone(&answered);
        let handle = thread::Builder::new()
            .name("search".to_string())
            .stack_size(SEARCH_STACK_SIZE)
            .spawn(move || {
                let result = engine.lock().search_with(config, &stop_clone);
                if !answered_clone.swap(true, Ordering::AcqRel) {
                    on_complete(result);
                }
            })?;

        self.current_job = Some(SearchJob {
            stop,
            answered,
            handle,
        });
        Ok(())
    }

    fn build_search_config(&self, params: GoParams) -> SearchConfig {
        let last_iteration = Arc::clone(&self.last_iteration);
        let user_callback = self.info_callback.clone();
        let publish: SearchInfoCallback = Arc::new(move |info: &SearchIterationInfo| {
            *last_iteration.lock() = Some(info.clone());
            if let Some(cb) = &user_callback {
                cb(info);
            }
        });

        SearchConfig::depth(params.depth.unwrap_or(MAX_SEARCH_DEPTH))
            .with_time(params.time_ms.unwrap_or(DEFAULT_MAX_TIME_SECS * 1000))
            .with_info_callback(publish)
    }
}

impl Drop for EngineController {
    fn drop(&mut self) {
        self.stop_search();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn completed_search_reports_once() {
        let mut controller = EngineController::new(SearchEngine::new(14));
        let (tx, rx) = mpsc::channel();
        controller
            .start_search(
                GoParams {
                    depth: Some(2),
                    time_ms: None,
                },
                move |result| {
                    let _ = tx.send(result);
                },
            )
            .unwrap();
        let result = rx.recv_timeout(Duration::from_secs(60)).unwrap().unwrap();
        assert!(result.best_move.is_some());
        controller.wait_for_search();
        assert!(controller.signal_stop().is_none());
    }

    #[test]
    fn stop_answers_with_last_iteration() {
        let mut controller = EngineController::new(SearchEngine::new(16));
        let (tx, rx) = mpsc::channel();
        let cb: SearchInfoCallback = Arc::new(move |info: &SearchIterationInfo| {
            let _ = tx.send(info.depth);
        });
        controller.set_info_callback(Some(cb));
        controller
            .start_search(
                GoParams {
                    depth: None,
                    time_ms: Some(600_000),
                },
                |_| {},
            )
            .unwrap();
        // Wait for the first iteration to be published.
        let depth = rx.recv_timeout(Duration::from_secs(60)).unwrap();
        assert!(depth >= 1);
        let info = controller.signal_stop().unwrap();
        assert!(info.depth >= 1);
        controller.stop_search();
        assert!(!controller.is_searching());
    }
}
