use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use checkdag::dag::{JobStatus, StatusChange};
use checkdag::engine::StatusReporter;
use checkdag::errors::Result;

/// A status reporter that records every transition it observes.
///
/// Tests assert on the recorded `(run_id, job, status)` sequence to check
/// that the runtime reports each transition exactly once and in order.
pub struct RecordingReporter {
    reported: Arc<Mutex<Vec<(u64, String, JobStatus)>>>,
}

impl RecordingReporter {
    pub fn new(reported: Arc<Mutex<Vec<(u64, String, JobStatus)>>>) -> Self {
        Self { reported }
    }
}

impl StatusReporter for RecordingReporter {
    fn report(
        &mut self,
        run_id: u64,
        change: StatusChange,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let reported = Arc::clone(&self.reported);

        Box::pin(async move {
            let mut guard = reported.lock().unwrap();
            guard.push((run_id, change.job, change.status));
            Ok(())
        })
    }
}
