//! Category Worker
//!
//! One worker per asset category. Each worker is an independent state
//! machine:
//!
//! ```text
//! idle --Changed--> triggered --(drain inbox)--> running --> idle
//! ```
//!
//! Changes that arrive while a run is in progress queue one follow-up run;
//! further triggers coalesce into it. Workers never wait on each other.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::messages::WorkerMsg;
use crate::core::AssetCategory;
use crate::logger::{status_error, status_success, status_unchanged};
use crate::pipeline::{PipelineContext, PipelineError, PipelineReport, run_pipeline};

pub struct CategoryWorker {
    category: AssetCategory,
    rx: mpsc::Receiver<WorkerMsg>,
    ctx: Arc<PipelineContext>,
}

impl CategoryWorker {
    pub fn new(category: AssetCategory, rx: mpsc::Receiver<WorkerMsg>, ctx: Arc<PipelineContext>) -> Self {
        Self { category, rx, ctx }
    }

    /// Run until shutdown or until the watcher drops the inbox
    pub async fn run(mut self) {
        while let Some(msg) = self.rx.recv().await {
            let WorkerMsg::Changed(mut changed) = msg else {
                break;
            };

            // Coalesce everything that queued up while we were busy
            let mut shutdown = false;
            while let Ok(more) = self.rx.try_recv() {
                match more {
                    WorkerMsg::Changed(paths) => changed.extend(paths),
                    WorkerMsg::Shutdown => shutdown = true,
                }
            }
            if shutdown {
                break;
            }

            self.log_trigger(&changed);
            let category = self.category;
            let ctx = Arc::clone(&self.ctx);
            let result = tokio::task::spawn_blocking(move || run_pipeline(category, &ctx)).await;

            match result {
                Ok(result) => report(category, &result),
                Err(e) => status_error(&format!("{category} panicked"), &e.to_string()),
            }
        }
        crate::debug!(self.category.name(); "worker stopped");
    }

    fn log_trigger(&self, changed: &[PathBuf]) {
        for path in changed {
            crate::debug!("watch"; "{} <- {}", self.category, self.ctx.config.root_relative(path).display());
        }
    }
}

/// Show the outcome of a watch-triggered run in the status block
fn report(category: AssetCategory, result: &Result<PipelineReport, PipelineError>) {
    match result {
        Ok(report) if report.written == 0 => {
            status_unchanged(&format!("{category}: {}", report.summary()));
        }
        Ok(report) => {
            status_success(&format!(
                "{category}: {} in {}ms",
                report.summary(),
                report.elapsed.as_millis()
            ));
        }
        Err(e) => status_error(&format!("{category} failed"), &e.to_string()),
    }
}
