use crate::reporting::model::Finding;
use crate::reporting::sink::ResultsSink;
use crate::reporting::text;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Run-wide finding collector shared by every worker
#[derive(Default)]
pub struct Reporter {
    count: AtomicUsize,
    findings: Mutex<Vec<Finding>>,
    sink: Option<ResultsSink>,
    console: bool,
}

impl Reporter {
    pub fn new(sink: Option<ResultsSink>) -> Self {
        Self {
            count: AtomicUsize::new(0),
            findings: Mutex::new(Vec::new()),
            sink,
            console: true,
        }
    }

    /// Keep findings off stdout (used by tests)
    #[cfg(test)]
    pub fn silent() -> Self {
        Self {
            console: false,
            ..Self::default()
        }
    }

    pub fn record(&self, finding: Finding) {
        self.count.fetch_add(1, Ordering::SeqCst);

        if self.console {
            println!("{}", text::console_block(&finding));
        }

        if let Some(ref sink) = self.sink {
            sink.append(&text::plain_record(&finding));
        }

        self.findings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(finding);
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub fn findings(&self) -> Vec<Finding> {
        self.findings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Close the results sink with the final total
    pub fn finish(&self) {
        if let Some(ref sink) = self.sink {
            sink.finish(self.count());
        }
    }
}
