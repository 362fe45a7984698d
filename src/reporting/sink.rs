//! Append-only plain-text results file

use crate::error::ScanError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub struct ResultsSink {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl ResultsSink {
    /// Create the file and write the run header; failure here aborts the run
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref().to_path_buf();
        let sink_error = |source| ScanError::OutputSink {
            path: path.display().to_string(),
            source,
        };

        let file = File::create(&path).map_err(sink_error)?;
        let mut writer = BufWriter::new(file);

        write!(
            writer,
            "# Hopper Open Redirect Scan Results\n# Scan started: {}\n\n",
            timestamp()
        )
        .and_then(|_| writer.flush())
        .map_err(sink_error)?;

        Ok(Self {
            path,
            writer: Mutex::new(Some(writer)),
        })
    }

    /// Append one record. A write failure disables the sink for the rest of the run.
    pub fn append(&self, record: &str) {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        let Some(writer) = guard.as_mut() else {
            return;
        };

        let result = writeln!(writer, "{}", record).and_then(|_| writer.flush());

        if let Err(source) = result {
            let err = ScanError::OutputSink {
                path: self.path.display().to_string(),
                source,
            };
            tracing::error!("{}; results file disabled", err);
            *guard = None;
        }
    }

    pub fn finish(&self, total: usize) {
        let mut guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(mut writer) = guard.take() {
            let result = write!(
                writer,
                "\n# Scan completed: {}\n# Total vulnerabilities found: {}\n",
                timestamp(),
                total
            )
            .and_then(|_| writer.flush());

            match result {
                Ok(()) => tracing::info!("Results saved to {}", self.path.display()),
                Err(e) => tracing::error!("Failed to finalise {}: {}", self.path.display(), e),
            }
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
