use std::time::Instant;
use tracing::info;

/// Tracker de progreso por archivo: acumula registros y reporta el ritmo.
pub struct ProgressTracker {
    start_time: Instant,
    files_processed: usize,
    total_records: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            files_processed: 0,
            total_records: 0,
        }
    }

    pub fn record_file(&mut self, fuente: &str, records: usize) {
        self.files_processed += 1;
        self.total_records += records as u64;
        info!(
            fuente = %fuente,
            registros = records,
            acumulado = self.total_records,
            "✅ {} normalizado",
            fuente
        );
    }

    pub fn finish(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            self.total_records as f64 / elapsed
        } else {
            0.0
        };
        info!(
            "✅ Complete: {} records from {} files in {:.1}s ({:.0} rec/s)",
            self.total_records, self.files_processed, elapsed, rate
        );
    }

    pub fn files(&self) -> usize {
        self.files_processed
    }

    pub fn total(&self) -> u64 {
        self.total_records
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_files_and_records() {
        let mut progress = ProgressTracker::new();
        progress.record_file("a.csv", 3);
        progress.record_file("b.csv", 0);
        progress.record_file("c.csv", 7);
        assert_eq!(progress.files(), 3);
        assert_eq!(progress.total(), 10);
    }
}
