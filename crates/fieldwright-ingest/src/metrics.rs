//! Metrics collected during a run

use crate::types::Disposition;
use fieldwright_domain::ColumnOutcome;

/// Counters for one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Documents processed
    pub documents: usize,

    /// Mentions seen, including instructions and failures
    pub mentions: usize,

    /// Exact-tier matches
    pub exact_matches: usize,

    /// Fuzzy-tier matches
    pub fuzzy_matches: usize,

    /// Semantically confirmed matches
    pub semantic_matches: usize,

    /// Fields created by this run
    pub fields_created: usize,

    /// Fields registered concurrently by another writer and adopted
    pub fields_adopted: usize,

    /// Wide-table columns added
    pub columns_created: usize,

    /// Choose-one groups recorded
    pub groups_recorded: usize,

    /// Instruction mentions skipped
    pub instructions_skipped: usize,

    /// Mentions that failed
    pub failures: usize,
}

impl RunMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a document
    pub fn record_document(&mut self, mentions: usize) {
        self.documents += 1;
        self.mentions += mentions;
    }

    /// Record how a mention was attached
    pub fn record_disposition(&mut self, disposition: &Disposition) {
        match disposition {
            Disposition::Exact => self.exact_matches += 1,
            Disposition::Fuzzy { .. } => self.fuzzy_matches += 1,
            Disposition::Semantic { .. } => self.semantic_matches += 1,
            Disposition::Created { .. } => self.fields_created += 1,
            Disposition::Adopted { .. } => self.fields_adopted += 1,
        }
    }

    /// Record an `ensure_column` outcome
    pub fn record_column(&mut self, outcome: ColumnOutcome) {
        if outcome == ColumnOutcome::Created {
            self.columns_created += 1;
        }
    }

    /// Record a persisted choose-one group
    pub fn record_group(&mut self) {
        self.groups_recorded += 1;
    }

    /// Record a skipped instruction mention
    pub fn record_instruction(&mut self) {
        self.instructions_skipped += 1;
    }

    /// Record a failed mention
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Mentions matched to existing fields, any tier
    pub fn total_matched(&self) -> usize {
        self.exact_matches + self.fuzzy_matches + self.semantic_matches
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let lines = [
            "Ingest Run Summary".to_string(),
            "==================".to_string(),
            format!("Documents: {}", self.documents),
            format!("Mentions: {}", self.mentions),
            format!(
                "Matched: {} (exact {}, fuzzy {}, semantic {})",
                self.total_matched(),
                self.exact_matches,
                self.fuzzy_matches,
                self.semantic_matches
            ),
            format!("Fields created: {}", self.fields_created),
            format!("Fields adopted: {}", self.fields_adopted),
            format!("Columns created: {}", self.columns_created),
            format!("Groups recorded: {}", self.groups_recorded),
            format!("Instructions skipped: {}", self.instructions_skipped),
            format!("Failures: {}", self.failures),
        ];
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwright_domain::DataType;

    #[test]
    fn test_metrics_creation() {
        let metrics = RunMetrics::new();
        assert_eq!(metrics.total_matched(), 0);
        assert_eq!(metrics.fields_created, 0);
        assert_eq!(metrics.failures, 0);
    }

    #[test]
    fn test_record_dispositions() {
        let mut metrics = RunMetrics::new();
        metrics.record_disposition(&Disposition::Exact);
        metrics.record_disposition(&Disposition::Fuzzy { score: 90.0 });
        metrics.record_disposition(&Disposition::Semantic { score: 88.0, similarity: 0.9 });
        metrics.record_disposition(&Disposition::Created { data_type: DataType::Text });
        metrics.record_disposition(&Disposition::Adopted { data_type: DataType::Date });

        assert_eq!(metrics.total_matched(), 3);
        assert_eq!(metrics.fields_created, 1);
        assert_eq!(metrics.fields_adopted, 1);
    }

    #[test]
    fn test_record_column() {
        let mut metrics = RunMetrics::new();
        metrics.record_column(ColumnOutcome::Created);
        metrics.record_column(ColumnOutcome::AlreadyPresent);
        assert_eq!(metrics.columns_created, 1);
    }

    #[test]
    fn test_reset() {
        let mut metrics = RunMetrics::new();
        metrics.record_document(4);
        metrics.record_failure();
        metrics.reset();
        assert_eq!(metrics, RunMetrics::default());
    }

    #[test]
    fn test_summary() {
        let mut metrics = RunMetrics::new();
        metrics.record_document(3);
        metrics.record_disposition(&Disposition::Exact);
        metrics.record_group();

        let summary = metrics.summary();
        assert!(summary.contains("Documents: 1"));
        assert!(summary.contains("Mentions: 3"));
        assert!(summary.contains("Matched: 1 (exact 1, fuzzy 0, semantic 0)"));
        assert!(summary.contains("Groups recorded: 1"));
    }
}
