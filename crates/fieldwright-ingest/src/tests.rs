//! Integration tests for the Ingestor

#[cfg(test)]
mod tests {
    use crate::{
        Disposition, DocumentRequest, FailureReason, IngestConfig, Ingestor, Mention,
    };
    use fieldwright_domain::traits::{FieldRegistry, SchemaSynchronizer};
    use fieldwright_domain::{
        CanonicalField, ColumnOutcome, DataType, FieldOption, ParagraphGroup, SchemaColumn, Synonym,
    };
    use fieldwright_resolver::{Resolution, SimilarityScorer};
    use fieldwright_store::embedding::EmbeddingError;
    use fieldwright_store::{SqliteStore, StoreError};
    use tempfile::TempDir;

    struct FixedScorer(f32);

    impl SimilarityScorer for FixedScorer {
        fn name(&self) -> &str {
            "fixed"
        }

        fn is_available(&self) -> bool {
            true
        }

        fn similarity(&self, _a: &str, _b: &str) -> Result<f32, EmbeddingError> {
            Ok(self.0)
        }
    }

    /// SQLite store whose first `ensure_column` call fails
    struct FlakyColumnStore {
        inner: SqliteStore,
        column_failures: usize,
    }

    impl FlakyColumnStore {
        fn new(column_failures: usize) -> Self {
            Self {
                inner: SqliteStore::new(":memory:").unwrap(),
                column_failures,
            }
        }
    }

    impl FieldRegistry for FlakyColumnStore {
        type Error = StoreError;

        fn exists(&self, name: &str) -> Result<bool, StoreError> {
            self.inner.exists(name)
        }

        fn register(&mut self, name: &str, data_type: DataType, tooltip: &str) -> Result<bool, StoreError> {
            self.inner.register(name, data_type, tooltip)
        }

        fn get_field(&self, name: &str) -> Result<Option<CanonicalField>, StoreError> {
            self.inner.get_field(name)
        }

        fn list_fields(&self) -> Result<Vec<CanonicalField>, StoreError> {
            self.inner.list_fields()
        }

        fn add_synonym(&mut self, name: &str, raw_text: &str, source_file: &str) -> Result<(), StoreError> {
            self.inner.add_synonym(name, raw_text, source_file)
        }

        fn add_option(&mut self, name: &str, value: &str, order: usize) -> Result<(), StoreError> {
            self.inner.add_option(name, value, order)
        }

        fn synonyms(&self, name: &str) -> Result<Vec<Synonym>, StoreError> {
            self.inner.synonyms(name)
        }

        fn options(&self, name: &str) -> Result<Vec<FieldOption>, StoreError> {
            self.inner.options(name)
        }

        fn record_paragraph_group(&mut self, group: &ParagraphGroup) -> Result<(), StoreError> {
            self.inner.record_paragraph_group(group)
        }
    }

    impl SchemaSynchronizer for FlakyColumnStore {
        type Error = StoreError;

        fn ensure_column(&mut self, name: &str, data_type: DataType) -> Result<ColumnOutcome, StoreError> {
            if self.column_failures > 0 {
                self.column_failures -= 1;
                return Err(StoreError::InvalidData("database is locked".to_string()));
            }
            self.inner.ensure_column(name, data_type)
        }

        fn columns(&self) -> Result<Vec<SchemaColumn>, StoreError> {
            self.inner.columns()
        }
    }

    fn create_test_ingestor() -> Ingestor<SqliteStore> {
        let store = SqliteStore::new(":memory:").unwrap();
        Ingestor::new(store, IngestConfig::default()).unwrap()
    }

    fn document(source_file: &str, mentions: &[&str]) -> DocumentRequest {
        DocumentRequest {
            source_file: source_file.to_string(),
            mentions: mentions.iter().map(|m| Mention::new(*m)).collect(),
        }
    }

    #[test]
    fn test_full_ingest_flow() {
        let ingestor = create_test_ingestor();

        let report = ingestor
            .run(vec![document(
                "complaint.docx",
                &["Plaintiff Name", "plaintiff name:", "Case No.", "Amount Due"],
            )])
            .unwrap();

        assert_eq!(report.created_fields(), vec!["plaintiff_name", "case_number", "amount_due"]);
        assert_eq!(report.metrics.exact_matches, 1);
        assert_eq!(report.metrics.columns_created, 3);
        assert_eq!(report.failures().count(), 0);

        let store = ingestor.store();
        let store = store.lock().unwrap();

        let amount = store.get_field("amount_due").unwrap().unwrap();
        assert_eq!(amount.data_type, DataType::Currency);
        assert_eq!(amount.tooltip, "Enter the amount due");

        let synonyms = store.synonyms("plaintiff_name").unwrap();
        assert_eq!(synonyms.len(), 2);
        assert!(synonyms.iter().all(|s| s.source_file == "complaint.docx"));

        let columns: Vec<String> = store.columns().unwrap().into_iter().map(|c| c.physical_name).collect();
        assert_eq!(columns, vec!["plaintiff_name", "case_number", "amount_due"]);
    }

    #[test]
    fn test_run_sees_its_own_creations() {
        let ingestor = create_test_ingestor();
        let report = ingestor
            .run(vec![document("a.docx", &["Plaintiff Name", "Plaintiffs Name", "Name, Plaintiff"])])
            .unwrap();

        assert_eq!(report.created_fields(), vec!["plaintiff_name"]);
        assert_eq!(report.metrics.fuzzy_matches, 2);

        let outcomes = &report.documents[0].outcomes;
        assert!(outcomes.iter().all(|o| o.canonical_name == "plaintiff_name"));
    }

    #[test]
    fn test_second_run_creates_nothing() {
        let ingestor = create_test_ingestor();
        let doc = document("summons.docx", &["Defendant Name", "Hearing Date", "Court #"]);

        let first = ingestor.run(vec![doc.clone()]).unwrap();
        assert_eq!(first.metrics.fields_created, 3);

        let second = ingestor.run(vec![doc]).unwrap();
        assert_eq!(second.metrics.fields_created, 0);
        assert_eq!(second.metrics.exact_matches, 3);
        assert_eq!(second.metrics.columns_created, 0);
        assert_ne!(first.run_id, second.run_id);

        let store = ingestor.store();
        let store = store.lock().unwrap();
        assert_eq!(store.list_fields().unwrap().len(), 3);
        assert_eq!(store.columns().unwrap().len(), 3);
    }

    #[test]
    fn test_options_recorded() {
        let ingestor = create_test_ingestor();
        let report = ingestor
            .run(vec![document("answer.docx", &["{Plaintiff/Defendant}", "A/B/C/D/E/F"])])
            .unwrap();

        let outcomes = &report.documents[0].outcomes;
        assert_eq!(outcomes[0].canonical_name, "plaintiff_defendant");
        assert_eq!(outcomes[0].options, vec!["Plaintiff", "Defendant"]);
        assert!(outcomes[1].options.is_empty());

        let store = ingestor.store();
        let store = store.lock().unwrap();
        let field = store.get_field("plaintiff_defendant").unwrap().unwrap();
        assert_eq!(field.tooltip, "Select one: Plaintiff, Defendant");

        let options: Vec<String> = store
            .options("plaintiff_defendant")
            .unwrap()
            .into_iter()
            .map(|o| o.option_value)
            .collect();
        assert_eq!(options, vec!["Plaintiff", "Defendant"]);
        assert!(store.options("a_b_c_d_e_f").unwrap().is_empty());
    }

    #[test]
    fn test_empty_mention_is_isolated() {
        let ingestor = create_test_ingestor();
        let report = ingestor
            .run(vec![document("a.docx", &["   ", "{}", "Filing Date"])])
            .unwrap();

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 2);
        assert!(failures.iter().all(|f| f.reason == FailureReason::EmptyMention));
        assert_eq!(report.created_fields(), vec!["filing_date"]);
        assert_eq!(report.metrics.failures, 2);

        let store = ingestor.store();
        assert!(!store.lock().unwrap().exists("field_unknown").unwrap());
    }

    #[test]
    fn test_column_collision_is_isolated() {
        let ingestor = create_test_ingestor();
        let report = ingestor
            .run(vec![document("a.docx", &["Form ID", "Court Name"])])
            .unwrap();

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].raw_text, "Form ID");
        assert!(matches!(failures[0].reason, FailureReason::Schema(_)));
        // The field was still created; only its column is missing
        assert_eq!(report.created_fields(), vec!["form_id", "court_name"]);
        assert_eq!(report.metrics.fields_created, 2);
        assert_eq!(report.metrics.columns_created, 1);

        // The field stays registered without a column
        let store = ingestor.store();
        let store = store.lock().unwrap();
        assert!(store.exists("form_id").unwrap());
        assert_eq!(store.columns().unwrap().len(), 1);
    }

    #[test]
    fn test_reconcile_schema() {
        let ingestor = create_test_ingestor();
        ingestor.run(vec![document("a.docx", &["Court Name", "Form ID"])]).unwrap();

        // A field registered by another tool, never given a column
        ingestor
            .store()
            .lock()
            .unwrap()
            .register("judge_name", DataType::Text, "Enter the judge name")
            .unwrap();

        let report = ingestor.reconcile_schema().unwrap();
        assert_eq!(report.created, vec!["judge_name"]);
        assert_eq!(report.already_present, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].canonical_name, "form_id");

        let again = ingestor.reconcile_schema().unwrap();
        assert!(again.created.is_empty());
        assert_eq!(again.already_present, 2);
    }

    #[test]
    fn test_choose_one_group() {
        let ingestor = create_test_ingestor();
        let request = DocumentRequest {
            source_file: "answer.docx".to_string(),
            mentions: vec![
                Mention::at("Defendant Name", 1),
                Mention::at("{CHOOSE ONE}", 2),
                Mention::at("Admits Allegation", 3),
                Mention::at("Denies Allegation", 4),
                Mention::at("Signature Date", 12),
            ],
        };

        let report = ingestor.run(vec![request]).unwrap();
        assert_eq!(report.metrics.instructions_skipped, 1);
        assert_eq!(report.metrics.groups_recorded, 1);

        let group = &report.documents[0].groups[0];
        assert_eq!(group.instruction, "{CHOOSE ONE}");
        assert_eq!(group.start_paragraph, 2);
        assert_eq!(group.members, vec!["Admits Allegation", "Denies Allegation"]);

        let store = ingestor.store();
        let store = store.lock().unwrap();
        assert!(!store.exists("choose_one").unwrap());
        assert_eq!(store.paragraph_groups("answer.docx").unwrap(), vec![group.clone()]);
    }

    #[test]
    fn test_choose_one_detection_disabled() {
        let config = IngestConfig {
            detect_choose_one: false,
            ..IngestConfig::default()
        };
        let ingestor = Ingestor::new(SqliteStore::new(":memory:").unwrap(), config).unwrap();
        let report = ingestor
            .run(vec![DocumentRequest {
                source_file: "a.docx".to_string(),
                mentions: vec![Mention::at("CHOOSE ONE", 1), Mention::at("Admits", 2)],
            }])
            .unwrap();

        assert_eq!(report.metrics.groups_recorded, 0);
        assert_eq!(report.created_fields(), vec!["choose_one", "admits"]);
    }

    #[test]
    fn test_lost_registration_adopts_winner() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("registry.db");

        let first = Ingestor::new(SqliteStore::new(&path).unwrap(), IngestConfig::default()).unwrap();
        let second = Ingestor::new(SqliteStore::new(&path).unwrap(), IngestConfig::default()).unwrap();

        // Both runs start before either has created anything
        let mut run_a = first.begin_run().unwrap();
        let mut run_b = second.begin_run().unwrap();

        first.ingest_document(&mut run_a, &document("a.docx", &["Hearing Date"]));
        second.ingest_document(&mut run_b, &document("b.docx", &["Hearing Date"]));

        let report_a = first.finish(run_a);
        let report_b = second.finish(run_b);

        assert!(matches!(
            report_a.documents[0].outcomes[0].disposition,
            Disposition::Created { data_type: DataType::Date }
        ));
        assert!(matches!(
            report_b.documents[0].outcomes[0].disposition,
            Disposition::Adopted { data_type: DataType::Date }
        ));
        assert_eq!(report_b.metrics.fields_adopted, 1);
        assert_eq!(report_b.metrics.columns_created, 0);

        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(store.list_fields().unwrap().len(), 1);
        assert_eq!(store.synonyms("hearing_date").unwrap().len(), 1);
        assert_eq!(store.columns().unwrap().len(), 1);
    }

    #[test]
    fn test_semantic_rejection_creates_field() {
        let mut config = IngestConfig::default();
        config.resolver.semantics_enabled = true;
        let ingestor = Ingestor::with_scorer(
            SqliteStore::new(":memory:").unwrap(),
            config,
            Box::new(FixedScorer(0.1)),
        )
        .unwrap();

        let report = ingestor
            .run(vec![document("a.docx", &["Plaintiff Name", "Plaintiffs Name"])])
            .unwrap();
        assert_eq!(report.created_fields(), vec!["plaintiff_name", "plaintiffs_name"]);
    }

    #[test]
    fn test_semantic_confirmation_with_builtin_model() {
        let mut config = IngestConfig::default();
        config.resolver.semantics_enabled = true;
        let ingestor = Ingestor::new(SqliteStore::new(":memory:").unwrap(), config).unwrap();

        let report = ingestor
            .run(vec![document("a.docx", &["Plaintiff Name", "Name of Plaintiff"])])
            .unwrap();
        assert_eq!(report.created_fields(), vec!["plaintiff_name"]);
        assert_eq!(report.metrics.semantic_matches, 1);
    }

    #[test]
    fn test_preview_does_not_write() {
        let ingestor = create_test_ingestor();
        ingestor.run(vec![document("a.docx", &["Plaintiff Name"])]).unwrap();

        let preview = ingestor.preview("plaintiff name:").unwrap();
        assert!(matches!(preview.resolution, Resolution::Matched { .. }));
        assert_eq!(preview.data_type, DataType::Text);

        let preview = ingestor.preview("Contact Email").unwrap();
        assert_eq!(
            preview.resolution,
            Resolution::New {
                canonical_name: "contact_email".to_string()
            }
        );
        assert_eq!(preview.data_type, DataType::Email);
        assert_eq!(preview.tooltip, "Enter the contact email");

        let store = ingestor.store();
        assert!(!store.lock().unwrap().exists("contact_email").unwrap());
        assert!(ingestor.preview("  ").is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = IngestConfig {
            max_options: 0,
            ..IngestConfig::default()
        };
        assert!(Ingestor::new(SqliteStore::new(":memory:").unwrap(), config).is_err());
    }

    #[test]
    fn test_failed_column_is_retried_by_later_mentions() {
        let ingestor = Ingestor::new(FlakyColumnStore::new(1), IngestConfig::default()).unwrap();
        let report = ingestor
            .run(vec![document("notice.docx", &["Hearing Date", "hearing date", "Hearing Date:"])])
            .unwrap();

        // Creation is reported even though its column step failed
        assert_eq!(report.created_fields(), vec!["hearing_date"]);
        assert_eq!(report.metrics.fields_created, 1);
        assert_eq!(report.metrics.columns_created, 1);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].raw_text, "Hearing Date");
        assert!(matches!(failures[0].reason, FailureReason::Schema(_)));

        let store = ingestor.store();
        let store = store.lock().unwrap();
        assert_eq!(store.list_fields().unwrap().len(), 1);
        assert_eq!(store.columns().unwrap().len(), 1);
        // The synonym of the failed mention is still recorded
        assert_eq!(store.synonyms("hearing_date").unwrap().len(), 3);
    }

    #[test]
    fn test_pending_field_from_earlier_run_gets_column() {
        let ingestor = Ingestor::new(FlakyColumnStore::new(1), IngestConfig::default()).unwrap();
        let first = ingestor.run(vec![document("a.docx", &["Judge Name"])]).unwrap();
        assert_eq!(first.metrics.columns_created, 0);

        let second = ingestor.run(vec![document("b.docx", &["Judge Name"])]).unwrap();
        assert_eq!(second.metrics.exact_matches, 1);
        assert_eq!(second.metrics.columns_created, 1);
        assert_eq!(second.failures().count(), 0);

        let store = ingestor.store();
        assert_eq!(store.lock().unwrap().columns().unwrap().len(), 1);
    }
}
