//! Core Ingestor implementation

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::groups::{detect_choose_one, is_choose_one_instruction};
use crate::inference::{clean_label, detect_options, generate_tooltip, TypeInferencer};
use crate::metrics::RunMetrics;
use crate::types::{
    ColumnFailure, Disposition, DocumentReport, DocumentRequest, FailureReason, Mention,
    MentionFailure, MentionOutcome, ReconcileReport, RunReport,
};
use fieldwright_domain::traits::{FieldRegistry, SchemaSynchronizer};
use fieldwright_domain::{ColumnOutcome, DataType, ParagraphGroup, RegistrySnapshot, RunId};
use fieldwright_resolver::{
    DisabledScorer, EmbeddingScorer, IdentityResolver, MatchTier, Resolution, SimilarityScorer,
};
use fieldwright_store::embedding::FeatureHashModel;
use std::collections::HashSet;
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tracing::{debug, info, warn};

/// State of one processing run
///
/// Holds the registry snapshot the resolver sees. Every field the run
/// creates is appended so later mentions match it.
#[derive(Debug)]
pub struct IngestRun {
    run_id: RunId,
    snapshot: RegistrySnapshot,
    /// Fields known to own a wide-table column
    columns_confirmed: HashSet<String>,
    documents: Vec<DocumentReport>,
    metrics: RunMetrics,
    started: Instant,
}

impl IngestRun {
    /// Run identifier
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Fields visible to the resolver
    pub fn snapshot(&self) -> &RegistrySnapshot {
        &self.snapshot
    }

    /// Documents ingested so far
    pub fn documents(&self) -> &[DocumentReport] {
        &self.documents
    }

    /// Counters so far
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }
}

/// What ingesting a mention would do, without writing anything
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// Mention as given
    pub raw_text: String,

    /// Resolver decision against the current registry
    pub resolution: Resolution,

    /// Type of the existing field, or the type that would be inferred
    pub data_type: DataType,

    /// Tooltip a new field would get
    pub tooltip: String,

    /// Options that would be recorded
    pub options: Vec<String>,
}

/// The Ingestor turns template mentions into registry rows and columns
pub struct Ingestor<S>
where
    S: FieldRegistry + SchemaSynchronizer,
{
    store: Arc<Mutex<S>>,
    resolver: IdentityResolver,
    inferencer: TypeInferencer,
    config: IngestConfig,
}

fn registry_failure<E: Display>(e: E) -> FailureReason {
    FailureReason::Registry(e.to_string())
}

impl<S> Ingestor<S>
where
    S: FieldRegistry + SchemaSynchronizer,
    <S as FieldRegistry>::Error: Display,
    <S as SchemaSynchronizer>::Error: Display,
{
    /// Create a new Ingestor
    ///
    /// With `resolver.semantics_enabled`, fuzzy matches are confirmed by the
    /// built-in feature-hashing model.
    pub fn new(store: S, config: IngestConfig) -> Result<Self, IngestError> {
        let scorer: Box<dyn SimilarityScorer> = if config.resolver.semantics_enabled {
            Box::new(EmbeddingScorer::new(FeatureHashModel::default()))
        } else {
            Box::new(DisabledScorer)
        };
        Self::with_scorer(store, config, scorer)
    }

    /// Create a new Ingestor with a specific similarity backend
    pub fn with_scorer(
        store: S,
        config: IngestConfig,
        scorer: Box<dyn SimilarityScorer>,
    ) -> Result<Self, IngestError> {
        Self::from_shared(Arc::new(Mutex::new(store)), config, scorer)
    }

    /// Create a new Ingestor over a store shared with other components
    pub fn from_shared(
        store: Arc<Mutex<S>>,
        config: IngestConfig,
        scorer: Box<dyn SimilarityScorer>,
    ) -> Result<Self, IngestError> {
        config.validate()?;
        let resolver = IdentityResolver::new(config.resolver.clone(), scorer)?;
        let inferencer = TypeInferencer::new(&config.type_rules)?;

        Ok(Self {
            store,
            resolver,
            inferencer,
            config,
        })
    }

    /// Shared handle to the store
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// The identity resolver in use
    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Active configuration
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, S>, IngestError> {
        self.store
            .lock()
            .map_err(|e| IngestError::Lock(e.to_string()))
    }

    /// Start a run with a snapshot of the current registry
    pub fn begin_run(&self) -> Result<IngestRun, IngestError> {
        let store = self.lock()?;
        let fields = store
            .list_fields()
            .map_err(|e| IngestError::Store(e.to_string()))?;
        let columns_confirmed = store
            .columns()
            .map_err(|e| IngestError::Store(e.to_string()))?
            .into_iter()
            .map(|c| c.canonical_name)
            .collect();
        drop(store);

        let run_id = RunId::new();
        info!(
            "Starting run {} with {} registered fields (semantics: {})",
            run_id,
            fields.len(),
            if self.resolver.semantics_active() { self.resolver.scorer_name() } else { "off" }
        );

        Ok(IngestRun {
            run_id,
            snapshot: RegistrySnapshot::from_fields(&fields),
            columns_confirmed,
            documents: Vec::new(),
            metrics: RunMetrics::new(),
            started: Instant::now(),
        })
    }

    /// Ingest one document into a run
    ///
    /// Never aborts on a bad mention; failures land in the document report.
    pub fn ingest_document(&self, run: &mut IngestRun, request: &DocumentRequest) {
        info!(
            "Ingesting '{}' ({} mentions)",
            request.source_file,
            request.mentions.len()
        );
        run.metrics.record_document(request.mentions.len());

        let mut report = DocumentReport {
            source_file: request.source_file.clone(),
            ..DocumentReport::default()
        };

        let plans = if self.config.detect_choose_one {
            detect_choose_one(
                &request.mentions,
                self.config.choose_one_window,
                self.config.choose_one_lookahead,
            )
        } else {
            Vec::new()
        };
        let mut succeeded = vec![false; request.mentions.len()];

        for (index, mention) in request.mentions.iter().enumerate() {
            if self.config.detect_choose_one && is_choose_one_instruction(&mention.raw_text) {
                debug!("Skipping instruction '{}'", mention.raw_text);
                run.metrics.record_instruction();
                continue;
            }

            match self.process_mention(run, mention, &request.source_file) {
                Ok((outcome, deferred)) => {
                    run.metrics.record_disposition(&outcome.disposition);
                    succeeded[index] = true;
                    report.outcomes.push(outcome);

                    // The mention resolved, but persisting its details failed
                    if let Some(reason) = deferred {
                        warn!(
                            "Incomplete mention '{}' in '{}': {}",
                            mention.raw_text, request.source_file, reason
                        );
                        run.metrics.record_failure();
                        report.failures.push(MentionFailure {
                            raw_text: mention.raw_text.clone(),
                            source_file: request.source_file.clone(),
                            reason,
                        });
                    }
                }
                Err(reason) => {
                    warn!(
                        "Failed to process mention '{}' in '{}': {}",
                        mention.raw_text, request.source_file, reason
                    );
                    run.metrics.record_failure();
                    report.failures.push(MentionFailure {
                        raw_text: mention.raw_text.clone(),
                        source_file: request.source_file.clone(),
                        reason,
                    });
                }
            }
        }

        for plan in plans {
            let members: Vec<String> = plan
                .members
                .iter()
                .filter(|&&i| succeeded[i])
                .map(|&i| request.mentions[i].raw_text.trim().to_string())
                .collect();
            if members.is_empty() {
                continue;
            }

            let instruction = &request.mentions[plan.instruction];
            let group = ParagraphGroup {
                instruction: instruction.raw_text.trim().to_string(),
                source_file: request.source_file.clone(),
                start_paragraph: plan.start_paragraph,
                members,
            };

            match self.record_group(&group) {
                Ok(()) => {
                    debug!(
                        "Recorded choose-one group at paragraph {} ({} members)",
                        group.start_paragraph,
                        group.members.len()
                    );
                    run.metrics.record_group();
                    report.groups.push(group);
                }
                Err(reason) => {
                    warn!("Failed to record group '{}': {}", group.instruction, reason);
                    run.metrics.record_failure();
                    report.failures.push(MentionFailure {
                        raw_text: instruction.raw_text.clone(),
                        source_file: request.source_file.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            "Document '{}' complete: {} resolved, {} failed",
            report.source_file,
            report.outcomes.len(),
            report.failures.len()
        );
        run.documents.push(report);
    }

    /// Close a run and produce its report
    pub fn finish(&self, run: IngestRun) -> RunReport {
        let processing_time_ms = run.started.elapsed().as_millis() as u64;

        info!(
            "Run {} complete: {} created, {} matched, {} failed",
            run.run_id,
            run.metrics.fields_created,
            run.metrics.total_matched(),
            run.metrics.failures
        );

        RunReport {
            run_id: run.run_id,
            documents: run.documents,
            metrics: run.metrics,
            processing_time_ms,
        }
    }

    /// Ingest a batch of documents as one run
    pub fn run<I>(&self, documents: I) -> Result<RunReport, IngestError>
    where
        I: IntoIterator<Item = DocumentRequest>,
    {
        let mut run = self.begin_run()?;
        for document in documents {
            self.ingest_document(&mut run, &document);
        }
        Ok(self.finish(run))
    }

    /// Ensure every registered field owns a column
    ///
    /// Repairs fields left without a column by an earlier failure.
    /// Collisions are reported per field and do not stop the pass.
    pub fn reconcile_schema(&self) -> Result<ReconcileReport, IngestError> {
        let mut store = self.lock()?;
        let fields = store
            .list_fields()
            .map_err(|e| IngestError::Store(e.to_string()))?;

        let mut report = ReconcileReport::default();
        for field in fields {
            match store.ensure_column(&field.canonical_name, field.data_type) {
                Ok(ColumnOutcome::Created) => {
                    info!("Reconciled missing column for '{}'", field.canonical_name);
                    report.created.push(field.canonical_name);
                }
                Ok(ColumnOutcome::AlreadyPresent) => report.already_present += 1,
                Err(e) => {
                    warn!("Cannot ensure column for '{}': {}", field.canonical_name, e);
                    report.failures.push(ColumnFailure {
                        canonical_name: field.canonical_name,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Show how a mention would be resolved against the current registry
    pub fn preview(&self, raw: &str) -> Result<Preview, IngestError> {
        if clean_label(raw).is_empty() {
            return Err(IngestError::InvalidInput("mention is empty".to_string()));
        }

        let store = self.lock()?;
        let fields = store
            .list_fields()
            .map_err(|e| IngestError::Store(e.to_string()))?;
        let snapshot = RegistrySnapshot::from_fields(&fields);

        let options = detect_options(raw, self.config.max_options);
        let resolution = self.resolver.resolve(raw, &snapshot);
        let data_type = fields
            .iter()
            .find(|f| f.canonical_name == resolution.canonical_name())
            .map(|f| f.data_type)
            .unwrap_or_else(|| self.inferencer.infer(raw));

        Ok(Preview {
            raw_text: raw.to_string(),
            tooltip: generate_tooltip(raw, &options),
            resolution,
            data_type,
            options,
        })
    }

    /// Resolve one mention and persist everything it implies
    ///
    /// Once the mention has an identity it is always returned as an outcome.
    /// A later failure (column, synonym, option) comes back alongside it.
    fn process_mention(
        &self,
        run: &mut IngestRun,
        mention: &Mention,
        source_file: &str,
    ) -> Result<(MentionOutcome, Option<FailureReason>), FailureReason> {
        let raw = mention.raw_text.trim();
        if clean_label(raw).is_empty() {
            return Err(FailureReason::EmptyMention);
        }

        let options = detect_options(raw, self.config.max_options);
        let resolution = self.resolver.resolve(raw, &run.snapshot);

        let mut store = self
            .store
            .lock()
            .map_err(|e| FailureReason::Lock(e.to_string()))?;

        let (canonical_name, disposition) = match resolution {
            Resolution::Matched { canonical_name, tier } => {
                let disposition = match tier {
                    MatchTier::Exact => Disposition::Exact,
                    MatchTier::Fuzzy { score } => Disposition::Fuzzy { score },
                    MatchTier::Semantic { score, similarity } => Disposition::Semantic { score, similarity },
                };
                (canonical_name, disposition)
            }
            Resolution::New { canonical_name } => {
                let data_type = self.inferencer.infer(raw);
                let tooltip = generate_tooltip(raw, &options);

                let inserted = store
                    .register(&canonical_name, data_type, &tooltip)
                    .map_err(registry_failure)?;

                let disposition = if inserted {
                    info!("Created field '{}' ({}) from '{}'", canonical_name, data_type, raw);
                    Disposition::Created { data_type }
                } else {
                    // Lost a registration race; the winner's row decides the type
                    let winner = store
                        .get_field(&canonical_name)
                        .map_err(registry_failure)?
                        .ok_or_else(|| {
                            FailureReason::Registry(format!(
                                "'{}' missing after registration",
                                canonical_name
                            ))
                        })?;
                    debug!("Adopted concurrently registered field '{}'", canonical_name);
                    Disposition::Adopted {
                        data_type: winner.data_type,
                    }
                };

                run.snapshot.push(canonical_name.clone());
                (canonical_name, disposition)
            }
        };

        let outcome = MentionOutcome {
            raw_text: mention.raw_text.clone(),
            canonical_name,
            disposition,
            options,
        };
        let deferred = self
            .persist_details(&mut store, run, &outcome, raw, source_file)
            .err();

        Ok((outcome, deferred))
    }

    /// Write the column, synonym and options implied by a resolved mention
    ///
    /// `ensure_column` is retried on every mention of a field until it has
    /// succeeded once in this run. A column failure does not stop the
    /// synonym and option writes.
    fn persist_details(
        &self,
        store: &mut S,
        run: &mut IngestRun,
        outcome: &MentionOutcome,
        raw: &str,
        source_file: &str,
    ) -> Result<(), FailureReason> {
        let name = outcome.canonical_name.as_str();

        let column = if run.columns_confirmed.contains(name) {
            Ok(())
        } else {
            self.confirm_column(store, run, name, outcome.disposition)
        };

        store.add_synonym(name, raw, source_file).map_err(registry_failure)?;
        for (order, value) in outcome.options.iter().enumerate() {
            store.add_option(name, value, order).map_err(registry_failure)?;
        }

        column
    }

    fn confirm_column(
        &self,
        store: &mut S,
        run: &mut IngestRun,
        name: &str,
        disposition: Disposition,
    ) -> Result<(), FailureReason> {
        let data_type = match disposition {
            Disposition::Created { data_type } | Disposition::Adopted { data_type } => data_type,
            _ => store
                .get_field(name)
                .map_err(registry_failure)?
                .map(|f| f.data_type)
                .ok_or_else(|| FailureReason::Registry(format!("'{}' is not registered", name)))?,
        };

        let outcome = store
            .ensure_column(name, data_type)
            .map_err(|e| FailureReason::Schema(e.to_string()))?;
        run.metrics.record_column(outcome);
        run.columns_confirmed.insert(name.to_string());
        Ok(())
    }

    fn record_group(&self, group: &ParagraphGroup) -> Result<(), FailureReason> {
        let mut store = self
            .store
            .lock()
            .map_err(|e| FailureReason::Lock(e.to_string()))?;
        store.record_paragraph_group(group).map_err(registry_failure)
    }
}
