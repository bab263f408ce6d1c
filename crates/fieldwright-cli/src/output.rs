//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use fieldwright_domain::{CanonicalField, FieldOption, SchemaColumn, Synonym};
use fieldwright_ingest::{Disposition, Preview, ReconcileReport, RunReport};
use fieldwright_resolver::{MatchTier, Resolution};
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// A field together with the details requested for display.
#[derive(Debug, Clone)]
pub struct FieldListing {
    /// Registry row
    pub field: CanonicalField,
    /// Recorded spellings, if requested
    pub synonyms: Option<Vec<Synonym>>,
    /// Recorded options, if requested
    pub options: Option<Vec<FieldOption>>,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of an ingest run.
    pub fn format_run_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let documents: Vec<serde_json::Value> = report
                    .documents
                    .iter()
                    .map(|doc| {
                        serde_json::json!({
                            "source_file": doc.source_file,
                            "outcomes": doc.outcomes.iter().map(|o| serde_json::json!({
                                "raw_text": o.raw_text,
                                "canonical_name": o.canonical_name,
                                "disposition": o.disposition.label(),
                                "score": disposition_score(&o.disposition),
                                "options": o.options,
                            })).collect::<Vec<_>>(),
                            "groups": doc.groups.iter().map(|g| serde_json::json!({
                                "instruction": g.instruction,
                                "start_paragraph": g.start_paragraph,
                                "members": g.members,
                            })).collect::<Vec<_>>(),
                            "failures": doc.failures.iter().map(|f| serde_json::json!({
                                "raw_text": f.raw_text,
                                "reason": f.reason.to_string(),
                            })).collect::<Vec<_>>(),
                        })
                    })
                    .collect();

                let m = &report.metrics;
                let value = serde_json::json!({
                    "run_id": report.run_id.to_string(),
                    "processing_time_ms": report.processing_time_ms,
                    "metrics": {
                        "documents": m.documents,
                        "mentions": m.mentions,
                        "exact_matches": m.exact_matches,
                        "fuzzy_matches": m.fuzzy_matches,
                        "semantic_matches": m.semantic_matches,
                        "fields_created": m.fields_created,
                        "fields_adopted": m.fields_adopted,
                        "columns_created": m.columns_created,
                        "groups_recorded": m.groups_recorded,
                        "instructions_skipped": m.instructions_skipped,
                        "failures": m.failures,
                    },
                    "documents": documents,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Source", "Mention", "Field", "Disposition", "Score"]);
                for doc in &report.documents {
                    for outcome in &doc.outcomes {
                        let score = disposition_score(&outcome.disposition)
                            .map(|s| format!("{:.1}", s))
                            .unwrap_or_default();
                        builder.push_record([
                            doc.source_file.as_str(),
                            outcome.raw_text.as_str(),
                            outcome.canonical_name.as_str(),
                            outcome.disposition.label(),
                            score.as_str(),
                        ]);
                    }
                }

                let mut out = Vec::new();
                if report.documents.iter().any(|d| !d.outcomes.is_empty()) {
                    out.push(self.table(builder));
                }
                for failure in report.failures() {
                    out.push(self.error(&format!(
                        "{} ({}): {}",
                        failure.raw_text, failure.source_file, failure.reason
                    )));
                }
                out.push(report.metrics.summary());
                out.push(self.success(&format!(
                    "Run {} finished in {} ms",
                    report.run_id, report.processing_time_ms
                )));
                Ok(out.join("\n"))
            }
            OutputFormat::Quiet => Ok(report.created_fields().join("\n")),
        }
    }

    /// Format a resolution preview.
    pub fn format_preview(&self, preview: &Preview) -> Result<String> {
        let (status, score) = resolution_status(&preview.resolution);
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "raw_text": preview.raw_text,
                    "canonical_name": preview.resolution.canonical_name(),
                    "status": status,
                    "score": score,
                    "data_type": preview.data_type.as_str(),
                    "tooltip": preview.tooltip,
                    "options": preview.options,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let score = score.map(|s| format!("{:.1}", s)).unwrap_or_default();
                let options = preview.options.join(", ");
                let mut builder = Builder::default();
                builder.push_record(["Property", "Value"]);
                builder.push_record(["Mention", preview.raw_text.as_str()]);
                builder.push_record(["Field", preview.resolution.canonical_name()]);
                builder.push_record(["Status", status]);
                builder.push_record(["Score", score.as_str()]);
                builder.push_record(["Type", preview.data_type.as_str()]);
                builder.push_record(["Tooltip", preview.tooltip.as_str()]);
                builder.push_record(["Options", options.as_str()]);
                Ok(self.table(builder))
            }
            OutputFormat::Quiet => Ok(preview.resolution.canonical_name().to_string()),
        }
    }

    /// Format canonical fields.
    pub fn format_fields(&self, listings: &[FieldListing]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let fields: Vec<serde_json::Value> = listings
                    .iter()
                    .map(|l| {
                        let mut value = serde_json::json!({
                            "ordinal": l.field.ordinal,
                            "canonical_name": l.field.canonical_name,
                            "data_type": l.field.data_type.as_str(),
                            "tooltip": l.field.tooltip,
                            "created_at": l.field.created_at,
                        });
                        if let Some(synonyms) = &l.synonyms {
                            value["synonyms"] = serde_json::json!(synonyms
                                .iter()
                                .map(|s| serde_json::json!({
                                    "raw_text": s.raw_text,
                                    "source_file": s.source_file,
                                }))
                                .collect::<Vec<_>>());
                        }
                        if let Some(options) = &l.options {
                            value["options"] = serde_json::json!(options
                                .iter()
                                .map(|o| o.option_value.as_str())
                                .collect::<Vec<_>>());
                        }
                        value
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&fields)?)
            }
            OutputFormat::Table => {
                if listings.is_empty() {
                    return Ok(self.colorize("No fields registered.", "yellow"));
                }

                let with_synonyms = listings.iter().any(|l| l.synonyms.is_some());
                let with_options = listings.iter().any(|l| l.options.is_some());

                let mut header = vec!["#", "Field", "Type", "Tooltip"];
                if with_synonyms {
                    header.push("Synonyms");
                }
                if with_options {
                    header.push("Options");
                }

                let mut builder = Builder::default();
                builder.push_record(header);
                for listing in listings {
                    let mut row = vec![
                        listing.field.ordinal.to_string(),
                        listing.field.canonical_name.clone(),
                        listing.field.data_type.to_string(),
                        listing.field.tooltip.clone(),
                    ];
                    if with_synonyms {
                        let synonyms = listing.synonyms.as_deref().unwrap_or_default();
                        row.push(
                            synonyms
                                .iter()
                                .map(|s| s.raw_text.as_str())
                                .collect::<Vec<_>>()
                                .join("\n"),
                        );
                    }
                    if with_options {
                        let options = listing.options.as_deref().unwrap_or_default();
                        row.push(
                            options
                                .iter()
                                .map(|o| o.option_value.as_str())
                                .collect::<Vec<_>>()
                                .join(", "),
                        );
                    }
                    builder.push_record(row);
                }
                Ok(self.table(builder))
            }
            OutputFormat::Quiet => Ok(listings
                .iter()
                .map(|l| l.field.canonical_name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format wide-table column bookkeeping.
    pub fn format_columns(&self, columns: &[SchemaColumn]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value: Vec<serde_json::Value> = columns
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "canonical_name": c.canonical_name,
                            "physical_name": c.physical_name,
                            "physical_type": c.physical_type.sql_type(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                if columns.is_empty() {
                    return Ok(self.colorize("No columns created.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Field", "Column", "Type"]);
                for column in columns {
                    builder.push_record([
                        column.canonical_name.clone(),
                        column.physical_name.clone(),
                        column.physical_type.to_string(),
                    ]);
                }
                Ok(self.table(builder))
            }
            OutputFormat::Quiet => Ok(columns
                .iter()
                .map(|c| c.physical_name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a schema reconciliation result.
    pub fn format_reconcile(&self, report: &ReconcileReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "created": report.created,
                    "already_present": report.already_present,
                    "failures": report.failures.iter().map(|f| serde_json::json!({
                        "canonical_name": f.canonical_name,
                        "reason": f.reason,
                    })).collect::<Vec<_>>(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => {
                let mut out = Vec::new();
                for name in &report.created {
                    out.push(self.success(&format!("Created column for '{}'", name)));
                }
                for failure in &report.failures {
                    out.push(self.error(&format!("{}: {}", failure.canonical_name, failure.reason)));
                }
                out.push(self.info(&format!(
                    "{} created, {} already present, {} failed",
                    report.created.len(),
                    report.already_present,
                    report.failures.len()
                )));
                Ok(out.join("\n"))
            }
            OutputFormat::Quiet => Ok(report.created.join("\n")),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn disposition_score(disposition: &Disposition) -> Option<f64> {
    match disposition {
        Disposition::Fuzzy { score } | Disposition::Semantic { score, .. } => Some(*score),
        _ => None,
    }
}

fn resolution_status(resolution: &Resolution) -> (&'static str, Option<f64>) {
    match resolution {
        Resolution::Matched { tier, .. } => match tier {
            MatchTier::Exact => ("exact", None),
            MatchTier::Fuzzy { score } => ("fuzzy", Some(*score)),
            MatchTier::Semantic { score, .. } => ("semantic", Some(*score)),
        },
        Resolution::New { .. } => ("new", None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldwright_domain::{DataType, RunId};
    use fieldwright_ingest::{DocumentReport, MentionOutcome, RunMetrics};

    fn create_listing(name: &str) -> FieldListing {
        FieldListing {
            field: CanonicalField {
                ordinal: 1,
                canonical_name: name.to_string(),
                data_type: DataType::Date,
                tooltip: "Enter Date of Filing".to_string(),
                created_at: 12345678,
            },
            synonyms: None,
            options: Some(vec![FieldOption {
                canonical_name: name.to_string(),
                option_value: "Monday".to_string(),
                display_order: 0,
            }]),
        }
    }

    fn create_report() -> RunReport {
        let mut metrics = RunMetrics::new();
        metrics.record_document(2);
        let created = Disposition::Created { data_type: DataType::Text };
        let fuzzy = Disposition::Fuzzy { score: 91.3 };
        metrics.record_disposition(&created);
        metrics.record_disposition(&fuzzy);

        RunReport {
            run_id: RunId::new(),
            documents: vec![DocumentReport {
                source_file: "complaint.docx".to_string(),
                outcomes: vec![
                    MentionOutcome {
                        raw_text: "Plaintiff Name".to_string(),
                        canonical_name: "plaintiff_name".to_string(),
                        disposition: created,
                        options: Vec::new(),
                    },
                    MentionOutcome {
                        raw_text: "Plaintiffs Name".to_string(),
                        canonical_name: "plaintiff_name".to_string(),
                        disposition: fuzzy,
                        options: Vec::new(),
                    },
                ],
                groups: Vec::new(),
                failures: Vec::new(),
            }],
            metrics,
            processing_time_ms: 3,
        }
    }

    #[test]
    fn test_fields_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_fields(&[create_listing("date_of_filing")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["canonical_name"], "date_of_filing");
        assert_eq!(value[0]["data_type"], "date");
        assert_eq!(value[0]["options"][0], "Monday");
        assert!(value[0].get("synonyms").is_none());
    }

    #[test]
    fn test_fields_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_fields(&[create_listing("date_of_filing")]).unwrap();
        assert!(output.contains("Tooltip"));
        assert!(output.contains("Options"));
        assert!(!output.contains("Synonyms"));
        assert!(output.contains("date_of_filing"));
    }

    #[test]
    fn test_fields_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter
            .format_fields(&[create_listing("a_field"), create_listing("b_field")])
            .unwrap();
        assert_eq!(output, "a_field\nb_field");
    }

    #[test]
    fn test_empty_fields() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_fields(&[]).unwrap();
        assert!(output.contains("No fields registered"));
    }

    #[test]
    fn test_run_report_quiet_lists_created() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_run_report(&create_report()).unwrap();
        assert_eq!(output, "plaintiff_name");
    }

    #[test]
    fn test_run_report_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_run_report(&create_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["metrics"]["fields_created"], 1);
        assert_eq!(value["documents"][0]["outcomes"][1]["disposition"], "fuzzy");
        assert_eq!(value["documents"][0]["outcomes"][0]["score"], serde_json::Value::Null);
    }

    #[test]
    fn test_run_report_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_run_report(&create_report()).unwrap();
        assert!(output.contains("Disposition"));
        assert!(output.contains("91.3"));
        assert!(output.contains("Fields created: 1"));
    }

    #[test]
    fn test_reconcile_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = ReconcileReport {
            created: vec!["case_number".to_string()],
            already_present: 2,
            failures: Vec::new(),
        };
        let output = formatter.format_reconcile(&report).unwrap();
        assert!(output.contains("✓ Created column for 'case_number'"));
        assert!(output.contains("1 created, 2 already present, 0 failed"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
