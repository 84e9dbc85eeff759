//! Writes summaries and enrichment results into a [`DocumentStore`].
//!
//! Enrichment is a sequence of idempotent steps: ensure the note exists, merge
//! its fields, optionally rename it after the paper, append the formatted
//! metadata, then ensure one document per influential paper. The per-paper
//! documents are written as an unordered batch; a failure is logged and counted
//! but never rolls back what already succeeded.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::{Deserialize, Serialize};

use crate::config::MaterializeOptions;
use crate::error::{AssistantError, AssistantResult, VaultError, VaultResult};
use crate::formatters::{
    InfluentialEntry, Relation, format_influential_document, format_metadata_document,
    field_map, influential_field_map, sanitize_filename,
};
use crate::models::{InfluentialPaper, PaperMetadata};
use crate::vault::DocumentStore;

/// What to do when a document name is already taken.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Leave the existing document alone and link to it.
    #[default]
    Skip,
    /// Replace the existing document.
    Overwrite,
    /// Write under the first free `Name (n)`.
    Suffix,
}

/// Outcome of one enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichReport {
    /// Final name of the enriched note.
    pub note: String,
    /// Influential documents written.
    pub created: usize,
    /// Influential documents left as they were.
    pub skipped: usize,
    /// Influential documents that failed to write.
    pub failed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Create,
    Overwrite,
    Skip,
}

#[derive(Debug)]
struct Planned<'a> {
    paper: &'a InfluentialPaper,
    relation: Relation,
    name: String,
    action: Action,
}

/// Vault writer for assistant results.
#[derive(Debug, Clone)]
pub struct Materializer {
    store: Arc<dyn DocumentStore>,
    options: MaterializeOptions,
}

impl Materializer {
    /// Create a materializer over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, options: MaterializeOptions) -> Self {
        Self { store, options }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Append a formatted summary to `note`.
    pub async fn write_summary(&self, note: &str, text: &str) -> AssistantResult<()> {
        self.store.append(note, text).await?;
        tracing::info!(note, "Summary written");
        Ok(())
    }

    /// Enrich `note` with `metadata` and materialize its influential papers.
    ///
    /// # Errors
    ///
    /// `CapabilityUnavailable` when the store cannot hold structured fields,
    /// `Vault` when the note itself cannot be written. Failures on influential
    /// documents are only counted in the report.
    pub async fn enrich_note(
        &self,
        note: &str,
        metadata: &PaperMetadata,
    ) -> AssistantResult<EnrichReport> {
        if !self.store.supports_structured_fields() {
            return Err(AssistantError::CapabilityUnavailable("structured fields".to_string()));
        }

        self.ensure_note(note).await?;
        self.store.set_structured_fields(note, &field_map(metadata)).await?;
        let note = self.maybe_rename(note, &metadata.title).await?;

        let (citations, references) = if self.options.rank_by_citations {
            (metadata.citations.ranked_citations(), metadata.citations.ranked_references())
        } else {
            (
                metadata.citations.influential_citations.clone(),
                metadata.citations.influential_references.clone(),
            )
        };

        let plan = if self.options.link_influential {
            self.plan(&note, &citations, &references).await?
        } else {
            Vec::new()
        };
        let names: HashMap<&str, &str> =
            plan.iter().map(|p| (p.paper.identity(), p.name.as_str())).collect();

        let text = format_metadata_document(
            metadata,
            &to_entries(&citations, &names),
            &to_entries(&references, &names),
        );
        self.store.append(&note, &format!("\n{text}")).await?;

        let mut report = self.materialize(&note, &plan).await;
        report.note = note;

        tracing::info!(
            note = %report.note,
            created = report.created,
            skipped = report.skipped,
            failed = report.failed,
            "Note enriched"
        );
        Ok(report)
    }

    async fn ensure_note(&self, note: &str) -> VaultResult<()> {
        if self.store.exists(note).await? {
            return Ok(());
        }
        match self.store.create_document(note, "", false).await {
            Ok(()) | Err(VaultError::AlreadyExists { .. }) => Ok(()),
            Err(err) => Err(err),
        }
    }

    async fn maybe_rename(&self, note: &str, title: &str) -> VaultResult<String> {
        if !self.options.rename_to_title {
            return Ok(note.to_string());
        }

        let target = sanitize_filename(title);
        if target == note {
            return Ok(target);
        }
        if self.store.exists(&target).await? {
            tracing::warn!(note, target = %target, "Title note already exists, keeping current name");
            return Ok(note.to_string());
        }

        self.store.rename_document(note, &target).await?;
        Ok(target)
    }

    /// Assign a document name and action to each distinct influential paper.
    async fn plan<'a>(
        &self,
        note: &str,
        citations: &'a [InfluentialPaper],
        references: &'a [InfluentialPaper],
    ) -> VaultResult<Vec<Planned<'a>>> {
        let policy = self.options.collision_policy;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut taken: HashSet<String> = HashSet::from([note.to_string()]);
        let mut plan = Vec::new();

        let tagged = citations
            .iter()
            .map(|p| (p, Relation::Citation))
            .chain(references.iter().map(|p| (p, Relation::Reference)));

        for (paper, relation) in tagged {
            if !seen.insert(paper.identity()) {
                continue;
            }

            let base = sanitize_filename(&paper.title);
            if policy == CollisionPolicy::Suffix {
                let name = self.free_name(&base, &taken).await?;
                taken.insert(name.clone());
                plan.push(Planned { paper, relation, name, action: Action::Create });
                continue;
            }

            if base == note {
                // Left unplanned so it renders as a plain bullet, not a self-link.
                tracing::debug!(note, paper = %paper.title, "Influential paper shares the note's name");
                continue;
            }

            let action = if taken.contains(&base) {
                // Same sanitized title earlier in the batch.
                Action::Skip
            } else if self.store.exists(&base).await? {
                if policy == CollisionPolicy::Overwrite { Action::Overwrite } else { Action::Skip }
            } else {
                Action::Create
            };
            taken.insert(base.clone());
            plan.push(Planned { paper, relation, name: base, action });
        }

        Ok(plan)
    }

    async fn free_name(&self, base: &str, taken: &HashSet<String>) -> VaultResult<String> {
        let mut candidate = base.to_string();
        let mut n = 2;
        while taken.contains(&candidate) || self.store.exists(&candidate).await? {
            candidate = format!("{base} ({n})");
            n += 1;
        }
        Ok(candidate)
    }

    async fn materialize(&self, note: &str, plan: &[Planned<'_>]) -> EnrichReport {
        let mut report = EnrichReport::default();
        let mut futures = FuturesUnordered::new();

        for planned in plan {
            if planned.action == Action::Skip {
                report.skipped += 1;
                continue;
            }

            let store = Arc::clone(&self.store);
            let body = format_influential_document(planned.paper, note, planned.relation);
            let fields = influential_field_map(planned.paper);
            let overwrite = planned.action == Action::Overwrite;
            let name = planned.name.clone();

            futures.push(async move {
                let result = async {
                    store.create_document(&name, &body, overwrite).await?;
                    store.set_structured_fields(&name, &fields).await
                }
                .await;
                (name, result)
            });
        }

        while let Some((name, result)) = futures.next().await {
            match result {
                Ok(()) => report.created += 1,
                Err(VaultError::AlreadyExists { .. }) => {
                    tracing::debug!(document = %name, "Influential document appeared concurrently");
                    report.skipped += 1;
                }
                Err(err) => {
                    tracing::warn!(document = %name, error = %err, "Failed to write influential document");
                    report.failed += 1;
                }
            }
        }

        report
    }
}

fn to_entries<'a>(
    papers: &'a [InfluentialPaper],
    names: &HashMap<&str, &'a str>,
) -> Vec<InfluentialEntry<'a>> {
    papers
        .iter()
        .map(|paper| InfluentialEntry { paper, document: names.get(paper.identity()).copied() })
        .collect()
}
