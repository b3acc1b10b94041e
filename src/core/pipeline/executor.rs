//! Pipeline execution implementation.

use super::config::{PipelineBuilder, TriageConfig};
use crate::core::analyzer::{AnalysisRecord, FeatureExtractor};
use crate::core::classifier::{BlurMode, Disposition};
use crate::core::comparator::{CanonicalGrouper, Clustering};
use crate::core::faces::FaceHandle;
use crate::core::organize::{
    Destinations, ExecutionResult, MoveExecutor, MovePlan, MovePlanner,
};
use crate::core::scanner::{PhotoFile, PhotoScanner, ScanConfig, WalkDirScanner};
use crate::error::{AnalyzeError, ScanError, SnapsortError};
use crate::events::{
    null_sender, AnalyzeEvent, AnalyzeProgress, ClassifyEvent, Event, EventSender,
    ExecuteEvent, PipelineEvent, PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Result of pipeline execution
#[derive(Debug)]
pub struct TriageResult {
    /// One record per discovered photo, in discovery order
    pub records: Vec<AnalysisRecord>,
    /// Duplicate clusters over `records`
    pub clustering: Clustering,
    /// Disposition per record; `None` for failed records
    pub dispositions: Vec<Option<Disposition>>,
    /// Planned moves in discovery order. Identical with and without dry-run.
    pub plans: Vec<MovePlan>,
    /// `None` in dry-run
    pub execution: Option<ExecutionResult>,
    /// Directories that could not be read during discovery (non-fatal)
    pub scan_errors: Vec<String>,
    pub destinations: Destinations,
    pub summary: PipelineSummary,
}

impl TriageResult {
    /// Number of records that failed analysis
    pub fn analysis_errors(&self) -> usize {
        self.records.iter().filter(|r| !r.is_ok()).count()
    }
}

/// The triage pipeline
pub struct Pipeline {
    config: TriageConfig,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn new(config: TriageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<TriageResult, SnapsortError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<TriageResult, SnapsortError> {
        let result = self.run_inner(events);
        if let Err(e) = &result {
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: e.to_string(),
            }));
        }
        result
    }

    fn run_inner(&self, events: &EventSender) -> Result<TriageResult, SnapsortError> {
        let start_time = Instant::now();
        self.config.validate()?;
        if self.config.faces_unavailable() {
            tracing::warn!(
                "Face detection is off (no face model configured): face-aware blur falls back \
                 to whole-image blur, so partialBlurred and slightlyBlurred are unavailable"
            );
        }

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let input_dir = self.config.input_dir.canonicalize().map_err(|_| {
            ScanError::DirectoryNotFound {
                path: self.config.input_dir.clone(),
            }
        })?;
        let base_output = match &self.config.output_dir {
            Some(dir) => absolutize(dir),
            None => input_dir.clone(),
        };
        let destinations = Destinations::new(&base_output, self.config.folders.clone());

        // Keep a second run from re-processing files the first one moved
        let exclude_dirs: Vec<PathBuf> = destinations
            .all_dirs()
            .into_iter()
            .filter(|dir| absolutize(dir).starts_with(&input_dir))
            .collect();

        let scanner = WalkDirScanner::new(ScanConfig {
            recursive: self.config.recursive,
            extensions: (!self.config.extensions.is_empty())
                .then(|| self.config.extensions.clone()),
            exclude_dirs,
            ..ScanConfig::default()
        });
        let scan_result = scanner.scan_with_events(&input_dir, events)?;
        let scan_errors: Vec<String> = scan_result.errors.iter().map(|e| e.to_string()).collect();
        let photos = scan_result.photos;

        if photos.is_empty() {
            tracing::info!(
                "No images found in {} matching extensions {:?}",
                input_dir.display(),
                self.config.extensions
            );
            let summary = PipelineSummary {
                duration_ms: start_time.elapsed().as_millis() as u64,
                ..Default::default()
            };
            events.send(Event::Pipeline(PipelineEvent::Completed {
                summary: summary.clone(),
            }));
            return Ok(TriageResult {
                records: Vec::new(),
                clustering: Clustering::default(),
                dispositions: Vec::new(),
                plans: Vec::new(),
                execution: None,
                scan_errors,
                destinations,
                summary,
            });
        }

        // Phase 2: Analyzing
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Analyzing,
        }));
        tracing::info!("Scanning {} images...", photos.len());

        let records = self.analyze_all(&photos, events)?;
        let error_count = records.iter().filter(|r| !r.is_ok()).count();
        if error_count > 0 {
            tracing::warn!(
                "Encountered {} errors while reading images; they will be skipped.",
                error_count
            );
        }

        // Phase 3: Classifying
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Classifying,
        }));

        let clustering =
            CanonicalGrouper::new(self.config.duplicate_threshold).cluster(&records);
        let policy = self.config.policy();
        let dispositions: Vec<Option<Disposition>> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                record
                    .features()
                    .map(|features| policy.disposition(features, clustering.is_duplicate(index)))
            })
            .collect();

        let planner = MovePlanner::new(destinations.clone());
        let plans = planner.plan(
            records
                .iter()
                .zip(&dispositions)
                .filter_map(|(record, disposition)| {
                    disposition.map(|d| (record.path.as_path(), d))
                }),
        );

        let planned = |d: Disposition| plans.iter().filter(|p| p.disposition == d).count();
        events.send(Event::Classify(ClassifyEvent::Completed {
            duplicate_groups: clustering.duplicate_group_count(),
            duplicates: planned(Disposition::Duplicate),
            blurred: planned(Disposition::Blurred),
            partially_blurred: planned(Disposition::PartiallyBlurred),
            slightly_blurred: planned(Disposition::SlightlyBlurred),
            planned: plans.len(),
        }));

        // Phase 4: Executing
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Executing,
        }));

        let execution = if self.config.dry_run {
            for plan in &plans {
                tracing::info!(
                    "[DRY-RUN] {:<9}: {} -> {}",
                    plan.reason(),
                    plan.source.display(),
                    plan.destination.display()
                );
            }
            None
        } else {
            Some(self.execute(&plans, &destinations, events)?)
        };

        let count = |d: Disposition| match &execution {
            Some(result) => result.count(d),
            None => planned(d),
        };
        let failed_moves = execution.as_ref().map_or(0, |r| r.failed.len());

        let summary = PipelineSummary {
            scanned: records.len(),
            blurred: count(Disposition::Blurred),
            partially_blurred: count(Disposition::PartiallyBlurred),
            slightly_blurred: count(Disposition::SlightlyBlurred),
            duplicates: count(Disposition::Duplicate),
            duplicate_groups: clustering.duplicate_group_count(),
            errors: error_count + failed_moves,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: summary.clone(),
        }));

        Ok(TriageResult {
            records,
            clustering,
            dispositions,
            plans,
            execution,
            scan_errors,
            destinations,
            summary,
        })
    }

    /// Extract features in parallel and return records in discovery order
    fn analyze_all(
        &self,
        photos: &[PhotoFile],
        events: &EventSender,
    ) -> Result<Vec<AnalysisRecord>, SnapsortError> {
        let total = photos.len();
        let extractor = FeatureExtractor::new(self.config.blur_mode == BlurMode::FaceAware);
        let completed = AtomicUsize::new(0);
        let cutoff = self.config.deadline.map(|budget| Instant::now() + budget);

        let work = || -> HashMap<PathBuf, AnalysisRecord> {
            events.send(Event::Analyze(AnalyzeEvent::Started {
                total_photos: total,
                workers: rayon::current_num_threads(),
            }));

            photos
                .par_iter()
                .map_init(
                    || FaceHandle::new(self.config.faces.clone()),
                    |faces, photo| {
                        let record = match cutoff {
                            Some(cutoff) if Instant::now() >= cutoff => {
                                let error = AnalyzeError::DeadlineExceeded {
                                    path: photo.path.clone(),
                                };
                                AnalysisRecord::failed(&photo.path, error.to_string())
                            }
                            _ => extractor.analyze(&photo.path, faces),
                        };

                        if let Some(message) = record.error() {
                            tracing::warn!("{}", message);
                            events.send(Event::Analyze(AnalyzeEvent::Error {
                                path: photo.path.clone(),
                                message: message.to_string(),
                            }));
                        }

                        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                        events.send(Event::Analyze(AnalyzeEvent::Progress(AnalyzeProgress {
                            completed: done,
                            total,
                            current_path: photo.path.clone(),
                        })));

                        (photo.path.clone(), record)
                    },
                )
                .collect()
        };

        let mut by_path = match self.config.max_workers {
            Some(workers) => rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .build()
                .map_err(|e| SnapsortError::Config(format!("cannot start worker pool: {}", e)))?
                .install(work),
            None => work(),
        };

        // Completion order must not leak into clustering
        let records: Vec<AnalysisRecord> = photos
            .iter()
            .map(|photo| {
                by_path.remove(&photo.path).unwrap_or_else(|| {
                    AnalysisRecord::failed(&photo.path, "analysis produced no result")
                })
            })
            .collect();

        let errors = records.iter().filter(|r| !r.is_ok()).count();
        events.send(Event::Analyze(AnalyzeEvent::Completed {
            analyzed: records.len() - errors,
            errors,
        }));

        Ok(records)
    }

    fn execute(
        &self,
        plans: &[MovePlan],
        destinations: &Destinations,
        events: &EventSender,
    ) -> Result<ExecutionResult, SnapsortError> {
        MoveExecutor::create_folders(&destinations.all_dirs())?;

        let executor = MoveExecutor::new(self.config.operation());
        events.send(Event::Execute(ExecuteEvent::Started {
            total: plans.len(),
            copy: self.config.keep_originals,
            dry_run: false,
        }));

        let result = executor.execute(plans, |done, total, plan, error| {
            if let Some(e) = error {
                events.send(Event::Execute(ExecuteEvent::Failed {
                    source: plan.source.clone(),
                    message: e.to_string(),
                }));
            }
            events.send(Event::Execute(ExecuteEvent::Progress {
                completed: done,
                total,
            }));
        });

        events.send(Event::Execute(ExecuteEvent::Completed {
            succeeded: result.completed.len(),
            failed: result.failed.len(),
        }));

        Ok(result)
    }
}

/// Absolute form of `path`, resolving symlinks as far as the path exists
fn absolutize(path: &Path) -> PathBuf {
    if let Ok(resolved) = path.canonicalize() {
        return resolved;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            absolutize(parent).join(name)
        }
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}
