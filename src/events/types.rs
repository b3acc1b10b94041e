//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the triage pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Discovery phase events
    Scan(ScanEvent),
    /// Feature extraction phase events
    Analyze(AnalyzeEvent),
    /// Clustering and classification events
    Classify(ClassifyEvent),
    /// Move/copy phase events
    Execute(ExecuteEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Discovery has started
    Started { root: PathBuf },
    /// An entry could not be read but discovery continues
    Error { path: PathBuf, message: String },
    /// Discovery completed
    Completed { total_photos: usize },
}

/// Events during feature extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AnalyzeEvent {
    /// Extraction has started
    Started { total_photos: usize, workers: usize },
    /// One image finished (successfully or not)
    Progress(AnalyzeProgress),
    /// An image could not be analyzed; it will be skipped
    Error { path: PathBuf, message: String },
    /// Extraction completed
    Completed { analyzed: usize, errors: usize },
}

/// Progress information during extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeProgress {
    /// Number of images finished so far (in completion order)
    pub completed: usize,
    /// Total number of images to analyze
    pub total: usize,
    /// Image that just finished
    pub current_path: PathBuf,
}

/// Events emitted once clustering and classification are done
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifyEvent {
    Completed {
        duplicate_groups: usize,
        duplicates: usize,
        blurred: usize,
        partially_blurred: usize,
        slightly_blurred: usize,
        planned: usize,
    },
}

/// Events during move/copy execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ExecuteEvent {
    /// Execution started
    Started { total: usize, copy: bool, dry_run: bool },
    /// A plan entry finished
    Progress { completed: usize, total: usize },
    /// A plan entry failed; the remaining entries still run
    Failed { source: PathBuf, message: String },
    /// Execution completed
    Completed { succeeded: usize, failed: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Analyzing,
    Classifying,
    Executing,
}

/// Summary of a triage run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Total photos discovered
    pub scanned: usize,
    /// Photos routed to the blurred folder
    pub blurred: usize,
    /// Photos routed to the partially blurred folder
    pub partially_blurred: usize,
    /// Photos routed to the slightly blurred folder
    pub slightly_blurred: usize,
    /// Photos routed to the duplicate folder
    pub duplicates: usize,
    /// Clusters with more than one member
    pub duplicate_groups: usize,
    /// Extraction errors plus failed moves
    pub errors: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Analyzing => write!(f, "Analyzing"),
            PipelinePhase::Classifying => write!(f, "Classifying"),
            PipelinePhase::Executing => write!(f, "Executing"),
        }
    }
}
