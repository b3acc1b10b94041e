//! Executor for move plans.

use super::planner::unique_destination;
use super::types::*;
use crate::error::ExecuteError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Carries out move plans one file at a time
#[derive(Debug, Clone, Copy)]
pub struct MoveExecutor {
    mode: OperationMode,
}

impl MoveExecutor {
    pub fn new(mode: OperationMode) -> Self {
        Self { mode }
    }

    /// Create every destination directory up front
    pub fn create_folders(dirs: &[PathBuf]) -> Result<(), ExecuteError> {
        for dir in dirs {
            fs::create_dir_all(dir).map_err(|source| ExecuteError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Execute plans in order. A failing entry is recorded and the rest continue.
    pub fn execute<F>(&self, plans: &[MovePlan], mut on_progress: F) -> ExecutionResult
    where
        F: FnMut(usize, usize, &MovePlan, Option<&ExecuteError>),
    {
        let start = Instant::now();
        let mut result = ExecutionResult::default();

        for (i, plan) in plans.iter().enumerate() {
            match self.execute_one(plan) {
                Ok(destination) => {
                    tracing::debug!(
                        "{} -> {}",
                        plan.source.display(),
                        destination.display()
                    );
                    on_progress(i + 1, plans.len(), plan, None);
                    result.completed.push(CompletedMove {
                        source: plan.source.clone(),
                        destination,
                        disposition: plan.disposition,
                    });
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    on_progress(i + 1, plans.len(), plan, Some(&e));
                    result.failed.push(FailedMove {
                        source: plan.source.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        result.duration_ms = start.elapsed().as_millis() as u64;
        result
    }

    /// Move or copy one file, renaming to `stem_N.ext` if the destination is taken
    pub fn execute_one(&self, plan: &MovePlan) -> Result<PathBuf, ExecuteError> {
        let source = plan.source.as_path();
        if !source.exists() {
            return Err(ExecuteError::SourceMissing {
                path: source.to_path_buf(),
            });
        }

        let dir = plan.destination_dir();
        fs::create_dir_all(dir).map_err(|e| ExecuteError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        // Probed against the live filesystem, not the plan
        let destination = unique_destination(&plan.destination, |p| p.exists());

        let outcome = match self.mode {
            OperationMode::Copy => fs::copy(source, &destination).map(|_| ()),
            OperationMode::Move => move_file(source, &destination),
        };

        outcome
            .map(|()| destination.clone())
            .map_err(|e| ExecuteError::Transfer {
                verb: self.mode.verb(),
                from: source.to_path_buf(),
                to: destination,
                source: e,
            })
    }
}

/// Rename, or copy + verify + delete when rename fails (e.g. across filesystems)
fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    fs::rename(source, destination).or_else(|_| {
        let source_size = fs::metadata(source)?.len();
        fs::copy(source, destination)?;

        let dest_size = fs::metadata(destination)?.len();
        if dest_size != source_size {
            let _ = fs::remove_file(destination);
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "Copy verification failed: source {} bytes, dest {} bytes",
                    source_size, dest_size
                ),
            ));
        }

        fs::remove_file(source)
    })
}
