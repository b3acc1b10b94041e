//! Listings of scanned files, planned moves and per-file metrics.
//!
//! Listings group by lowercase extension (with the dot), groups sorted by
//! extension, entries within a group in discovery order.

use super::PrintFormat;
use crate::core::analyzer::{dotted_extension, AnalysisRecord};
use crate::core::classifier::Disposition;
use crate::core::organize::MovePlan;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

fn group_by_extension<'a, T, F>(items: impl IntoIterator<Item = &'a T>, path_of: F) -> BTreeMap<String, Vec<&'a T>>
where
    T: 'a,
    F: Fn(&T) -> &Path,
{
    let mut groups: BTreeMap<String, Vec<&'a T>> = BTreeMap::new();
    for item in items {
        groups.entry(dotted_extension(path_of(item))).or_default().push(item);
    }
    groups
}

/// Quote a CSV field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_path(path: &Path) -> String {
    csv_field(&path.display().to_string())
}

/// Successfully analyzed files
pub fn write_scanned<W: Write>(
    records: &[AnalysisRecord],
    format: PrintFormat,
    mut writer: W,
) -> std::io::Result<()> {
    let groups = group_by_extension(records.iter().filter(|r| r.is_ok()), |r| r.path.as_path());

    match format {
        PrintFormat::Csv => {
            writeln!(writer, "ext,path")?;
            for (ext, records) in &groups {
                for record in records {
                    writeln!(writer, "{},{}", ext, csv_path(&record.path))?;
                }
            }
        }
        PrintFormat::Text => {
            for (ext, records) in &groups {
                writeln!(writer, "Scanned OK [{}]: {}", ext, records.len())?;
                for record in records {
                    writeln!(writer, "  {}", record.path.display())?;
                }
            }
        }
    }
    Ok(())
}

/// Planned moves, before execution
pub fn write_ready<W: Write>(
    plans: &[MovePlan],
    format: PrintFormat,
    mut writer: W,
) -> std::io::Result<()> {
    let groups = group_by_extension(plans, |p| p.source.as_path());

    match format {
        PrintFormat::Csv => {
            writeln!(writer, "ext,reason,src,dest")?;
            for (ext, plans) in &groups {
                for plan in plans {
                    writeln!(
                        writer,
                        "{},{},{},{}",
                        ext,
                        plan.reason(),
                        csv_path(&plan.source),
                        csv_path(&plan.destination)
                    )?;
                }
            }
        }
        PrintFormat::Text => {
            for (ext, plans) in &groups {
                writeln!(writer, "Ready to move [{}]: {}", ext, plans.len())?;
                for plan in plans {
                    writeln!(
                        writer,
                        "  {:<9}: {} -> {}",
                        plan.reason(),
                        plan.source.display(),
                        plan.destination.display()
                    )?;
                }
            }
        }
    }
    Ok(())
}

/// Variance, face count and disposition for every analyzed file, in discovery order
pub fn write_metrics<W: Write>(
    records: &[AnalysisRecord],
    dispositions: &[Option<Disposition>],
    format: PrintFormat,
    mut writer: W,
) -> std::io::Result<()> {
    let rows = records
        .iter()
        .zip(dispositions)
        .filter_map(|(record, disposition)| {
            let features = record.features()?;
            let reason = disposition.filter(|d| !d.is_keep()).map(Disposition::reason);
            Some((record, features, reason))
        });

    match format {
        PrintFormat::Csv => {
            writeln!(writer, "ext,path,blur_var,faces,reason")?;
            for (record, features, reason) in rows {
                writeln!(
                    writer,
                    "{},{},{:.6},{},{}",
                    record.extension(),
                    csv_path(&record.path),
                    features.blur_variance,
                    features.face_variances.len(),
                    reason.unwrap_or("")
                )?;
            }
        }
        PrintFormat::Text => {
            writeln!(writer, "Per-file metrics (variance of Laplacian; faces; reason):")?;
            for (record, features, reason) in rows {
                writeln!(
                    writer,
                    "  {}  var={:.2}  faces={}  reason={}",
                    record.path.display(),
                    features.blur_variance,
                    features.face_variances.len(),
                    reason.unwrap_or("-")
                )?;
            }
        }
    }
    Ok(())
}
