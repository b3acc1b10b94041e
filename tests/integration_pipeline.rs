//! Integration tests for the pipeline module.
//!
//! These tests run whole triage passes over generated photos:
//! - Duplicate and blur routing
//! - Dry-run leaves the filesystem alone but plans the same moves
//! - Name collisions in the destination folder
//! - Determinism across worker counts
//! - Corrupt files and copy mode

use assert_fs::prelude::*;
use assert_fs::TempDir;
use image::{GrayImage, ImageBuffer, Luma};
use predicates::prelude::*;
use snapsort::core::classifier::{BlurMode, Disposition};
use snapsort::core::organize::{FolderNames, MovePlanner};
use snapsort::core::pipeline::{Pipeline, PipelineBuilder};

fn blob(x: u32, y: u32, size: u32) -> f64 {
    let center = size as f64 * 5.0 / 16.0;
    let sigma = size as f64 * 3.0 / 16.0;
    let (dx, dy) = (x as f64 - center, y as f64 - center);
    (-(dx * dx + dy * dy) / (2.0 * sigma * sigma)).exp()
}

/// Dark blob under a fine checker texture: very sharp
fn sharp() -> GrayImage {
    ImageBuffer::from_fn(128, 128, |x, y| {
        let base = (220.0 - 190.0 * blob(x, y, 128)) as i32;
        let texture = if (x / 4 + y / 4) % 2 == 0 { 30 } else { -30 };
        Luma([(base + texture).clamp(0, 255) as u8])
    })
}

/// Bright smooth blob: almost no Laplacian response, far from `sharp` in hash space
fn soft() -> GrayImage {
    ImageBuffer::from_fn(128, 128, |x, y| Luma([(30.0 + 190.0 * blob(x, y, 128)) as u8]))
}

fn save(dir: &TempDir, name: &str, image: &GrayImage) {
    let child = dir.child(name);
    if let Some(parent) = child.path().parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image.save(child.path()).unwrap();
}

fn triage(dir: &TempDir) -> PipelineBuilder {
    Pipeline::builder()
        .input_dir(dir.path())
        .extensions([".jpg", ".png"])
        .blur_mode(BlurMode::WholeImage)
        .recursive(true)
}

#[test]
fn duplicates_and_blurred_photos_are_moved() {
    let temp = TempDir::new().unwrap();
    save(&temp, "a.jpg", &sharp());
    save(&temp, "b.jpg", &sharp());
    save(&temp, "soft.png", &soft());

    let result = triage(&temp).build().run().unwrap();

    assert_eq!(result.summary.scanned, 3);
    assert_eq!(result.summary.duplicates, 1);
    assert_eq!(result.summary.duplicate_groups, 1);
    assert_eq!(result.summary.blurred, 1);
    assert_eq!(result.summary.errors, 0);

    temp.child("a.jpg").assert(predicate::path::exists());
    temp.child("b.jpg").assert(predicate::path::missing());
    temp.child("duplicate/b.jpg").assert(predicate::path::is_file());
    temp.child("blurred/soft.png").assert(predicate::path::is_file());
    temp.child("slightlyBlurred").assert(predicate::path::is_dir());
}

#[test]
fn dry_run_changes_nothing_and_plans_the_same_moves() {
    let temp = TempDir::new().unwrap();
    save(&temp, "a.jpg", &sharp());
    save(&temp, "b.jpg", &sharp());
    save(&temp, "soft.png", &soft());

    let dry = triage(&temp).dry_run(true).build().run().unwrap();

    temp.child("b.jpg").assert(predicate::path::exists());
    temp.child("soft.png").assert(predicate::path::exists());
    temp.child("duplicate").assert(predicate::path::missing());
    temp.child("blurred").assert(predicate::path::missing());
    assert!(dry.execution.is_none());
    assert_eq!(dry.summary.duplicates, 1);
    assert_eq!(dry.summary.blurred, 1);

    let real = triage(&temp).build().run().unwrap();
    assert_eq!(dry.plans, real.plans);
    assert_eq!(dry.summary.duplicates, real.summary.duplicates);
}

#[test]
fn same_names_from_different_folders_do_not_overwrite() {
    let temp = TempDir::new().unwrap();
    save(&temp, "a.jpg", &sharp());
    save(&temp, "one/img.jpg", &sharp());
    save(&temp, "two/img.jpg", &sharp());

    let preview = triage(&temp).dry_run(true).build().run().unwrap();
    let names: Vec<_> = MovePlanner::preview_destinations(&preview.plans)
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["img.jpg", "img_1.jpg"]);

    let result = triage(&temp).build().run().unwrap();

    assert_eq!(result.summary.duplicates, 2);
    temp.child("duplicate/img.jpg").assert(predicate::path::is_file());
    temp.child("duplicate/img_1.jpg").assert(predicate::path::is_file());
    temp.child("a.jpg").assert(predicate::path::exists());
}

#[test]
fn existing_files_in_destination_are_kept() {
    let temp = TempDir::new().unwrap();
    save(&temp, "soft.png", &soft());
    temp.child("blurred").create_dir_all().unwrap();
    temp.child("blurred/soft.png").write_binary(b"older run").unwrap();

    let result = triage(&temp).build().run().unwrap();

    let moved = &result.execution.as_ref().unwrap().completed[0];
    assert_eq!(moved.destination.file_name().unwrap(), "soft_1.png");
    assert_eq!(std::fs::read(temp.child("blurred/soft.png").path()).unwrap(), b"older run");
    temp.child("blurred/soft_1.png").assert(predicate::path::is_file());
}

#[test]
fn results_do_not_depend_on_worker_count() {
    let temp = TempDir::new().unwrap();
    for i in 0..6 {
        save(&temp, &format!("sharp_{}.jpg", i), &sharp());
        save(&temp, &format!("soft_{}.png", i), &soft());
    }

    let single = triage(&temp).dry_run(true).max_workers(1).build().run().unwrap();
    let many = triage(&temp).dry_run(true).max_workers(8).build().run().unwrap();

    assert_eq!(single.records, many.records);
    assert_eq!(single.dispositions, many.dispositions);
    assert_eq!(single.plans, many.plans);
    assert_eq!(single.summary.duplicate_groups, many.summary.duplicate_groups);
}

#[test]
fn every_analyzed_photo_gets_exactly_one_disposition() {
    let temp = TempDir::new().unwrap();
    save(&temp, "a.jpg", &sharp());
    save(&temp, "b.jpg", &sharp());
    save(&temp, "soft.png", &soft());
    temp.child("broken.jpg").write_binary(b"not a jpeg").unwrap();

    let result = triage(&temp).dry_run(true).build().run().unwrap();

    for (record, disposition) in result.records.iter().zip(&result.dispositions) {
        assert_eq!(record.is_ok(), disposition.is_some(), "{}", record.path.display());
    }
    assert_eq!(result.summary.errors, 1);
    assert_eq!(result.summary.scanned, 4);
}

#[test]
fn corrupt_file_stays_in_place() {
    let temp = TempDir::new().unwrap();
    temp.child("corrupt.jpg")
        .write_binary(b"this is not a valid image file")
        .unwrap();

    let result = triage(&temp).build().run().unwrap();

    assert_eq!(result.summary.errors, 1);
    assert!(result.plans.is_empty());
    temp.child("corrupt.jpg").assert(predicate::path::exists());
}

#[test]
fn keep_originals_copies_into_separate_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    save(&input, "a.jpg", &sharp());
    save(&input, "b.jpg", &sharp());

    let result = triage(&input)
        .output_dir(output.path())
        .keep_originals(true)
        .build()
        .run()
        .unwrap();

    assert_eq!(result.summary.duplicates, 1);
    input.child("b.jpg").assert(predicate::path::exists());
    input.child("duplicate").assert(predicate::path::missing());
    output.child("duplicate/b.jpg").assert(predicate::path::is_file());
}

#[test]
fn blurred_duplicate_follows_precedence_flag() {
    let temp = TempDir::new().unwrap();
    save(&temp, "a.png", &soft());
    save(&temp, "b.png", &soft());

    let prefer_duplicate = triage(&temp).dry_run(true).build().run().unwrap();
    assert_eq!(
        prefer_duplicate.dispositions,
        vec![Some(Disposition::Blurred), Some(Disposition::Duplicate)]
    );

    let prefer_blur = triage(&temp)
        .dry_run(true)
        .prefer_duplicate_over_blur(false)
        .build()
        .run()
        .unwrap();
    assert_eq!(
        prefer_blur.dispositions,
        vec![Some(Disposition::Blurred), Some(Disposition::Blurred)]
    );
    assert_eq!(prefer_blur.summary.duplicate_groups, 1);
}

#[test]
fn custom_folder_names_are_used_and_skipped_on_rescan() {
    let temp = TempDir::new().unwrap();
    save(&temp, "soft.png", &soft());
    let folders = FolderNames {
        blurred: "out_of_focus".to_string(),
        ..FolderNames::default()
    };

    triage(&temp).folders(folders.clone()).build().run().unwrap();
    temp.child("out_of_focus/soft.png").assert(predicate::path::is_file());

    let rerun = triage(&temp).folders(folders).build().run().unwrap();
    assert_eq!(rerun.summary.scanned, 0);
}

#[test]
fn non_recursive_run_ignores_subfolders() {
    let temp = TempDir::new().unwrap();
    save(&temp, "top.jpg", &sharp());
    save(&temp, "nested/deep.jpg", &sharp());

    let result = triage(&temp).recursive(false).dry_run(true).build().run().unwrap();

    assert_eq!(result.summary.scanned, 1);
    assert_eq!(result.summary.duplicates, 0);
}
