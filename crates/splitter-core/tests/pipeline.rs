mod common;

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use splitter_core::storage::{list_files, list_folders};
use splitter_core::{Outcome, PageRange, SplitRequest, SplitterError};
use tempfile::TempDir;

use common::*;

fn range(start: u32, end: u32) -> PageRange {
    PageRange::new(start, end).unwrap()
}

#[test]
fn test_classify_detects_boundaries_in_page_order() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("batch.pdf");
    write_pdf(&pdf, &[ADVICE_A, CONTINUATION, CONTINUATION, ADVICE_B, CONTINUATION]);

    let splitter = splitter();
    let results = splitter.classify_pages(&pdf).unwrap();
    let templates: Vec<Option<&str>> = results.iter().map(|r| r.template.as_deref()).collect();
    assert_eq!(
        templates,
        vec![
            Some("Internal Bank Advice"),
            None,
            None,
            Some("Internal Bank Advice"),
            None
        ]
    );
    assert_eq!(
        results.iter().map(|r| r.page_index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );

    assert_eq!(splitter.classify_and_split(&pdf).unwrap(), vec![1, 4]);
    assert_eq!(
        splitter.detect_ranges(&pdf).unwrap(),
        vec![range(0, 0), range(1, 2), range(3, 4)]
    );
}

#[test]
fn test_auto_split_routes_sub_documents() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("batch.pdf");
    let out = dir.path().join("out");
    write_pdf(&pdf, &[ADVICE_A, CONTINUATION, CONTINUATION, ADVICE_B, CONTINUATION]);

    let report = splitter().auto_split(&pdf, &out).unwrap();

    let ranges: Vec<_> = report.records.iter().map(|r| r.range).collect();
    assert_eq!(ranges, vec![Some(range(0, 0)), Some(range(1, 2)), Some(range(3, 4))]);

    assert_eq!(
        list_files(&report.success_folder).unwrap(),
        vec!["12_345678_2024-03-05.pdf", "34_567890_2024-04-01.pdf"]
    );
    assert_eq!(
        list_files(&report.failure_folder).unwrap(),
        vec!["batch_split_2.pdf"]
    );

    // Every page ends up in exactly one output file.
    assert_eq!(
        read_codes(&report.success_folder.join("34_567890_2024-04-01.pdf")),
        vec![ADVICE_B, CONTINUATION]
    );
    assert_eq!(
        read_codes(&report.failure_folder.join("batch_split_2.pdf")),
        vec![CONTINUATION, CONTINUATION]
    );

    // The source is left alone and no staging files remain.
    assert!(pdf.is_file());
    assert_eq!(list_folders(&report.folder).unwrap(), vec!["failure", "success"]);
}

#[test]
fn test_voucher_without_date_goes_to_failure() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("single.pdf");
    let out = dir.path().join("out");
    write_pdf(&pdf, &[VOUCHER_ONLY]);

    let report = splitter().split_and_rename(&pdf, &[1], &out).unwrap();

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.outcome, Outcome::Failure);
    assert_eq!(record.metadata.voucher_number.as_deref(), Some("55_123456"));
    assert_eq!(record.metadata.date, None);

    assert!(list_files(&report.success_folder).unwrap().is_empty());
    assert_eq!(
        list_files(&report.failure_folder).unwrap(),
        vec!["single_split_1.pdf"]
    );
}

#[test]
fn test_duplicate_names_get_suffix() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("dupes.pdf");
    let out = dir.path().join("out");
    write_pdf(&pdf, &[ADVICE_A, ADVICE_A]);

    let report = splitter().auto_split(&pdf, &out).unwrap();
    assert_eq!(
        list_files(&report.success_folder).unwrap(),
        vec!["12_345678_2024-03-05.pdf", "12_345678_2024-03-05_2.pdf"]
    );
}

#[test]
fn test_out_of_range_split_numbers_are_ignored() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("batch.pdf");
    let out = dir.path().join("out");
    write_pdf(&pdf, &[ADVICE_A, CONTINUATION, ADVICE_B]);

    let report = splitter()
        .split_and_rename(&pdf, &[0, 3, 3, 1, 9], &out)
        .unwrap();
    let ranges: Vec<_> = report.records.iter().filter_map(|r| r.range).collect();
    assert_eq!(ranges, vec![range(0, 0), range(1, 1), range(2, 2)]);
}

#[test]
fn test_ocr_failure_routes_to_failure() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("batch.pdf");
    let out = dir.path().join("out");
    write_pdf(&pdf, &[ADVICE_A, CONTINUATION]);

    let report = splitter_with(Arc::new(BrokenOcr))
        .split_and_rename(&pdf, &[1, 2], &out)
        .unwrap();
    assert_eq!(report.successes().count(), 0);
    assert_eq!(list_files(&report.failure_folder).unwrap().len(), 2);

    // Classification cannot recover from a broken OCR engine.
    assert!(matches!(
        splitter_with(Arc::new(BrokenOcr)).classify_pages(&pdf),
        Err(SplitterError::Ocr(_))
    ));
}

#[test]
fn test_missing_input_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");

    let result = splitter().split_and_rename(&dir.path().join("missing.pdf"), &[1], &out);
    assert!(matches!(result, Err(SplitterError::InputNotFound(_))));
    assert!(!out.exists());
}

#[test]
fn test_unreadable_input_leaves_no_folder() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("broken.pdf");
    let out = dir.path().join("out");
    fs::write(&pdf, b"not a pdf").unwrap();

    assert!(matches!(
        splitter().split_and_rename(&pdf, &[1], &out),
        Err(SplitterError::Pdf(_))
    ));
    assert!(list_folders(&out).unwrap().is_empty());
}

#[test]
fn test_batch_split_and_save() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.pdf");
    let second = dir.path().join("second.pdf");
    let out = dir.path().join("out");
    write_pdf(&first, &[ADVICE_A, CONTINUATION, ADVICE_B]);
    write_pdf(&second, &[VOUCHER_ONLY, CONTINUATION]);

    let report = splitter()
        .split_and_save(
            &[
                SplitRequest::new(&first, vec![1, 3]),
                SplitRequest::new(&second, vec![]),
            ],
            &out,
        )
        .unwrap();

    assert!(report.error().is_none());
    assert_eq!(list_folders(&out).unwrap().len(), 1);
    assert_eq!(
        list_files(&report.folder).unwrap(),
        vec![
            "first_part1.pdf",
            "first_part2.pdf",
            "first_part3.pdf",
            "second_part1.pdf"
        ]
    );
    assert_eq!(report.paths().len(), 4);
    assert_eq!(
        read_codes(&report.folder.join("second_part1.pdf")),
        vec![VOUCHER_ONLY, CONTINUATION]
    );
}

#[test]
fn test_batch_contains_per_input_failures() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.pdf");
    let bad = dir.path().join("bad.pdf");
    let out = dir.path().join("out");
    write_pdf(&good, &[ADVICE_A, ADVICE_B]);
    fs::write(&bad, b"%PDF-1.5 truncated").unwrap();

    let report = splitter()
        .split_and_save(
            &[SplitRequest::new(&bad, vec![1]), SplitRequest::new(&good, vec![1, 2])],
            &out,
        )
        .unwrap();

    assert_eq!(report.outputs.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, bad);
    assert!(matches!(
        report.error(),
        Some(SplitterError::Batch { failed: 1, total: 2, .. })
    ));
    assert_eq!(
        list_files(&report.folder).unwrap(),
        vec!["good_part1.pdf", "good_part2.pdf"]
    );
}

#[test]
fn test_batch_input_validation() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let splitter = splitter();

    assert!(matches!(
        splitter.split_and_save(&[], &out),
        Err(SplitterError::EmptyBatch)
    ));

    let present = dir.path().join("present.pdf");
    write_pdf(&present, &[ADVICE_A]);
    let result = splitter.split_and_save(
        &[
            SplitRequest::new(&present, vec![1]),
            SplitRequest::new(dir.path().join("absent.pdf"), vec![1]),
        ],
        &out,
    );
    assert!(matches!(result, Err(SplitterError::InputNotFound(_))));
    assert!(!out.exists());
}

#[test]
fn test_rename_folder() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("split");
    let out = dir.path().join("renamed");
    fs::create_dir(&source).unwrap();
    write_pdf(&source.join("a.pdf"), &[ADVICE_B, CONTINUATION]);
    write_pdf(&source.join("b.pdf"), &[VOUCHER_ONLY]);
    fs::write(source.join("notes.txt"), b"keep").unwrap();

    let report = splitter().rename_folder(&source, &out).unwrap();

    assert_eq!(report.folder, out.join("split"));
    assert_eq!(
        list_files(&report.success_folder).unwrap(),
        vec!["34_567890_2024-04-01.pdf"]
    );
    assert_eq!(list_files(&report.failure_folder).unwrap(), vec!["b.pdf"]);
    assert!(report.records.iter().all(|r| r.range.is_none()));

    // Only the non-PDF file is left, so the source folder stays.
    assert_eq!(list_files(&source).unwrap(), vec!["notes.txt"]);
}

#[test]
fn test_rename_folder_removes_emptied_source() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("split");
    fs::create_dir(&source).unwrap();
    write_pdf(&source.join("a.pdf"), &[ADVICE_A]);

    let report = splitter()
        .rename_folder(&source, &dir.path().join("renamed"))
        .unwrap();
    assert_eq!(report.successes().count(), 1);
    assert!(!source.exists());
}

#[test]
fn test_rename_folder_name_taken() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("2024-03-05_14-07-09");
    let out = dir.path().join("renamed");
    fs::create_dir(&source).unwrap();
    fs::create_dir_all(out.join("2024-03-05_14-07-09")).unwrap();
    write_pdf(&source.join("a.pdf"), &[ADVICE_A]);

    let report = splitter().rename_folder(&source, &out).unwrap();

    assert_ne!(report.folder, out.join("2024-03-05_14-07-09"));
    assert_eq!(list_folders(&out).unwrap().len(), 2);
    assert_eq!(report.successes().count(), 1);
}

#[test]
fn test_rename_files_leaves_inputs() {
    let dir = TempDir::new().unwrap();
    let inbox = dir.path().join("inbox");
    let other = dir.path().join("other");
    let out = dir.path().join("rename_without_split");
    fs::create_dir(&inbox).unwrap();
    fs::create_dir(&other).unwrap();
    let advice = inbox.join("advice.pdf");
    let unknown = inbox.join("scan.pdf");
    let same_name = other.join("scan.pdf");
    write_pdf(&advice, &[ADVICE_A, CONTINUATION]);
    write_pdf(&unknown, &[VOUCHER_ONLY]);
    write_pdf(&same_name, &[CONTINUATION]);
    let before = fs::read(&advice).unwrap();

    let report = splitter()
        .rename_files(&[advice.clone(), unknown.clone(), same_name.clone()], &out)
        .unwrap();

    assert_eq!(
        list_files(&report.success_folder).unwrap(),
        vec!["12_345678_2024-03-05.pdf"]
    );
    assert_eq!(
        list_files(&report.failure_folder).unwrap(),
        vec!["scan.pdf", "scan_2.pdf"]
    );
    assert!(report.failures.is_empty());
    assert_eq!(report.records[0].source, advice);

    // Inputs are copied, not moved.
    assert_eq!(fs::read(&advice).unwrap(), before);
    assert!(unknown.exists() && same_name.exists());
    assert_eq!(list_files(&inbox).unwrap(), vec!["advice.pdf", "scan.pdf"]);
    // Only the partitions remain in the batch folder.
    assert_eq!(
        list_folders(&report.folder).unwrap(),
        vec!["failure", "success"]
    );
}

#[test]
fn test_rename_files_validates_inputs() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("rename_without_split");

    assert!(matches!(
        splitter().rename_files(&[], &out),
        Err(SplitterError::EmptyBatch)
    ));
    assert!(matches!(
        splitter().rename_files(&[dir.path().join("absent.pdf")], &out),
        Err(SplitterError::InputNotFound(_))
    ));
    assert!(!out.exists());
}

#[test]
fn test_extract_metadata() {
    let dir = TempDir::new().unwrap();
    let pdf = dir.path().join("one.pdf");
    write_pdf(&pdf, &[ADVICE_A]);

    let metadata = splitter().extract_metadata(&pdf).unwrap();
    assert_eq!(
        metadata.file_stem().as_deref(),
        Some("12_345678_2024-03-05")
    );
}
