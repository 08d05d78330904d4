//! Benchmark suite for taskboard.
//!
//! This module provides performance benchmarks for:
//! - Task extraction (line recognition and marker parsing)
//! - Board policy (filtering, swimlanes, sorting)
//! - Line reconstruction (writing edits back)
//! - Vault collection (walking and reading notes on disk)
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Save baseline for comparison
//! cargo bench -- --save-baseline main
//!
//! # Compare against baseline
//! cargo bench -- --baseline main
//! ```
//!
//! Criterion writes JSON estimates and HTML reports under `target/criterion/`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::fs;
use tempfile::TempDir;

use taskboard::board::{apply_board_policy, collect_tasks, Swimlane};
use taskboard::config::BoardConfig;
use taskboard::store::{DocumentHandle, VaultStore};
use taskboard::task::{extract_tasks, parse_markers, reconstruct_line, Priority};

/// A note with `tasks` checklist lines mixed with prose.
fn note_with_tasks(tasks: usize) -> String {
    let mut content = String::from("# Notes\n\n");
    for i in 0..tasks {
        let status = [" ", "/", "x", "-", "?"][i % 5];
        let tag = ["work", "personal", "home"][i % 3];
        content.push_str(&format!(
            "- [{}] Task number {} #{} [[Project {}]] 📅 2024-{:02}-{:02} 🔼\n",
            status,
            i,
            tag,
            i % 7,
            i % 12 + 1,
            i % 28 + 1
        ));
        if i % 4 == 0 {
            content.push_str("Some prose between tasks with a #tag that is not a task.\n");
        }
    }
    content
}

fn busy_board() -> BoardConfig {
    let mut board = BoardConfig::new("Bench");
    board.tag_filters = vec!["work".into(), "personal".into()];
    board.swimlanes_enabled = true;
    board.swimlanes = vec![
        Swimlane::new("Work Tasks", &["work"]),
        Swimlane::new("Personal Tasks", &["personal"]),
    ];
    board.sort_by_due_date = true;
    board
}

/// Create a vault with `notes` notes of 20 tasks each, spread over folders.
fn create_vault(notes: usize) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let content = note_with_tasks(20);

    for i in 0..notes {
        let dir = temp_dir.path().join(format!("area{}", i % 5));
        fs::create_dir_all(&dir).expect("Failed to create area dir");
        fs::write(dir.join(format!("Note {}.md", i)), &content).expect("Failed to write note");
    }

    temp_dir
}

// ============================================================================
// Extraction Benchmarks
// ============================================================================

/// Benchmark task extraction from a single document.
fn bench_extract_tasks(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_tasks");
    let handle = DocumentHandle::new("Notes.md");

    for size in [10, 100, 1000] {
        let content = note_with_tasks(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, text| {
            b.iter(|| black_box(extract_tasks(black_box(&handle), black_box(text))));
        });
    }

    group.finish();
}

/// Benchmark marker parsing on typical and marker-heavy task text.
fn bench_parse_markers(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_markers");

    group.bench_function("plain", |b| {
        b.iter(|| black_box(parse_markers(black_box("Buy milk on the way home"))));
    });

    group.bench_function("all_markers", |b| {
        let text = "Call [[Client Notes|client]] #work #q1 🔺 🛫 2024-02-01 ⏰ 2024-02-10 📅 2024-03-01 [[Budget]]";
        b.iter(|| black_box(parse_markers(black_box(text))));
    });

    group.finish();
}

// ============================================================================
// Board Benchmarks
// ============================================================================

/// Benchmark filtering, swimlane assignment and sorting.
fn bench_board_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("board_policy");
    let board = busy_board();
    let handle = DocumentHandle::new("Notes.md");

    for size in [100, 1000, 5000] {
        let tasks = extract_tasks(&handle, &note_with_tasks(size));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &tasks, |b, tasks| {
            b.iter(|| black_box(apply_board_policy(tasks.clone(), black_box(&board))));
        });
    }

    group.finish();
}

/// Benchmark rebuilding a line after an edit.
fn bench_reconstruct_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct_line");
    let line = "  - [ ] Write report #work [[Budget]] 📅 2024-03-01 🔼";
    let handle = DocumentHandle::new("Notes.md");
    let mut task = extract_tasks(&handle, line)
        .pop()
        .expect("bench line is a task");

    group.bench_function("unchanged", |b| {
        b.iter(|| black_box(reconstruct_line(black_box(&task), black_box(line))));
    });

    task.tags.push("q1".into());
    task.priority = Some(Priority::High);
    group.bench_function("edited", |b| {
        b.iter(|| black_box(reconstruct_line(black_box(&task), black_box(line))));
    });

    group.finish();
}

// ============================================================================
// Vault Benchmarks
// ============================================================================

/// Benchmark walking and reading a vault on disk.
fn bench_collect_vault(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect_vault");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");

    for notes in [10, 100] {
        let vault = create_vault(notes);
        let store = VaultStore::new(vault.path());

        group.throughput(Throughput::Elements(notes as u64));
        group.bench_with_input(BenchmarkId::from_parameter(notes), &store, |b, store| {
            b.iter(|| rt.block_on(async { black_box(collect_tasks(store).await) }));
        });
    }

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    parsing_benches,
    bench_extract_tasks,
    bench_parse_markers,
    bench_reconstruct_line
);

criterion_group!(board_benches, bench_board_policy, bench_collect_vault);

criterion_main!(parsing_benches, board_benches);
