use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gitstatus::git::parser::{parse_branch_line, parse_status_counters};
use gitstatus::segments::{Formats, build_segments};
use gitstatus::StatusRecord;

const BRANCH_LINES: &[&str] = &[
    "## main",
    "## Initial commit on main",
    "## HEAD (no branch)",
    "## main...origin/main",
    "## feature/long-branch-name...origin/feature/long-branch-name [ahead 12, behind 3]",
];

fn generate_status(num_files: usize) -> Vec<String> {
    const CODES: [&str; 6] = ["M ", " M", "MM", "A ", "??", "UU"];
    (0..num_files)
        .map(|i| format!("{} src/file_{}.rs", CODES[i % CODES.len()], i))
        .collect()
}

fn bench_parse_branch(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_branch_line");
    for line in BRANCH_LINES {
        group.bench_with_input(BenchmarkId::from_parameter(line), line, |b, line| {
            b.iter(|| parse_branch_line(black_box(line)))
        });
    }
    group.finish();
}

fn bench_parse_status(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_status_counters");
    for size in [10, 1_000, 100_000] {
        let lines = generate_status(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| parse_status_counters(black_box(lines)))
        });
    }
    group.finish();
}

fn bench_build_segments(c: &mut Criterion) {
    let mut record = StatusRecord::default();
    record.branch = parse_branch_line(BRANCH_LINES[4]);
    record.counters = parse_status_counters(&generate_status(60));
    record.stashed = 2;
    record.tag = "v1.2.3".to_string();
    let formats = Formats::new();

    c.bench_function("build_segments", |b| {
        b.iter(|| build_segments(black_box(&record), &formats, true))
    });
}

criterion_group!(benches, bench_parse_branch, bench_parse_status, bench_build_segments);
criterion_main!(benches);
