use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fdr_core::{Finder, PatternKind, SearchRequest, search};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::{fs, hint::black_box, path::Path};
use tempfile::TempDir;

const EXTENSIONS: [&str; 5] = ["rs", "txt", "md", "toml", "json"];

/// Builds a random tree (fixed seed so runs are comparable), returning it and its entry count
fn generate_tree(dirs: usize, max_files_per_dir: usize) -> (TempDir, u64) {
    let tmp = tempfile::tempdir().expect("temp dir");
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut made = vec![tmp.path().to_path_buf()];
    let mut entries = 0_u64;

    for index in 0..dirs {
        // attach under a random existing directory so depth varies
        let parent = made[rng.random_range(0..made.len())].clone();
        let dir = parent.join(format!("d{index}"));
        fs::create_dir(&dir).expect("create dir");
        entries += 1;

        for file in 0..rng.random_range(1..=max_files_per_dir) {
            let ext = EXTENSIONS[rng.random_range(0..EXTENSIONS.len())];
            let len = rng.random_range(0..4096);
            fs::write(dir.join(format!("f{file}.{ext}")), vec![b'x'; len]).expect("write file");
            entries += 1;
        }

        if index % 17 == 0 {
            fs::write(dir.join(".gitignore"), "*.json\n").expect("write rules");
        }
        made.push(dir);
    }

    (tmp, entries)
}

fn request(root: &Path) -> SearchRequest {
    SearchRequest::new(root)
}

fn bench_search(c: &mut Criterion) {
    let (tree, entries) = generate_tree(400, 24);
    let root = tree.path();

    let mut group = c.benchmark_group("search");
    group.throughput(Throughput::Elements(entries));

    group.bench_function("everything", |b| {
        let req = request(root);
        b.iter(|| black_box(search(black_box(&req)).expect("search")));
    });

    group.bench_function("glob_rs", |b| {
        let req = SearchRequest {
            pattern: Some("*.rs".into()),
            pattern_kind: PatternKind::Glob,
            ..request(root)
        };
        b.iter(|| black_box(search(black_box(&req)).expect("search")));
    });

    group.bench_function("regex_full_path", |b| {
        let req = SearchRequest {
            pattern: Some(r"d1\d*/.*\.md$".into()),
            full_path: true,
            ..request(root)
        };
        b.iter(|| black_box(search(black_box(&req)).expect("search")));
    });

    group.bench_function("size_and_type", |b| {
        let req = SearchRequest {
            file_type: Some("f".into()),
            min_size: Some(1024),
            max_size: Some(3072),
            ..request(root)
        };
        b.iter(|| black_box(search(black_box(&req)).expect("search")));
    });

    group.bench_function("no_ignore", |b| {
        let req = SearchRequest {
            no_ignore: true,
            ..request(root)
        };
        b.iter(|| black_box(search(black_box(&req)).expect("search")));
    });

    group.finish();
}

fn bench_threads(c: &mut Criterion) {
    let (tree, entries) = generate_tree(400, 24);
    let root = tree.path();

    let mut group = c.benchmark_group("threads");
    group.throughput(Throughput::Elements(entries));

    for threads in [1_usize, 2, 4, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let finder = Finder::init(root)
                    .thread_count(threads)
                    .build()
                    .expect("valid finder");
                black_box(finder.run().len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_search, bench_threads);
criterion_main!(benches);
