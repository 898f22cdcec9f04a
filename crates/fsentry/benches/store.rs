use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fsentry::FsEntry;
use serde_json::json;

fn bench_entries(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FsEntry::new(dir.path());
    store.init().expect("init");
    store.create_folder(&[], "bench", &json!(null)).expect("folder");

    let mut n: u64 = 0;
    c.bench_function("create_entry", |b| {
        b.iter(|| {
            n += 1;
            store
                .create_entry(&["bench"], &format!("entry {n}"), &json!({"n": n}))
                .expect("create");
        })
    });

    store
        .create_entry(&[], "hot", &json!({"text": "x".repeat(256)}))
        .expect("create");

    c.bench_function("get_entry", |b| {
        b.iter(|| black_box(store.get_entry(&[], "hot").expect("get")))
    });

    c.bench_function("update_entry", |b| {
        b.iter(|| {
            store
                .update_entry(&[], "hot", black_box(&json!({"text": "y"})))
                .expect("update")
        })
    });

    c.bench_function("list entries", |b| {
        b.iter(|| black_box(store.list(&["bench"]).expect("list")))
    });
}

fn bench_folders(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FsEntry::new(dir.path());
    store.init().expect("init");

    let mut n: u64 = 0;
    c.bench_function("create_folder", |b| {
        b.iter(|| {
            n += 1;
            store
                .create_folder(&[], &format!("folder {n}"), &json!(null))
                .expect("create");
        })
    });

    store.create_folder(&[], "hot", &json!({"k": 1})).expect("create");
    c.bench_function("get_folder", |b| {
        b.iter(|| black_box(store.get_folder(&[], "hot").expect("get")))
    });
}

criterion_group!(benches, bench_entries, bench_folders);
criterion_main!(benches);
