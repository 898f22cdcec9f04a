use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fsentry_fs::{Filesystem, LocalFilesystem};

fn bench_files(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let fs = LocalFilesystem::new();
    let payload = vec![0xA5u8; 4096];

    let mut n: u64 = 0;
    c.bench_function("create_file 4KiB", |b| {
        b.iter(|| {
            n += 1;
            let path = dir.path().join(format!("create-{n}.bin"));
            fs.create_file(&path, black_box(&payload)).expect("create");
        })
    });

    let path = dir.path().join("target.bin");
    fs.create_file(&path, &payload).expect("create");

    c.bench_function("read_file 4KiB", |b| {
        b.iter(|| black_box(fs.read_file(&path).expect("read")))
    });

    c.bench_function("update_file 4KiB", |b| {
        b.iter(|| fs.update_file(&path, black_box(&payload)).expect("update"))
    });

    c.bench_function("file_exists", |b| {
        b.iter(|| black_box(fs.file_exists(&path).expect("stat")))
    });
}

fn bench_dirs(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("tempdir");
    let fs = LocalFilesystem::new();
    let src = dir.path().join("src");
    fs.create_dir(&src).expect("mkdir");
    for i in 0..16 {
        fs.create_file(&src.join(format!("{i}.json")), b"{}").expect("create");
    }

    let mut n: u64 = 0;
    c.bench_function("copy_dir_all 16 files", |b| {
        b.iter(|| {
            n += 1;
            let dst = dir.path().join(format!("copy-{n}"));
            fs.copy_dir_all(&src, &dst).expect("copy");
        })
    });

    c.bench_function("list_dir 16 files", |b| {
        b.iter(|| black_box(fs.list_dir(&src).expect("list")))
    });
}

criterion_group!(benches, bench_files, bench_dirs);
criterion_main!(benches);
