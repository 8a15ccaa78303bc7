use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use rand::RngCore;
use tokio::runtime::Runtime;

use pase::{passcode, spake2p::compute_w0_w1, DefaultProvider, PbkdfParameters};
use pase_tools::{
    cost::{
        argon2id_params, empty_table, fill_table, Kdf, OUTPUT_LENGTH, PBKDF2_ITERATION_COUNTS,
    },
    table::{build_table, find_passcode_by_w0},
};

/// Passcodes per table in the fill benchmarks. Multiply the per-table time
/// by the number of valid passcodes over this to estimate a full table.
const FILL_ROWS: u32 = 64;

/// Rows in the table searched by the lookup benchmarks.
const LOOKUP_ROWS: u32 = 20_000;

fn random_salt() -> [u8; 32] {
    let mut salt = [0_u8; 32];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

fn kdfs() -> Vec<Kdf> {
    let mut kdfs: Vec<Kdf> = PBKDF2_ITERATION_COUNTS
        .iter()
        .map(|&iterations| Kdf::Pbkdf2 { iterations })
        .collect();
    kdfs.push(Kdf::Argon2id(argon2id_params().unwrap()));
    kdfs
}

fn empty_table_bench(c: &mut Criterion) {
    c.bench_function("empty_table", |b| {
        b.iter(|| empty_table((passcode::MIN..=FILL_ROWS).filter(|p| passcode::is_valid(*p))))
    });
}

/// One derivation for a random passcode and salt.
fn single_passcode_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("passcode");
    group.sample_size(10);
    for kdf in kdfs() {
        group.bench_function(kdf.to_string(), |b| {
            b.iter_batched(
                || {
                    let passcode = passcode::random(&mut rand::thread_rng());
                    ([0_u8; OUTPUT_LENGTH], passcode, random_salt())
                },
                |(mut out, passcode, salt)| kdf.hash(passcode, &salt, &mut out).unwrap(),
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

fn table_fill_bench(c: &mut Criterion) {
    let salt = random_salt();
    let empty = empty_table((passcode::MIN..=FILL_ROWS).filter(|p| passcode::is_valid(*p)));

    let mut group = c.benchmark_group("table_fill");
    group.sample_size(10);
    group.throughput(Throughput::Elements(empty.len() as u64));
    for kdf in kdfs() {
        group.bench_function(kdf.to_string(), |b| {
            b.iter_batched(
                || empty.clone(),
                |mut table| fill_table(&mut table, &salt, &kdf).unwrap(),
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

/// Linear `w0` scan of an in-memory table, for a row near the start, one in
/// the middle, and one that is absent.
fn lookup_bench(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let provider = DefaultProvider::shared();
    let params = PbkdfParameters::new(1, b"asalt".to_vec()).unwrap();

    let mut table = Vec::new();
    rt.block_on(build_table(&provider, &params, 1..=LOOKUP_ROWS, 16, &mut table))
        .unwrap();

    let targets = [
        ("first", 1),
        ("middle", LOOKUP_ROWS / 2),
        ("absent", LOOKUP_ROWS + 1),
    ];

    let mut group = c.benchmark_group("lookup");
    for (name, target) in targets {
        let (w0, _) = rt.block_on(compute_w0_w1(&provider, &params, target)).unwrap();
        group.bench_function(name, |b| {
            b.to_async(&rt)
                .iter(|| async { find_passcode_by_w0(&table[..], &w0).await.unwrap() })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    empty_table_bench,
    single_passcode_bench,
    table_fill_bench,
    lookup_bench
);
criterion_main!(benches);
