use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{apply_medium_runtime_config, apply_small_runtime_config, default_rng};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use symbol_table::{LlrbTreeMap, OrderedSymbolTable, StdBTreeMap};

const SIZES: [usize; 4] = [1_000, 8_000, 64_000, 256_000];
const OPS_PER_ITER: usize = 200;
const RANGE_WIDTH: u64 = 1 << 12;

#[derive(Clone, Copy)]
enum OrderOp {
    Floor { key: u64 },
    Ceiling { key: u64 },
    Rank { key: u64 },
    Select { index: usize },
    CountRange { lo: u64 },
}

#[derive(Clone, Copy)]
enum UpdateOp {
    Put { key: u64, value: u64 },
    Delete { key: u64 },
    CycleMin,
}

fn build<M>(size: usize, rng: &mut StdRng) -> (M, Vec<u64>)
where
    M: OrderedSymbolTable<Key = u64, Value = u64>,
{
    let mut map = M::new();
    let mut keys = Vec::with_capacity(size);
    while keys.len() < size {
        let key: u64 = rng.random();
        if map.put(key, key).is_none() {
            keys.push(key);
        }
    }
    (map, keys)
}

fn apply_runtime_config<T: Measurement>(group: &mut BenchmarkGroup<'_, T>, size: usize) {
    if size >= 64_000 {
        apply_medium_runtime_config(group);
    } else {
        apply_small_runtime_config(group);
    }
}

pub fn bench_get<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: OrderedSymbolTable<Key = u64, Value = u64>,
{
    for &size in &SIZES {
        apply_runtime_config(group, size);
        let mut rng = default_rng();
        let (map, keys) = build::<M>(size, &mut rng);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let queries: Vec<u64> = (0..OPS_PER_ITER)
                        .map(|_| keys[rng.random_range(0..keys.len())])
                        .collect();
                    let start = Instant::now();
                    for key in &queries {
                        black_box(map.get(key));
                    }
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_order<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: OrderedSymbolTable<Key = u64, Value = u64>,
{
    for &size in &SIZES {
        apply_runtime_config(group, size);
        let mut rng = default_rng();
        let (map, _) = build::<M>(size, &mut rng);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let ops = generate_order_ops(size, &mut rng);
                    let start = Instant::now();
                    run_order_ops(&map, &ops);
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_update<M, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    M: OrderedSymbolTable<Key = u64, Value = u64>,
{
    for &size in &SIZES {
        apply_runtime_config(group, size);
        let mut rng = default_rng();
        let (mut map, _) = build::<M>(size, &mut rng);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for _ in 0..iters {
                    let ops = generate_update_ops(&mut rng);
                    let start = Instant::now();
                    run_update_ops(&mut map, &ops);
                    black_box(map.len());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

fn generate_order_ops(size: usize, rng: &mut StdRng) -> Vec<OrderOp> {
    (0..OPS_PER_ITER)
        .map(|_| match rng.random_range(0..5) {
            0 => OrderOp::Floor { key: rng.random() },
            1 => OrderOp::Ceiling { key: rng.random() },
            2 => OrderOp::Rank { key: rng.random() },
            3 => OrderOp::Select {
                index: rng.random_range(0..size),
            },
            _ => OrderOp::CountRange {
                lo: rng.random_range(0..u64::MAX - RANGE_WIDTH),
            },
        })
        .collect()
}

// Puts are matched by deletes and the min is put back after removal, so the size is
// the same at the end of every iteration.
fn generate_update_ops(rng: &mut StdRng) -> Vec<UpdateOp> {
    let mut ops = Vec::with_capacity(OPS_PER_ITER);
    let mut live = Vec::with_capacity(OPS_PER_ITER / 2);
    for _ in 0..OPS_PER_ITER / 2 {
        let key: u64 = rng.random();
        live.push(key);
        ops.push(UpdateOp::Put { key, value: key });
    }
    live.shuffle(rng);
    for key in live {
        if key & 0xF == 0 {
            ops.push(UpdateOp::CycleMin);
        }
        ops.push(UpdateOp::Delete { key });
    }
    ops
}

fn run_order_ops<M>(map: &M, ops: &[OrderOp])
where
    M: OrderedSymbolTable<Key = u64, Value = u64>,
{
    for op in ops {
        match *op {
            OrderOp::Floor { key } => {
                black_box(map.floor(&key));
            }
            OrderOp::Ceiling { key } => {
                black_box(map.ceiling(&key));
            }
            OrderOp::Rank { key } => {
                black_box(map.rank(&key));
            }
            OrderOp::Select { index } => {
                black_box(map.select(index).ok());
            }
            OrderOp::CountRange { lo } => {
                black_box(map.count_range(&lo, &(lo + RANGE_WIDTH)));
            }
        }
    }
}

fn run_update_ops<M>(map: &mut M, ops: &[UpdateOp])
where
    M: OrderedSymbolTable<Key = u64, Value = u64>,
{
    for op in ops {
        match *op {
            UpdateOp::Put { key, value } => {
                black_box(map.put(key, value));
            }
            UpdateOp::Delete { key } => {
                black_box(map.delete(&key));
            }
            UpdateOp::CycleMin => {
                if let Ok((key, value)) = map.delete_min() {
                    black_box(map.put(key, value));
                }
            }
        }
    }
}

pub fn bench_all_get<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_get::<StdBTreeMap<u64, u64>, _>(group, "std_btree");
    bench_get::<LlrbTreeMap<u64, u64>, _>(group, "llrb");
}

pub fn bench_all_order<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    // StdBTreeMap answers rank/select by walking the map, so only the LLRB runs here.
    bench_order::<LlrbTreeMap<u64, u64>, _>(group, "llrb");
}

pub fn bench_all_update<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_update::<StdBTreeMap<u64, u64>, _>(group, "std_btree");
    bench_update::<LlrbTreeMap<u64, u64>, _>(group, "llrb");
}
