// Copyright (c) 2020 kprotty
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// 	http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lockwrap::{
    sys::{ParkingLotMutex, ParkingLotRwLock, SpinLock, SpinRwLock},
    Lockable, LockedValue, RwLock, RwLockable, RwLockedValue, UnfairLock,
};
use std::{
    sync::{Arc, Barrier},
    thread,
};

const OPS_PER_THREAD: usize = 1_000;
const THREADS: [usize; 3] = [1, 4, 8];

fn run_threads(threads: usize, op: impl Fn() + Send + Sync + 'static) {
    let op = Arc::new(op);
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let op = op.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..OPS_PER_THREAD {
                    op();
                }
            })
        })
        .collect();
    handles.into_iter().for_each(|h| h.join().unwrap());
}

fn bench_mutex<L>(c: &mut Criterion)
where
    L: Lockable + Default + Send + Sync + 'static,
{
    let mut group = c.benchmark_group(format!("locked_value/{}", L::name()));
    for &threads in THREADS.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let value = Arc::new(LockedValue::from_parts(0u64, L::default()));
                run_threads(threads, move || value.with_lock(|n| *n = black_box(*n + 1)));
            })
        });
    }
    group.finish();
}

// One write for every 16 reads.
fn bench_rwlock<L>(c: &mut Criterion)
where
    L: RwLockable + Default + Send + Sync + 'static,
{
    let mut group = c.benchmark_group(format!("rw_locked_value/{}", L::name()));
    for &threads in THREADS.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let value = Arc::new(RwLockedValue::from_parts([0u64; 8], L::default()));
                let tick = Arc::new(std::sync::atomic::AtomicUsize::new(0));
                run_threads(threads, move || {
                    let n = tick.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    if n % 16 == 0 {
                        value.with_write_lock(|v| v[n % 8] += 1);
                    } else {
                        black_box(value.with_read_lock(|v| v.iter().sum::<u64>()));
                    }
                });
            })
        });
    }
    group.finish();
}

fn mutexes(c: &mut Criterion) {
    bench_mutex::<UnfairLock>(c);
    bench_mutex::<SpinLock>(c);
    bench_mutex::<ParkingLotMutex>(c);
}

fn rwlocks(c: &mut Criterion) {
    bench_rwlock::<RwLock>(c);
    bench_rwlock::<SpinRwLock>(c);
    bench_rwlock::<ParkingLotRwLock>(c);
}

criterion_group!(benches, mutexes, rwlocks);
criterion_main!(benches);
