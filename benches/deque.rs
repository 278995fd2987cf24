use chunk_deque::ChunkDeque;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::collections::VecDeque;

fn bench_deque(c: &mut Criterion) {
    let n = 4096;
    {
        let mut group = c.benchmark_group("VecDeque vs ChunkDeque (PushBack 4096)");
        group.bench_function("std::collections::VecDeque", |b| {
            b.iter(|| {
                let mut d = VecDeque::new();
                for i in 0..n {
                    d.push_back(black_box(i as i32));
                }
                d
            })
        });

        group.bench_function("ChunkDeque<i32, 64>", |b| {
            b.iter(|| {
                let mut d: ChunkDeque<i32, 64> = ChunkDeque::new();
                for i in 0..n {
                    d.push_back(black_box(i as i32));
                }
                d
            })
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("VecDeque vs ChunkDeque (PushFront 4096)");
        group.bench_function("std::collections::VecDeque", |b| {
            b.iter(|| {
                let mut d = VecDeque::new();
                for i in 0..n {
                    d.push_front(black_box(i as i32));
                }
                d
            })
        });

        group.bench_function("ChunkDeque<i32, 64>", |b| {
            b.iter(|| {
                let mut d: ChunkDeque<i32, 64> = ChunkDeque::new();
                for i in 0..n {
                    d.push_front(black_box(i as i32));
                }
                d
            })
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("VecDeque vs ChunkDeque (Fifo 4096)");
        let mut d_std: VecDeque<i32> = (0..64).collect();
        let mut d_chunk: ChunkDeque<i32, 64> = (0..64).collect();

        group.bench_function("std::collections::VecDeque", |b| {
            b.iter(|| {
                for i in 0..n {
                    d_std.push_back(black_box(i as i32));
                    black_box(d_std.pop_front());
                }
            })
        });

        group.bench_function("ChunkDeque<i32, 64>", |b| {
            b.iter(|| {
                for i in 0..n {
                    d_chunk.push_back(black_box(i as i32));
                    black_box(d_chunk.pop_front());
                }
            })
        });
        group.finish();
    }

    {
        let mut group = c.benchmark_group("VecDeque vs ChunkDeque (Get 4096)");
        let mut d_std = VecDeque::new();
        let mut d_chunk: ChunkDeque<i32, 64> = ChunkDeque::new();
        for i in 0..n {
            d_std.push_front(i as i32);
            d_chunk.push_front(i as i32);
        }

        group.bench_function("std::collections::VecDeque", |b| {
            b.iter(|| {
                for i in 0..n {
                    black_box(d_std.get(black_box(i)));
                }
            })
        });

        group.bench_function("ChunkDeque<i32, 64>", |b| {
            b.iter(|| {
                for i in 0..n {
                    black_box(d_chunk.get(black_box(i)));
                }
            })
        });
        group.finish();
    }
}

criterion_group!(benches, bench_deque);
criterion_main!(benches);
