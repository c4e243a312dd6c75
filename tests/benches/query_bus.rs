//! # Query Bus Benchmarks
//!
//! | Case | What it measures |
//! |------|------------------|
//! | `ask_round_trip` | one request, one response, registry in and out |
//! | `ask_fan_out/N` | N concurrent asks on one lane |
//! | `ask_fallback` | a failing handler answered with the degraded fallback |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use futures::future::join_all;
use shared_bus::query::{
    ExcludedUserIdsRequest, ExcludedUserIdsResponse, IsFriendRequest, IsFriendResponse,
};
use shared_bus::{handler_fn, HandlerError, QueryBus};
use shared_types::UserId;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .expect("tokio runtime")
}

/// Bus with an `IsFriend` responder. Dropping the handle detaches the
/// responder; it keeps running for the life of the runtime.
fn is_friend_bus(rt: &Runtime) -> Arc<QueryBus> {
    rt.block_on(async {
        let bus = Arc::new(QueryBus::default());
        bus.start();
        let _responder = bus.serve(handler_fn(|q: IsFriendRequest| async move {
            Ok::<_, HandlerError>(IsFriendResponse {
                are_friends: q.user_a < q.user_b,
            })
        }));
        bus
    })
}

fn query() -> IsFriendRequest {
    IsFriendRequest {
        user_a: UserId::new(),
        user_b: UserId::new(),
    }
}

fn bench_round_trip(c: &mut Criterion) {
    let rt = runtime();
    let bus = is_friend_bus(&rt);
    let bus = bus.as_ref();

    c.bench_function("ask_round_trip", |b| {
        b.to_async(&rt)
            .iter(move || async move { black_box(bus.ask(query()).await) })
    });
}

fn bench_fan_out(c: &mut Criterion) {
    let rt = runtime();
    let bus = is_friend_bus(&rt);
    let bus = bus.as_ref();
    let mut group = c.benchmark_group("ask_fan_out");

    for size in [10usize, 50, 200] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.to_async(&rt).iter(move || async move {
                let answers = join_all((0..size).map(|_| bus.ask(query()))).await;
                black_box(answers.len())
            })
        });
    }

    group.finish();
}

fn bench_fallback(c: &mut Criterion) {
    let rt = runtime();
    let bus = rt.block_on(async {
        let bus = Arc::new(QueryBus::default());
        bus.start();
        let _responder = bus.serve(handler_fn(|_q: ExcludedUserIdsRequest| async {
            Err::<ExcludedUserIdsResponse, _>(HandlerError::internal("unavailable"))
        }));
        bus
    });
    let bus = bus.as_ref();

    c.bench_function("ask_fallback", |b| {
        b.to_async(&rt).iter(move || async move {
            black_box(
                bus.ask(ExcludedUserIdsRequest {
                    user_id: UserId::new(),
                })
                .await,
            )
        })
    });
}

criterion_group!(benches, bench_round_trip, bench_fan_out, bench_fallback);
criterion_main!(benches);
