use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use custody::registry::PairRegistry;
use custody::vault::Vault;
use matching_engine::MatchingEngine;
use rust_decimal::Decimal;
use types::ids::AccountId;
use types::numeric::{Price, Quantity};
use types::order::Side;

const ADMIN: &str = "admin";
const BASE: &str = "BTC";
const QUOTE: &str = "USDT";

struct Exchange {
    vault: Vault,
    registry: PairRegistry,
    engine: MatchingEngine,
}

fn exchange() -> Exchange {
    let mut registry = PairRegistry::new(ADMIN);
    let pair_id = registry
        .create_pair(ADMIN, BASE, QUOTE, 10, AccountId::new())
        .unwrap();
    Exchange {
        vault: Vault::new(),
        registry,
        engine: MatchingEngine::new(pair_id),
    }
}

fn funded_account(ex: &mut Exchange) -> AccountId {
    let account = AccountId::new();
    ex.vault
        .deposit(account, BASE, Decimal::from(1_000_000))
        .unwrap();
    ex.vault
        .deposit(account, QUOTE, Decimal::from(1_000_000_000u64))
        .unwrap();
    account
}

fn submit(ex: &mut Exchange, account: AccountId, side: Side, price: u64, quantity: u64) {
    ex.engine
        .submit_order(
            &mut ex.vault,
            &ex.registry,
            account,
            side,
            Price::from_u64(price),
            Quantity::from_u64(quantity),
            None,
            0,
        )
        .unwrap();
}

fn bench_resting_submission(c: &mut Criterion) {
    let mut group = c.benchmark_group("resting_submission");

    for &num_orders in [100, 1_000, 10_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("non_crossing", num_orders),
            &num_orders,
            |b, &num_orders| {
                b.iter(|| {
                    let mut ex = exchange();
                    let buyer = funded_account(&mut ex);
                    let seller = funded_account(&mut ex);
                    for i in 0..num_orders {
                        if i % 2 == 0 {
                            submit(&mut ex, buyer, Side::Buy, 10_000 - i, 10);
                        } else {
                            submit(&mut ex, seller, Side::Sell, 10_100 + i, 10);
                        }
                    }
                    black_box(ex.engine.best_prices())
                })
            },
        );
    }

    group.finish();
}

fn bench_sweep_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_matching");

    for &depth in [10, 100, 1_000].iter() {
        group.bench_with_input(
            BenchmarkId::new("taker_sweeps_book", depth),
            &depth,
            |b, &depth| {
                b.iter_batched(
                    || {
                        let mut ex = exchange();
                        let maker = funded_account(&mut ex);
                        for i in 0..depth {
                            submit(&mut ex, maker, Side::Sell, 10_000 + i, 10);
                        }
                        let taker = funded_account(&mut ex);
                        (ex, taker, depth)
                    },
                    |(mut ex, taker, depth)| {
                        submit(&mut ex, taker, Side::Buy, 10_000 + depth, 10 * depth);
                        black_box(ex.engine.drain_events())
                    },
                    criterion::BatchSize::SmallInput,
                )
            },
        );
    }

    group.finish();
}

fn bench_cancel(c: &mut Criterion) {
    c.bench_function("cancel_resting_order", |b| {
        b.iter_batched(
            || {
                let mut ex = exchange();
                let maker = funded_account(&mut ex);
                for i in 0..1_000u64 {
                    submit(&mut ex, maker, Side::Sell, 10_000 + i, 10);
                }
                let result = ex
                    .engine
                    .submit_order(
                        &mut ex.vault,
                        &ex.registry,
                        maker,
                        Side::Sell,
                        Price::from_u64(20_000),
                        Quantity::from_u64(10),
                        None,
                        0,
                    )
                    .unwrap();
                (ex, maker, result.order_id)
            },
            |(mut ex, maker, order_id)| black_box(ex.engine.cancel_order(maker, order_id)),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_resting_submission,
    bench_sweep_matching,
    bench_cancel
);
criterion_main!(benches);
