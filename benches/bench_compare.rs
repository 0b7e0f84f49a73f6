use std::{collections::BTreeMap, hint::black_box, time::Duration};

use criterion::{Criterion, criterion_group, criterion_main};

use record_diff::{
    compare,
    config::{Config, LogConfig, init_config},
    record,
};

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Inventory {
        pub owner: String,
        pub location: String,
        pub count: i64,
        pub weight: f64,
        pub sealed: bool,
        pub items: Vec<String>,
        pub prices: BTreeMap<String, f64>,
        pub note: Option<String>,
        audit: String,
    }
}

fn create_inventory(size: usize, salt: &str) -> Inventory {
    Inventory {
        owner: format!("owner-{}", salt),
        location: "warehouse".to_string(),
        count: size as i64,
        weight: size as f64 * 1.5,
        sealed: salt.len() % 2 == 0,
        items: (0..size).map(|i| format!("item-{}-{}", i, salt)).collect(),
        prices: (0..size).map(|i| (format!("item-{}", i), i as f64)).collect(),
        note: Some(salt.to_string()),
        audit: String::new(),
    }
}

fn criterion_benchmark(c: &mut Criterion) {
    init_config(Config {
        log_config: LogConfig::NoLog,
        threads: 16,
    });
    let old = create_inventory(1_000, "a");
    let new = create_inventory(1_000, "bb");

    c.bench_function("compare", |b| {
        b.iter(|| {
            black_box(compare(black_box(&old), black_box(&new)).unwrap());
        })
    });
    c.bench_function("compare_identical", |b| {
        b.iter(|| {
            black_box(compare(black_box(&old), black_box(&old)).unwrap());
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(10))
        .sample_size(50)
        .warm_up_time(Duration::from_secs(3))
        .noise_threshold(0.1);
    targets = criterion_benchmark
}
criterion_main!(benches);
