use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use hdl_assistant::model::types::DocumentRecord;
use hdl_assistant::search::normalize::Normalizer;
use hdl_assistant::search::{EngineConfig, SearchEngine};

fn synthetic_index(size: usize) -> Vec<DocumentRecord> {
    let brands = ["HDL", "Buspro", "Matech", "URRI", "Yeelight"];
    let kinds = ["панель", "датчик", "реле", "контроллер", "шлюз"];
    let normalizer = Normalizer::default();
    (0..size)
        .map(|i| {
            let brand = brands[i % brands.len()];
            let kind = kinds[(i / brands.len()) % kinds.len()];
            let name = format!("{brand} {kind} MDL{i:04}-BP.pdf");
            DocumentRecord {
                norm_name: normalizer.normalize(name.trim_end_matches(".pdf")),
                path: format!("/02. {brand}/{name}"),
                name,
            }
        })
        .collect()
}

/// Hybrid search over a 1000-document index, the realistic upper bound for
/// the documentation tree.
fn bench_hybrid_search_1000_docs(c: &mut Criterion) {
    let engine = SearchEngine::from_records(synthetic_index(1000), EngineConfig::default());

    c.bench_function("hybrid_search_1000_docs", |b| {
        b.iter(|| black_box(engine.hybrid_search("hdl контроллер dali", 3)))
    });
}

/// The KNX cable special case scans the whole index with marker checks.
fn bench_knx_special_case(c: &mut Criterion) {
    let mut records = synthetic_index(1000);
    records.push(DocumentRecord {
        name: "YE00820 KNX кабель J-Y(ST)Y, 2x2x0,8.pdf".into(),
        path: "/01. iOT Systems/02. iOT Кабель/YE00820 ru.pdf".into(),
        norm_name: "ye00820 knx cable".into(),
    });
    let engine = SearchEngine::from_records(records, EngineConfig::default());

    c.bench_function("knx_cable_special_case", |b| {
        b.iter(|| black_box(engine.hybrid_search("кабель knx", 3)))
    });
}

/// Normalization is memoized; both the cold and the cached path matter.
fn bench_normalize(c: &mut Criterion) {
    let normalizer = Normalizer::default();
    c.bench_function("normalize_cached", |b| {
        b.iter(|| black_box(normalizer.normalize("как подключить алису к knx")))
    });
}

criterion_group!(
    benches,
    bench_hybrid_search_1000_docs,
    bench_knx_special_case,
    bench_normalize
);
criterion_main!(benches);
