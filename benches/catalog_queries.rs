//! Catalog query benchmarks
//!
//! Hot paths of the species listing:
//! - Document decoding with integrity checks
//! - Free-text search over name / scientific name / countries
//! - Filter parameter resolution and continent ordering
//!
//! Run with: cargo bench --bench catalog_queries

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serpent_aware::query_engine::{apply_text_search, sort_continent_counts};
use serpent_aware::sample_data::sample_payload;
use serpent_aware::{Continent, Predicate, Species, StructuralFilter};

/// Sample species repeated `copies` times with distinct ids
fn catalog_of(copies: usize) -> Vec<Species> {
    let payload = sample_payload().expect("bundled sample parses");
    let now = Utc::now();
    let mut out = Vec::with_capacity(payload.species.len() * copies);
    for copy in 0..copies {
        for (i, seed) in payload.species.iter().cloned().enumerate() {
            out.push(seed.into_species(format!("bench-{}-{}", copy, i), now));
        }
    }
    out
}

// ============================================================================
// Decoding
// ============================================================================

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for copies in [1usize, 10, 100] {
        let docs: Vec<_> = catalog_of(copies).iter().map(Species::to_document).collect();
        group.throughput(Throughput::Elements(docs.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(docs.len()), &docs, |b, docs| {
            b.iter(|| {
                let decoded: Vec<Species> = docs
                    .iter()
                    .map(|d| Species::from_document(d).unwrap())
                    .collect();
                black_box(decoded)
            })
        });
    }

    group.finish();
}

// ============================================================================
// Text search
// ============================================================================

fn bench_text_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_search");
    let species = catalog_of(100);
    group.throughput(Throughput::Elements(species.len() as u64));

    // Matches one name per copy
    group.bench_function("name_hit", |b| {
        b.iter(|| apply_text_search(black_box(species.clone()), "cobra"))
    });

    // Matches through countries only
    group.bench_function("country_hit", |b| {
        b.iter(|| apply_text_search(black_box(species.clone()), "United Kingdom"))
    });

    group.bench_function("miss", |b| {
        b.iter(|| apply_text_search(black_box(species.clone()), "anaconda"))
    });

    group.finish();
}

// ============================================================================
// Filters and aggregation
// ============================================================================

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("filters");

    group.bench_function("resolve_params", |b| {
        b.iter(|| StructuralFilter::from_params(black_box(Some("North America")), black_box(Some("Deadly"))))
    });

    let docs: Vec<_> = catalog_of(100).iter().map(Species::to_document).collect();
    let predicate = Predicate::all()
        .eq("continent", "Asia")
        .eq("dangerLevel", "Deadly");
    group.bench_function("predicate_scan", |b| {
        b.iter(|| docs.iter().filter(|d| predicate.matches(d)).count())
    });

    group.bench_function("sort_continent_counts", |b| {
        let counts: Vec<(Continent, u64)> = Continent::ALL
            .iter()
            .rev()
            .enumerate()
            .map(|(i, c)| (*c, i as u64 + 1))
            .collect();
        b.iter(|| sort_continent_counts(black_box(counts.clone())))
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_text_search, bench_filters);

criterion_main!(benches);
