use criterion::{criterion_group, criterion_main, Criterion};
use proxfind::{ProxFinder, ProxFinderApi, Region, RegionKind, SearchConfiguration};

const WORDS: &[&str] = &[
    "the", "build", "failed", "due", "to", "a", "missing", "dependency", "error", "in",
    "module", "cache", "was", "flushed", "before", "index", "rebuilt", "server", "restarted",
    "after", "deploy", "mother-in-law", "don't", "riverside", "hello", "world",
];

/// Deterministic pseudo-random page of `count` regions with mixed kinds and lengths.
fn synthetic_regions(count: usize) -> Vec<Region> {
    let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };

    (0..count)
        .map(|i| {
            let len = 8 + (next() % 120) as usize;
            let text: Vec<&str> = (0..len)
                .map(|_| WORDS[(next() % WORDS.len() as u64) as usize])
                .collect();
            let kind = match next() % 4 {
                0 => RegionKind::Paragraph,
                1 => RegionKind::ListItem,
                2 => RegionKind::TableCell,
                _ => RegionKind::Container,
            };
            Region::new(format!("prox-{}", i + 1), text.join(" "), kind)
        })
        .collect()
}

fn config(terms: &[&str], max: i64, order_matters: bool) -> SearchConfiguration {
    SearchConfiguration {
        terms: terms.iter().map(|s| s.to_string()).collect(),
        max_words_between: max,
        order_matters,
        ..Default::default()
    }
}

fn bench_search(c: &mut Criterion) {
    let finder = ProxFinder::new();
    let regions = synthetic_regions(5_000);
    let rt = tokio::runtime::Runtime::new().unwrap();

    let queries = vec![
        ("single_term", config(&["dependency"], 10, false)),
        ("two_terms", config(&["build", "failed"], 10, false)),
        ("two_terms_ordered", config(&["build", "failed"], 10, true)),
        ("three_terms_wide", config(&["cache", "index", "rebuilt"], 40, false)),
        ("substring", config(&["dep", "err"], 5, false)),
        ("no_match", config(&["zebra", "quartz"], 10, false)),
    ];

    let mut group = c.benchmark_group("search");
    group.sample_size(20);

    for (name, query) in queries {
        group.bench_function(name, |b| {
            b.iter(|| {
                rt.block_on(async {
                    finder.search(query.clone(), regions.clone()).await.unwrap()
                })
            });
        });
    }
    group.finish();
}

fn bench_tokenize(c: &mut Criterion) {
    let text = synthetic_regions(200)
        .into_iter()
        .map(|r| r.text)
        .collect::<Vec<_>>()
        .join("\n");

    c.bench_function("tokenize_200_regions", |b| {
        b.iter(|| proxfind::tokenizer::tokenize(&text))
    });
}

criterion_group!(benches, bench_search, bench_tokenize);
criterion_main!(benches);
