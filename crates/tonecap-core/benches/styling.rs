//! Benchmarks for caption styling and hashtag selection.
//!
//! Run with: cargo bench -p tonecap-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tonecap_core::style::{normalize_caption, HashtagMatcher, ToneMode, ToneStylist};

fn benchmark_hashtag_match(c: &mut Criterion) {
    let matcher = HashtagMatcher::default();
    let mut rng = StdRng::seed_from_u64(1);

    c.bench_function("hashtags_multi_category", |b| {
        b.iter(|| {
            matcher.select(
                black_box("a trader studying a bitcoin chart at the gym every morning"),
                &mut rng,
            )
        })
    });

    c.bench_function("hashtags_fallback", |b| {
        b.iter(|| matcher.select(black_box("a dog sitting on grass"), &mut rng))
    });
}

fn benchmark_style_all_tones(c: &mut Criterion) {
    let stylist = ToneStylist::default();
    let mut rng = StdRng::seed_from_u64(2);

    c.bench_function("style_all_tones", |b| {
        b.iter(|| {
            for tone in ToneMode::ALL {
                black_box(stylist.style_with_rng(
                    black_box("  a photo of bitcoin chart going up. "),
                    Some(tone),
                    &mut rng,
                ));
            }
        })
    });
}

fn benchmark_normalize(c: &mut Criterion) {
    c.bench_function("normalize_caption", |b| {
        b.iter(|| normalize_caption(black_box("   a cat sleeping on a windowsill...  ")))
    });
}

criterion_group!(
    benches,
    benchmark_hashtag_match,
    benchmark_style_all_tones,
    benchmark_normalize
);
criterion_main!(benches);
