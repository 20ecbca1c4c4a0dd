//! Parse and layout throughput benchmarks.
//!
//! Measures the full description pipeline (split, annotation scan, height
//! pre-pass) and visible-range lookup as descriptions grow.
//!
//! Run with: cargo bench --bench layout_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use richlog::config::MarkupSettings;
use richlog::images::{ImageCache, Texture};
use richlog::parser::parse;
use richlog::segments::LayoutEnv;
use richlog::view::MonospaceMeasurer;
use richlog::view_state::DocumentLayout;

/// A changelog with `sections` repeated blocks of every construct.
fn generate_description(sections: usize) -> String {
    let mut text = String::new();
    for i in 0..sections {
        text.push_str(&format!("<title>Version 1.{i}</title>"));
        text.push_str("<font>Small</font>Fixed a crash when <u>saving</u> with an empty slot.\n");
        text.push_str("See <link>https://example.test/issues</link>(the tracker) for details.\n");
        text.push_str("<anchor>MiddleCenter</anchor><img WIDTH=320>banner</img>");
        text.push_str("<anchor>UpperLeft</anchor><font>Tiny</font>Thanks to everyone who reported it.\n");
    }
    text
}

fn benchmark_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for sections in [1usize, 10, 100, 1000] {
        let text = generate_description(sections);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &text, |b, text| {
            b.iter(|| parse(black_box(text)));
        });
    }

    group.finish();
}

fn benchmark_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let settings = MarkupSettings::default();
    let mut images = ImageCache::new();
    images.insert_local("banner", Texture::new("banner", image::RgbaImage::new(640, 200)));
    let measurer = MonospaceMeasurer::default();
    let env = LayoutEnv::new(&settings, &images, &measurer);

    for sections in [1usize, 10, 100, 1000] {
        let segments = parse(&generate_description(sections));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &segments, |b, segments| {
            b.iter(|| DocumentLayout::compute(black_box(segments), &env));
        });
    }

    group.finish();
}

fn benchmark_visible_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_range");
    let settings = MarkupSettings::default();
    let images = ImageCache::new();
    let measurer = MonospaceMeasurer::default();
    let env = LayoutEnv::new(&settings, &images, &measurer);

    for sections in [100usize, 1000, 10_000] {
        let layout = DocumentLayout::compute(&parse(&generate_description(sections)), &env);
        let middle = layout.total_height() / 2;
        group.bench_with_input(BenchmarkId::from_parameter(sections), &layout, |b, layout| {
            b.iter(|| layout.visible_range(black_box(middle), black_box(600)));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_parse, benchmark_layout, benchmark_visible_range);
criterion_main!(benches);
