//! Benchmarks for article compilation.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use folio_compiler::{CompileOptions, compile};

/// Generate an article with the given number of sections.
fn generate_article(sections: usize) -> String {
    let mut source = String::from("---\ntitle: Benchmark\npublished: 2024-03-04\n---\n::TitleSection\n\n");

    for i in 0..sections {
        source.push_str(&format!("## Section {i}\n\n"));
        source.push_str(&format!(
            "Paragraph {i} with :Highlight[highlighted]{{color=blue}} text and **bold** words.\n\n"
        ));
        source.push_str(":::Callout{type=info}\nA note inside a callout.\n:::\n\n");
        if i % 4 == 0 {
            source.push_str(&format!(
                "::VideoPlayer{{width=640 height=360 videoUrl=/v/{i}.mp4 gifUrl=/v/{i}.gif}}\n\n"
            ));
        }
    }
    source.push_str("::DemoButton{href=/demo}\n");
    source
}

fn bench_compile_plain(c: &mut Criterion) {
    let source = "# Hello\n\nSimple content without components.\n";
    let options = CompileOptions::default();

    c.bench_function("compile_plain", |b| b.iter(|| compile(source, &options)));
}

fn bench_compile_sizes(c: &mut Criterion) {
    let options = CompileOptions::default();
    let mut group = c.benchmark_group("compile_sections");

    for sections in [10, 50, 200] {
        let source = generate_article(sections);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &source, |b, source| {
            b.iter(|| compile(source, &options));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compile_plain, bench_compile_sizes);
criterion_main!(benches);
