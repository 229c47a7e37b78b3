//! Content analysis and resolution benchmarks.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use vexel_chunking::{AdvisorConfig, ChunkingAdvisor, UploadRequest};

/// Markdown document with headings, lists and a code block per section.
fn generate_markdown(sections: usize) -> String {
    let mut doc = String::from("# Operations Handbook\n\n");
    for i in 0..sections {
        doc.push_str(&format!("## Section {i}\n\n"));
        doc.push_str("This section explains how the ingestion service handles uploads, ");
        doc.push_str("including retries, quotas and the shape of stored chunks.\n\n");
        doc.push_str("- first step\n- second step\n- third step\n\n");
        if i % 3 == 0 {
            doc.push_str("```bash\nvexel-chunk advise report.pdf --tier premium\n```\n\n");
        }
    }
    doc
}

fn bench_analyze(c: &mut Criterion) {
    let advisor = ChunkingAdvisor::new(&AdvisorConfig::default()).unwrap();
    let mut group = c.benchmark_group("analyze");

    for sections in [10, 100, 1000] {
        let doc = generate_markdown(sections);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &doc, |b, doc| {
            b.iter(|| advisor.analyze(black_box(doc), "markdown"));
        });
    }
    group.finish();
}

fn bench_advise(c: &mut Criterion) {
    let advisor = ChunkingAdvisor::new(&AdvisorConfig::default()).unwrap();
    let doc = generate_markdown(100);
    let request = UploadRequest {
        file_type: "markdown".to_string(),
        requested_strategy: Some("auto".to_string()),
        tier: Some("premium".to_string()),
        ..Default::default()
    };

    c.bench_function("advise_markdown_100", |b| {
        b.iter(|| advisor.advise(black_box(&request), black_box(&doc)))
    });
}

criterion_group!(benches, bench_analyze, bench_advise);
criterion_main!(benches);
