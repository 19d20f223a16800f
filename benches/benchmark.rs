use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tf_idf_vsm::{build_tf_matrix, build_tfidf_matrix, DefaultTFIDFEngine, DocumentStore, VectorSpaceModel, Weighting};

/// `doc_num` documents of `doc_len` tokens over a `vocab` sized vocabulary
fn synthetic_documents(doc_num: usize, doc_len: usize, vocab: u32) -> Vec<(String, Vec<String>)> {
    let mut rng = StdRng::seed_from_u64(0x1234_5678);
    (0..doc_num)
        .map(|d| {
            let tokens = (0..doc_len)
                .map(|_| format!("term{}", rng.gen_range(0..vocab)))
                .collect();
            (format!("doc{}", d), tokens)
        })
        .collect()
}

fn weighting_benchmark(c: &mut Criterion) {
    let documents = synthetic_documents(500, 400, 5_000);
    let mut store = DocumentStore::new();
    for (name, tokens) in &documents {
        store.add_document(name, tokens.as_slice()).unwrap();
    }

    c.bench_function("build_tf_matrix", |b| {
        b.iter(|| build_tf_matrix::<f64, DefaultTFIDFEngine>(&store).unwrap())
    });

    let tf = build_tf_matrix::<f64, DefaultTFIDFEngine>(&store).unwrap();
    c.bench_function("build_tfidf_matrix", |b| {
        b.iter(|| build_tfidf_matrix::<f64, DefaultTFIDFEngine>(&store, Some(&tf)).unwrap())
    });

    let mut model: VectorSpaceModel = VectorSpaceModel::new();
    for (name, tokens) in &documents {
        model.add_document(name, tokens.as_slice()).unwrap();
    }
    model.tfidf_matrix().unwrap();
    c.bench_function("relevant_terms", |b| {
        b.iter(|| {
            for i in 0..model.doc_num() {
                model.relevant_terms(i, 10, Weighting::TfIdf).unwrap();
            }
        })
    });
}

criterion_group!(benches, weighting_benchmark);
criterion_main!(benches);
