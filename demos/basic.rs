use tf_idf_vsm::{VectorSpaceModel, Weighting};

fn main() {
    // tokens come from an external tokenizer
    let mut model: VectorSpaceModel = VectorSpaceModel::new();
    model
        .add_document("doc1", &["machine", "learning", "data", "science", "algorithm", "data", "learning"])
        .unwrap();
    model
        .add_document("doc2", &["deep", "learning", "neural", "network", "deep", "learning"])
        .unwrap();
    model
        .add_document("doc3", &["natural", "language", "processing", "text", "mining", "language", "text"])
        .unwrap();

    for i in 0..model.doc_num() {
        let tf = model.relevant_terms(i, 3, Weighting::Tf).unwrap();
        let tfidf = model.relevant_terms(i, 3, Weighting::TfIdf).unwrap();
        println!("TF     {:#?}", tf);
        println!("TF-IDF {:#?}", tfidf);
    }

    println!("{:?}", model.idf_summary());
    println!("shape: {:?}", model.tfidf_matrix().unwrap().shape());
}
