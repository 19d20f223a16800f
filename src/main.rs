use std::{fs, path::{Path, PathBuf}, time::Instant};

use anyhow::{bail, Context};
use clap::Parser;
use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use tf_idf_vsm::{IdfSummary, RankedTerms, TermBreakdown, VectorSpaceModel, Weighting};

/// Term weighting report over a directory of pre-tokenized documents.
///
/// Every regular file is one document named after the file; its tokens are
/// separated by whitespace.
#[derive(Parser, Debug)]
#[command(name = "tf-idf-vsm", version, about)]
struct Args {
    /// Directory holding one tokenized document per file
    docs: PathBuf,
    /// Terms listed per document and weighting
    #[arg(long, default_value_t = 5)]
    top_n: usize,
    /// Matrix rows shown in the preview
    #[arg(long, default_value_t = 12)]
    preview_rows: usize,
    /// IDF values shown from each end of the summary
    #[arg(long, default_value_t = 10)]
    idf_rows: usize,
    /// IDF above this marks a term as distinctive
    #[arg(long, default_value_t = 1.2)]
    unique_threshold: f64,
    /// IDF below this marks a term as common
    #[arg(long, default_value_t = 0.8)]
    common_threshold: f64,
    /// Show the full weighting of one term
    #[arg(long)]
    explain: Option<String>,
    /// Load at most N documents
    #[arg(long)]
    limit: Option<usize>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct DocumentReport {
    document: String,
    tf: RankedTerms,
    tfidf: RankedTerms,
}

#[derive(Serialize)]
struct Report {
    doc_num: usize,
    term_num: usize,
    documents: Vec<DocumentReport>,
    idf: IdfSummary,
    unique_terms: Vec<String>,
    common_terms: Vec<String>,
    explain: Option<TermBreakdown>,
}

/// Read every file of `dir` in path order and split it into tokens
fn load_documents(dir: &Path, limit: Option<usize>) -> anyhow::Result<Vec<(String, Vec<String>)>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("cannot read directory {}", dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    info!("{} files in {}", files.len(), dir.display());

    let loaded: Vec<Option<(String, Vec<String>)>> = files
        .par_iter()
        .map(|path| {
            let content = match fs::read_to_string(path) {
                Ok(c) => c,
                Err(e) => {
                    warn!("skip {}: {}", path.display(), e);
                    return None;
                }
            };
            let tokens: Vec<String> = content.split_whitespace().map(str::to_string).collect();
            if tokens.is_empty() {
                warn!("skip {}: no tokens", path.display());
                return None;
            }
            let name = path.file_name()?.to_string_lossy().into_owned();
            Some((name, tokens))
        })
        .collect();

    let mut documents: Vec<(String, Vec<String>)> = loaded.into_iter().flatten().collect();
    if let Some(limit) = limit {
        documents.truncate(limit);
    }
    Ok(documents)
}

fn build_report(model: &mut VectorSpaceModel, args: &Args) -> anyhow::Result<Report> {
    let names: Vec<String> = model.document_names().map(str::to_string).collect();
    let mut documents = Vec::with_capacity(names.len());
    for (i, name) in names.into_iter().enumerate() {
        documents.push(DocumentReport {
            document: name,
            tf: model.relevant_terms(i, args.top_n, Weighting::Tf)?,
            tfidf: model.relevant_terms(i, args.top_n, Weighting::TfIdf)?,
        });
    }

    let idf = model.idf_summary();
    let unique_terms = idf.above(args.unique_threshold).into_iter().map(str::to_string).collect();
    let common_terms = idf.below(args.common_threshold).into_iter().map(str::to_string).collect();
    let explain = match &args.explain {
        Some(term) => {
            let breakdown = model.explain_term(term)?;
            if breakdown.is_none() {
                warn!("term `{}` does not occur in any document", term);
            }
            breakdown
        }
        None => None,
    };

    Ok(Report {
        doc_num: model.doc_num(),
        term_num: model.store().term_num(),
        documents,
        idf,
        unique_terms,
        common_terms,
        explain,
    })
}

fn print_matrix(title: &str, model: &mut VectorSpaceModel, weighting: Weighting, rows: usize) -> anyhow::Result<()> {
    let matrix = model.matrix(weighting)?;
    let (term_num, doc_num) = matrix.shape();
    println!("\n{}", title);
    println!("{}", "-".repeat(45));
    println!("shape: {} terms x {} documents", term_num, doc_num);
    let header: Vec<&str> = matrix.documents().iter().map(|s| s.as_str()).collect();
    println!("{:<24}{}", "", header.iter().map(|d| format!("{:>12}", d)).collect::<String>());
    for (term, row) in matrix.rows().take(rows) {
        let cells: String = row.iter().map(|v| format!("{:>12.4}", v)).collect();
        println!("{:<24}{}", term, cells);
    }
    Ok(())
}

fn print_report(report: &Report, args: &Args, model: &mut VectorSpaceModel) -> anyhow::Result<()> {
    println!("=== TERM WEIGHTING REPORT (TF vs TF-IDF) ===");
    println!("{} documents, {} distinct terms", report.doc_num, report.term_num);

    println!("\n1. MOST RELEVANT TERMS PER DOCUMENT");
    for doc in &report.documents {
        println!("\n  {}", doc.document);
        println!("    TF (normalized frequency):");
        for (rank, (term, weight)) in doc.tf.iter().enumerate() {
            println!("      {}. {}: {:.4}", rank + 1, term, weight);
        }
        println!("    TF-IDF (collection weighting):");
        for (rank, (term, weight)) in doc.tfidf.iter().enumerate() {
            println!("      {}. {}: {:.4}", rank + 1, term, weight);
        }
    }

    print_matrix("2. TF MATRIX", model, Weighting::Tf, args.preview_rows)?;
    print_matrix("3. TF-IDF MATRIX", model, Weighting::TfIdf, args.preview_rows)?;

    println!("\n4. IDF STATISTICS");
    let rows = args.idf_rows;
    if report.idf.len() <= rows * 2 {
        for (term, idf) in &report.idf.list {
            println!("  {:<24}{:.4}", term, idf);
        }
    } else {
        for (term, idf) in report.idf.head(rows) {
            println!("  {:<24}{:.4}", term, idf);
        }
        println!("  ...");
        for (term, idf) in report.idf.tail(rows) {
            println!("  {:<24}{:.4}", term, idf);
        }
    }

    println!("\n5. TERM ANALYSIS");
    println!("  distinctive (IDF > {}): {:?}", args.unique_threshold, &report.unique_terms[..report.unique_terms.len().min(10)]);
    println!("  common (IDF < {}): {:?}", args.common_threshold, &report.common_terms[..report.common_terms.len().min(10)]);

    if let Some(b) = &report.explain {
        println!("\n6. WEIGHTING OF `{}`", b.term);
        println!("  N = {}, df = {}", b.doc_num, b.doc_freq);
        println!("  idf = ln({} / ({} + 1)) + 1 = {:.4}", b.doc_num, b.doc_freq, b.idf);
        for w in &b.per_document {
            println!("  {}: TF = {:.4}, TF-IDF = {:.4}", w.document, w.tf, w.tfidf);
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let program_start = Instant::now();

    let documents = load_documents(&args.docs, args.limit)?;
    if documents.is_empty() {
        bail!("no documents loaded from {}", args.docs.display());
    }

    let mut model: VectorSpaceModel = VectorSpaceModel::new();
    for (name, tokens) in &documents {
        model
            .add_document(name, tokens.as_slice())
            .with_context(|| format!("cannot add document {}", name))?;
    }
    let load_done = Instant::now();

    let report = build_report(&mut model, &args)?;
    info!(
        "loaded {} documents in {:.2}ms, weighted in {:.2}ms",
        model.doc_num(),
        load_done.duration_since(program_start).as_secs_f64() * 1000.0,
        load_done.elapsed().as_secs_f64() * 1000.0
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &args, &mut model)?;
    }
    Ok(())
}
