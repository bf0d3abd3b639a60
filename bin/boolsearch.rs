use anyhow::{bail, Context, Result};
use boolsearch::evaluation::{self, Confusion};
use boolsearch::{
    corpus, BooleanRetrieval, DocId, RankedResult, RetrievalSystem, SearchError, SearchSettings,
    TfIdfRetrieval,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "boolsearch")]
#[command(about = "Boolean, phrase and ranked search over a document directory", long_about = None)]
struct Cli {
    /// Directory with one file per document, named by its numeric id
    #[arg(long, env = "BOOLSEARCH_CORPUS", default_value = "./corpus")]
    corpus: PathBuf,

    /// Character k-gram size used for spelling correction
    #[arg(short = 'k', long, env = "BOOLSEARCH_KGRAM_SIZE", default_value = "2")]
    kgram_size: usize,

    /// Minimum results for a term before spelling correction kicks in
    #[arg(short = 'r', long, env = "BOOLSEARCH_MIN_RESULTS", default_value = "1")]
    min_results: usize,

    /// Tf-idf saturation constant (1.2 to 2.0)
    #[arg(long, env = "BOOLSEARCH_SATURATION", default_value = "2.0")]
    saturation: f64,

    /// Print results as JSON
    #[arg(long, env = "BOOLSEARCH_JSON")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a boolean query, printing matching document ids
    Search {
        /// Query, e.g. `cat AND NOT "the dog" AND (sat OR ran)`
        query: String,
    },
    /// Rank documents for a free-text query with tf-idf
    Rank {
        query: String,

        /// Only print the best N documents
        #[arg(long, env = "BOOLSEARCH_TOP_K")]
        top_k: Option<usize>,
    },
    /// Score ranked retrieval against relevance judgements
    Evaluate {
        /// Directory with one file per query, named by its query id
        #[arg(long, env = "BOOLSEARCH_QUERIES")]
        queries: PathBuf,

        /// Relevance judgements, one `query_id doc_id` pair per line
        #[arg(long, env = "BOOLSEARCH_QRELS")]
        qrels: PathBuf,

        /// Only rank the best N documents per query
        #[arg(long, env = "BOOLSEARCH_TOP_K")]
        top_k: Option<usize>,

        /// Cutoffs for precision, recall and F1
        #[arg(long, value_delimiter = ',', default_value = "5,10,20,50")]
        cutoffs: Vec<usize>,
    },
}

impl Cli {
    fn settings(&self) -> Result<SearchSettings> {
        let settings = SearchSettings::default()
            .with_kgram_size(self.kgram_size)
            .with_min_results(self.min_results)
            .with_saturation(self.saturation);
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Serialize)]
struct CutoffScores {
    k: usize,
    confusion: Confusion,
    precision: Option<f64>,
    recall: Option<f64>,
    f1: Option<f64>,
}

#[derive(Serialize)]
struct QueryReport {
    query_id: String,
    retrieved: usize,
    relevant: usize,
    average_precision: Option<f64>,
    r_precision: Option<f64>,
    cutoffs: Vec<CutoffScores>,
}

#[derive(Serialize)]
struct EvaluationReport {
    queries: Vec<QueryReport>,
    mean_average_precision: Option<f64>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_status(&err))
        }
    }
}

/// Bad queries and settings exit with 2, anything else with 1
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<SearchError>() {
        Some(search_err) if search_err.is_user_error() => 2,
        _ => 1,
    }
}

fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("boolsearch=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = cli.settings()?;

    debug!("boolsearch v{} with {:?}", boolsearch::VERSION, settings);

    let index = corpus::load_corpus(&cli.corpus)
        .with_context(|| format!("failed to load corpus from {}", cli.corpus.display()))?;

    match &cli.command {
        Command::Search { query } => {
            let retrieval = BooleanRetrieval::new(&index, settings)?;
            let doc_ids = retrieval.search(query)?;
            info!(matches = doc_ids.len(), "Boolean search finished");
            print_doc_ids(&doc_ids, cli.json)?;
        }
        Command::Rank { query, top_k } => {
            let retrieval = TfIdfRetrieval::new(&index, settings)?;
            let results = match top_k {
                Some(k) => retrieval.retrieve_k(query, *k)?,
                None => retrieval.retrieve(query)?,
            };
            info!(matches = results.len(), "Ranking finished");
            print_ranked(&results, cli.json)?;
        }
        Command::Evaluate {
            queries,
            qrels,
            top_k,
            cutoffs,
        } => {
            let retrieval = TfIdfRetrieval::new(&index, settings)?;
            let report = evaluate(&retrieval, queries, qrels, *top_k, cutoffs)?;
            print_report(&report, cli.json)?;
        }
    }

    Ok(())
}

fn evaluate(
    retrieval: &dyn RetrievalSystem,
    queries: &Path,
    qrels: &Path,
    top_k: Option<usize>,
    cutoffs: &[usize],
) -> Result<EvaluationReport> {
    let queries = corpus::read_queries(queries)
        .with_context(|| format!("failed to read queries from {}", queries.display()))?;
    let qrels = evaluation::read_qrels(qrels)
        .with_context(|| format!("failed to read judgements from {}", qrels.display()))?;

    let mut reports = Vec::new();
    for (query_id, text) in &queries {
        let Some(relevant) = qrels.get(query_id) else {
            debug!(query_id = %query_id, "No judgements for query, skipping");
            continue;
        };

        let results = match top_k {
            Some(k) => retrieval.retrieve_k(text, k)?,
            None => retrieval.retrieve(text)?,
        };
        let ranked: Vec<DocId> = results.iter().map(RankedResult::doc_id).collect();

        let cutoffs = cutoffs
            .iter()
            .map(|&k| {
                let top = &ranked[..k.min(ranked.len())];
                let confusion = evaluation::confusion(top, relevant);
                CutoffScores {
                    k,
                    confusion,
                    precision: confusion.precision(),
                    recall: confusion.recall(),
                    f1: confusion.f_score(1.0),
                }
            })
            .collect();

        reports.push(QueryReport {
            query_id: query_id.clone(),
            retrieved: ranked.len(),
            relevant: relevant.len(),
            average_precision: evaluation::average_precision(&ranked, relevant),
            r_precision: evaluation::r_precision(&ranked, relevant),
            cutoffs,
        });
    }

    if reports.is_empty() {
        bail!("no query has relevance judgements");
    }

    let aps: Vec<f64> = reports.iter().filter_map(|r| r.average_precision).collect();
    info!(queries = reports.len(), "Evaluation finished");

    Ok(EvaluationReport {
        mean_average_precision: evaluation::mean_average_precision(&aps),
        queries: reports,
    })
}

fn print_doc_ids(doc_ids: &[DocId], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(doc_ids)?);
    } else {
        for doc_id in doc_ids {
            println!("{}", doc_id);
        }
    }
    Ok(())
}

fn print_ranked(results: &[RankedResult], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        for result in results {
            println!("{}\t{:.6}", result.doc_id(), result.score());
        }
    }
    Ok(())
}

fn print_report(report: &EvaluationReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for query in &report.queries {
        print!(
            "{}\tAP={}\tR-P={}",
            query.query_id,
            fmt_metric(query.average_precision),
            fmt_metric(query.r_precision)
        );
        for cutoff in &query.cutoffs {
            print!(
                "\tP@{k}={}\tR@{k}={}\tF1@{k}={}",
                fmt_metric(cutoff.precision),
                fmt_metric(cutoff.recall),
                fmt_metric(cutoff.f1),
                k = cutoff.k
            );
        }
        println!();
    }
    println!("MAP\t{}", fmt_metric(report.mean_average_precision));
    Ok(())
}

fn fmt_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}
