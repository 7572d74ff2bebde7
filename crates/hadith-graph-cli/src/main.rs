use anyhow::Context as _;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use hadith_graph_core::annotate::Annotator;
use hadith_graph_core::annotate::MentionTable;
use hadith_graph_core::category::default_categories;
use hadith_graph_core::config::PipelineConfig;
use hadith_graph_core::corpus::Collection;
use hadith_graph_core::corpus::Corpus;
use hadith_graph_core::similarity::tier_all_pairs;
use hadith_graph_core::similarity::tier_duplicates;
use hadith_graph_core::similarity::SimilarityMatrix;
use hadith_graph_core::similarity::SimilarityTable;
use hadith_graph_core::turtle::CategoryTable;
use hadith_graph_core::turtle::TurtleExporter;
use hadith_graph_ner::GazetteerTagger;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "hadith-graph",
    version,
    about = "Entity annotation and knowledge-graph assembly for hadith collections"
)]
struct Cli {
    /// Pipeline config file (JSON, YAML or TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding corpus CSV files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Directory holding dictionary and gazetteer CSV files
    #[arg(long)]
    dictionaries_dir: Option<PathBuf>,
    /// Directory holding precomputed similarity matrices
    #[arg(long)]
    matrices_dir: Option<PathBuf>,
    /// Directory where tables and graphs are written
    #[arg(long)]
    results_dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every category over a collection and write mention tables
    Annotate { collection: Collection },
    /// Tier similarity scores and write the similarity table
    Similarity {
        collection: Collection,
        /// Tier every document pair instead of only declared duplicates
        #[arg(long)]
        all_pairs: bool,
    },
    /// Join persisted tables and emit the Turtle graph
    Export { collection: Collection },
    /// Annotate, tier and export in one pass
    Run {
        collection: Collection,
        #[arg(long)]
        all_pairs: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    match cli.cmd {
        Commands::Annotate { collection } => cmd_annotate(&config, collection),
        Commands::Similarity {
            collection,
            all_pairs,
        } => cmd_similarity(&config, collection, all_pairs),
        Commands::Export { collection } => cmd_export(&config, collection),
        Commands::Run {
            collection,
            all_pairs,
        } => {
            cmd_annotate(&config, collection)?;
            cmd_similarity(&config, collection, all_pairs)?;
            cmd_export(&config, collection)
        }
    }
}

fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.dictionaries_dir {
        config.dictionaries_dir = dir.clone();
    }
    if let Some(dir) = &cli.matrices_dir {
        config.matrices_dir = dir.clone();
    }
    if let Some(dir) = &cli.results_dir {
        config.results_dir = dir.clone();
    }
    Ok(config)
}

fn progress_bar(len: u64, msg: &'static str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
        )?
        .progress_chars("##-"),
    );
    pb.set_message(msg);
    Ok(pb)
}

fn cmd_annotate(config: &PipelineConfig, collection: Collection) -> Result<()> {
    let corpus = Corpus::from_csv(collection, &config.corpus_path(collection))?;
    let tagger = GazetteerTagger::from_csv(&config.dictionaries_dir.join("gazetteer.csv"))?;
    let annotator = Annotator::new(Arc::new(tagger));

    std::fs::create_dir_all(config.results_dir.join(collection.short_name()))?;
    let specs = default_categories(&config.dictionaries_dir, collection);
    let pb = progress_bar((specs.len() * corpus.len()) as u64, "Annotating")?;

    for spec in &specs {
        let table = annotator.annotate_with_progress(&corpus, spec, |_, _| pb.inc(1))?;
        table.to_csv(&config.mention_table_path(collection, &spec.name))?;
    }
    pb.finish_with_message("Done");
    println!(
        "Annotated {} documents across {} categories",
        corpus.len(),
        specs.len()
    );
    Ok(())
}

fn cmd_similarity(config: &PipelineConfig, collection: Collection, all_pairs: bool) -> Result<()> {
    let corpus = Corpus::from_csv(collection, &config.corpus_path(collection))?;
    let arabic = SimilarityMatrix::from_csv(&config.matrix_path(collection, "ar"))?;
    let english = SimilarityMatrix::from_csv(&config.matrix_path(collection, "en"))?;

    let table = if all_pairs {
        tier_all_pairs(&corpus, &arabic, &english)?
    } else {
        tier_duplicates(&corpus, &arabic, &english)?
    };

    std::fs::create_dir_all(config.results_dir.join(collection.short_name()))?;
    let path = config.similarity_table_path(collection);
    table.to_csv(&path)?;
    println!("Similarity table written to {}", path.display());
    Ok(())
}

fn cmd_export(config: &PipelineConfig, collection: Collection) -> Result<()> {
    let corpus = Corpus::from_csv(collection, &config.corpus_path(collection))?;

    let mut categories = Vec::new();
    for spec in default_categories(&config.dictionaries_dir, collection) {
        let path = config.mention_table_path(collection, &spec.name);
        let table = MentionTable::from_csv(spec.name.clone(), &path)?;
        categories.push(CategoryTable {
            predicate: spec.predicate,
            table,
        });
    }

    // The graph is still valid without similarity relations.
    let similarity_path = config.similarity_table_path(collection);
    let similarity = if similarity_path.exists() {
        Some(SimilarityTable::from_csv(&similarity_path)?)
    } else {
        info!(path = %similarity_path.display(), "no similarity table, skipping relations");
        None
    };

    let exporter = TurtleExporter::new(collection, categories, similarity);
    let path = config.graph_path(collection);
    exporter.export_to_file(&corpus, &path)?;
    println!("Graph written to {}", path.display());
    Ok(())
}
