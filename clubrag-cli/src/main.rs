//! ClubRAG CLI - ask questions about a club from its data file
//!
//! # Commands
//!
//! ```bash
//! # One-shot question
//! clubrag ask "When are the weekly meetups?"
//!
//! # Interactive session (type 'exit' to finish)
//! clubrag chat
//!
//! # Show the ranked context for a query without calling the model
//! clubrag retrieve "hackathon prizes" -k 5
//!
//! # Show which mode a query triggers
//! clubrag classify "suggest an event idea"
//!
//! # List loaded corpus units and detected past events
//! clubrag corpus
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clubrag_lib::{
    assistant::{Answer, Assistant, Reply},
    complete::{ChatCompletionsClient, CompletionService},
    config::Config,
    corpus::Corpus,
    embed::{Embedder, OnnxEmbedder},
    intent::classify,
    modes::SpecialModes,
    search::SearchEngine,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clubrag")]
#[command(about = "Answer questions about a club using only its own data")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(short, long, global = true, env = "CLUBRAG_CONFIG")]
    config: Option<PathBuf>,

    /// Club data file (overrides corpus.path)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Number of context lines for generic questions (overrides retrieval.top_k)
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// Embedding model name (overrides embedding.model)
    #[arg(long, global = true)]
    embedding_model: Option<String>,

    /// Completion model identifier (overrides completion.model)
    #[arg(long, global = true, env = "CLUBRAG_MODEL")]
    model: Option<String>,

    /// Chat completions URL (overrides completion.endpoint)
    #[arg(long, global = true, env = "CLUBRAG_ENDPOINT")]
    endpoint: Option<String>,

    /// API key for the completion service; defaults to the variable named by completion.api_key_env
    #[arg(long, global = true, env = "OPENROUTER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a single question
    Ask {
        /// The question
        query: String,
    },

    /// Interactive question loop
    Chat,

    /// Show the most similar corpus lines for a query
    Retrieve {
        /// Query to search for
        query: String,

        /// Number of results to return
        #[arg(short, long, default_value = "3")]
        k: usize,
    },

    /// Show which mode a query triggers
    Classify {
        /// Query to classify
        query: String,
    },

    /// List corpus units and detected past events
    Corpus,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(path) = &self.corpus {
            config.corpus.path = path.clone();
        }
        if let Some(k) = self.top_k {
            config.retrieval.top_k = k;
        }
        if let Some(model) = &self.embedding_model {
            config.embedding.model = model.clone();
        }
        if let Some(model) = &self.model {
            config.completion.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.completion.endpoint = endpoint.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn load_corpus(config: &Config) -> Result<Corpus> {
    Corpus::from_path(&config.corpus.path, config.corpus.min_chars)
        .with_context(|| format!("failed to load corpus from {}", config.corpus.path.display()))
}

fn load_embedder(config: &Config) -> Result<OnnxEmbedder> {
    eprintln!("Loading embedding model '{}'...", config.embedding.model);
    OnnxEmbedder::new(&config.embedding.model).context("failed to load embedding model")
}

fn build_assistant(cli: &Cli, config: &Config) -> Result<Assistant<OnnxEmbedder, ChatCompletionsClient>> {
    let completion = match &cli.api_key {
        Some(key) => ChatCompletionsClient::new(&config.completion, key.clone()),
        None => ChatCompletionsClient::from_env(&config.completion),
    }
    .context("failed to configure completion service")?;

    let corpus = load_corpus(config)?;
    let embedder = load_embedder(config)?;
    eprintln!("Indexing {} lines...", corpus.len());
    let assistant = Assistant::build(&corpus, embedder, completion, config)
        .context("failed to build embedding index")?;
    info!(units = corpus.len(), top_k = assistant.top_k(), "assistant ready");
    Ok(assistant)
}

fn print_answer(answer: &Answer) {
    if let Some(context) = &answer.context {
        println!("=== Relevant Context ===\n{context}\n");
        println!("=== Chatbot Response ===\n{}", answer.response);
    } else {
        println!("=== Response ===\n{}", answer.response);
    }
}

fn chat<E: Embedder, C: CompletionService>(assistant: &mut Assistant<E, C>) -> Result<()> {
    println!("\n==============================");
    println!(" Club RAG Chatbot Ready!");
    println!(" Type 'exit' to finish.");
    println!("==============================\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        if matches!(line.trim().to_lowercase().as_str(), "exit" | "quit") {
            break;
        }

        match assistant.reply(&line) {
            Reply::Answered(answer) => println!("\nBot: {}\n", answer.response),
            Reply::Failed(message) => println!("\nBot: {message}\n"),
        }
    }
    println!("\nBot: Goodbye!");
    Ok(())
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so answers can be piped
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config()?;

    match &cli.command {
        Commands::Ask { query } => {
            if query.trim().is_empty() {
                eprintln!("Please enter a question.");
                return Ok(ExitCode::from(2));
            }
            let mut assistant = build_assistant(&cli, &config)?;
            match assistant.reply(query) {
                Reply::Answered(answer) => print_answer(&answer),
                Reply::Failed(message) => {
                    eprintln!("{message}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Chat => {
            let mut assistant = build_assistant(&cli, &config)?;
            chat(&mut assistant)?;
        }

        Commands::Retrieve { query, k } => {
            let corpus = load_corpus(&config)?;
            let embedder = load_embedder(&config)?;
            let mut engine = SearchEngine::build(embedder, corpus.units().to_vec())
                .context("failed to build embedding index")?;

            println!("Searching {} lines: '{query}' (k={k})", engine.len());
            let retrieval = engine.query(query, *k)?;

            println!("\n=== Results ===\n");
            for (i, result) in retrieval.results.iter().enumerate() {
                println!(
                    "#{} (score: {:.4}, line {})",
                    i + 1,
                    result.score,
                    result.chunk.position
                );
                println!("{}\n", result.chunk.content);
            }
        }

        Commands::Classify { query } => {
            println!("{}", classify(query));
        }

        Commands::Corpus => {
            let corpus = load_corpus(&config)?;
            let modes = SpecialModes::new(&corpus, &config.modes);

            println!("Loaded {} lines from {}:\n", corpus.len(), config.corpus.path.display());
            for unit in corpus.units() {
                println!("{:>4}  {}", unit.position, unit.content);
            }
            println!("\n{}", modes.list_past_events());
        }
    }

    Ok(ExitCode::SUCCESS)
}
