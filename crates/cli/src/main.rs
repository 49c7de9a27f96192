//! Essayist CLI
//!
//! Gathers run inputs from flags, the environment and `.env`, drives one run
//! and renders each step as it completes.

mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use essayist_core::config::{Credentials, RunRequest, SearchConfig};
use essayist_core::models::{LlmProvider, ModelConfig, AVAILABLE_MODELS};
use essayist_core::orchestrator::{Coordinator, CoordinatorConfig};
use essayist_core::skills::PromptSet;
use futures::StreamExt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Provider {
    Openai,
    Openrouter,
    Deepseek,
    Grok,
}

impl From<Provider> for LlmProvider {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Openai => LlmProvider::OpenAI,
            Provider::Openrouter => LlmProvider::OpenRouter,
            Provider::Deepseek => LlmProvider::DeepSeek,
            Provider::Grok => LlmProvider::Grok,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Essayist - plan, research, draft and revise an essay")]
struct Args {
    /// Essay topic or question
    topic: String,

    /// Model name
    #[arg(short, long, default_value = AVAILABLE_MODELS[0])]
    model: String,

    /// LLM provider (OpenAI-compatible endpoint)
    #[arg(long, value_enum, default_value = "openai")]
    provider: Provider,

    /// Override the provider's base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(short, long, default_value_t = 0.0)]
    temperature: f32,

    /// Skip web research even when a search key is configured
    #[arg(long)]
    no_research: bool,

    /// Revision budget
    #[arg(short = 'r', long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=5))]
    max_revisions: u32,

    /// LLM API key; falls back to the provider's usual variable (e.g. OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Tavily API key; research is disabled without one
    #[arg(long, env = "TAVILY_API_KEY", hide_env_values = true)]
    tavily_key: Option<String>,

    /// Search results requested per query
    #[arg(long, default_value_t = 2)]
    results_per_query: u32,

    /// Directory with prompt overrides (plan.md, writer.md, ...)
    #[arg(long)]
    prompts_dir: Option<PathBuf>,

    /// Write the final draft to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print each step update as a JSON line instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn model_config(&self) -> ModelConfig {
        let config = ModelConfig::with_provider(self.provider.into(), &self.model)
            .with_temperature(self.temperature);
        match &self.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    fn credentials(&self) -> Credentials {
        let provider = LlmProvider::from(self.provider);
        let llm_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var(provider.api_key_env()).ok());
        Credentials::new(llm_key, self.tavily_key.clone())
    }

    fn prompts(&self) -> Result<PromptSet> {
        let prompts = PromptSet::default();
        match &self.prompts_dir {
            Some(dir) => prompts
                .with_overrides_from(dir)
                .with_context(|| format!("Failed to read prompt overrides from {}", dir.display())),
            None => Ok(prompts),
        }
    }
}

fn initialize_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("essayist_core=warn"));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        eprintln!("warning: tracing subscriber already initialized");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    initialize_tracing();

    let args = Args::parse();

    let config = CoordinatorConfig {
        search: SearchConfig {
            max_results_per_query: args.results_per_query,
            ..SearchConfig::default()
        },
        prompts: args.prompts()?,
    };
    let request = RunRequest::new(&args.topic)
        .with_model(args.model_config())
        .with_research(!args.no_research)
        .with_max_revisions(args.max_revisions);

    let coordinator = Coordinator::new(config);
    let mut run = coordinator
        .start(request, &args.credentials())
        .context("Failed to start run")?;
    tracing::debug!(run_id = %run.run_id(), "run started");

    while let Some(update) = run.next().await {
        if args.json {
            println!("{}", serde_json::to_string(&update)?);
        } else if let Some(notice) = update.notice() {
            println!("{}", render::notice(&notice));
        }
    }

    // an aborted run still reports whatever draft it reached
    let (outcome, error) = match run.finish().await {
        Ok(outcome) => (outcome, None),
        Err(failure) => (failure.partial, Some(failure.error)),
    };

    if args.json {
        let summary = render::Summary::new(&outcome, error.as_ref());
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!("{}", render::result(outcome.final_draft()));
    }

    if let (Some(path), Some(draft)) = (&args.output, outcome.final_draft()) {
        tokio::fs::write(path, draft)
            .await
            .with_context(|| format!("Failed to write draft to {}", path.display()))?;
        eprintln!("Draft saved to {}", path.display());
    }

    match error {
        Some(e) => Err(anyhow::Error::new(e).context("Essay run failed")),
        None => Ok(()),
    }
}
