//! CLI binary for resume-lens.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `AnalysisConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use resume_lens::pipeline::input::{default_image_path, resolve_input};
use resume_lens::{
    render_to_file, AnalysisConfig, AnalysisHistory, AnalysisOutput, AnalysisTask,
    PreparedResume, RenderOptions,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Review a resume against a job posting
  resume-lens cv.pdf --job job.txt

  # Match percentage only, job text inline
  resume-lens cv.docx --job-text "Senior Rust engineer, Tokio, gRPC" --task match

  # Run every analysis and emit JSON
  resume-lens cv.pdf --job job.txt --all-tasks --json > report.json

  # Just render the normalized page (no API key needed)
  resume-lens cv.docx --render-only -o cv.jpg

  # Resume from a URL, specific model
  resume-lens https://example.com/cv.pdf --job job.txt --provider openai --model gpt-4.1-mini

TASKS:
  review     Tell Me About the Resume (default)
  match      Percentage Match (prints a score)
  improve    Skill Improvement Suggestions
  missing    Highlight Missing Skills
  detailed   Detailed Analysis

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider, gemini-2.0-flash)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
"#;

/// Analyse resumes against job descriptions using Vision LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "resume-lens",
    version,
    about = "Analyse PDF/DOCX resumes against job descriptions using Vision LLMs",
    long_about = "Normalize a resume (PDF or DOCX, local file or URL) into a single JPEG page \
and ask a Vision Language Model to review it against a job description. Supports Google \
Gemini, OpenAI, Anthropic, and any OpenAI-compatible endpoint (Ollama, vLLM, LiteLLM, etc.).",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local .pdf/.docx path or HTTP/HTTPS URL.
    input: String,

    /// File holding the job description.
    #[arg(long, env = "RESUME_LENS_JOB", conflicts_with = "job_text")]
    job: Option<PathBuf>,

    /// Job description given inline.
    #[arg(long, env = "RESUME_LENS_JOB_TEXT")]
    job_text: Option<String>,

    /// Analysis to run.
    #[arg(long, env = "RESUME_LENS_TASK", value_enum, default_value = "review")]
    task: TaskArg,

    /// Run every analysis task in turn.
    #[arg(long, env = "RESUME_LENS_ALL_TASKS", conflicts_with_all = ["task", "instruction"])]
    all_tasks: bool,

    /// Only normalize the resume and write the JPEG; no model call.
    #[arg(long, env = "RESUME_LENS_RENDER_ONLY")]
    render_only: bool,

    /// JPEG path for --render-only. Default: <input stem>.jpg.
    #[arg(short, long, env = "RESUME_LENS_OUTPUT", requires = "render_only")]
    output: Option<PathBuf>,

    /// Output structured JSON instead of text.
    #[arg(long, env = "RESUME_LENS_JSON")]
    json: bool,

    /// LLM model ID (e.g. gemini-2.0-flash, gpt-4.1-mini).
    #[arg(long, env = "RESUME_LENS_MODEL")]
    model: Option<String>,

    /// LLM provider: gemini, openai, anthropic, ollama, azure.
    #[arg(
        long,
        env = "RESUME_LENS_PROVIDER",
        long_help = "LLM provider. Auto-detected from API key env vars if not set.\n\
          Supported: gemini, openai, anthropic, azure, ollama, or any OpenAI-compatible URL."
    )]
    provider: Option<String>,

    /// PDF rendering DPI (72–400).
    #[arg(long, env = "RESUME_LENS_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// JPEG quality (1–100).
    #[arg(long, env = "RESUME_LENS_JPEG_QUALITY", default_value_t = 90,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// TrueType font for DOCX text pages.
    #[arg(long, env = "RESUME_LENS_FONT")]
    font: Option<PathBuf>,

    /// Do not look for system fonts; use --font or the built-in face.
    #[arg(long, env = "RESUME_LENS_NO_SYSTEM_FONTS")]
    no_system_fonts: bool,

    /// Path to a text file replacing the task instruction.
    #[arg(long, env = "RESUME_LENS_INSTRUCTION")]
    instruction: Option<PathBuf>,

    /// Max LLM output tokens.
    #[arg(long, env = "RESUME_LENS_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "RESUME_LENS_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// LLM call timeout in seconds.
    #[arg(long, env = "RESUME_LENS_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "RESUME_LENS_DOWNLOAD_TIMEOUT", default_value_t = 60)]
    download_timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RESUME_LENS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "RESUME_LENS_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum TaskArg {
    Review,
    Match,
    Improve,
    Missing,
    Detailed,
}

impl From<TaskArg> for AnalysisTask {
    fn from(v: TaskArg) -> Self {
        match v {
            TaskArg::Review => AnalysisTask::Review,
            TaskArg::Match => AnalysisTask::PercentageMatch,
            TaskArg::Improve => AnalysisTask::SkillImprovement,
            TaskArg::Missing => AnalysisTask::MissingSkills,
            TaskArg::Detailed => AnalysisTask::DetailedAnalysis,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let render = render_options(&cli);

    // ── Render-only mode ─────────────────────────────────────────────────
    if cli.render_only {
        let out_path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_image_path(&cli.input));
        let image = render_to_file(&cli.input, &out_path, &render)
            .await
            .context("Failed to render resume")?;
        if !cli.quiet {
            eprintln!(
                "{}  {}x{} px  {} bytes  →  {}",
                green("✔"),
                image.width(),
                image.height(),
                image.jpeg_bytes().len(),
                bold(&out_path.display().to_string()),
            );
        }
        return Ok(());
    }

    // ── Analysis ─────────────────────────────────────────────────────────
    let job = job_description(&cli).await?;
    let config = build_config(&cli, render).await?;
    let doc = resolve_input(&cli.input, config.download_timeout_secs)
        .await
        .context("Failed to load resume")?;

    let tasks: Vec<AnalysisTask> = if cli.all_tasks {
        AnalysisTask::ALL.to_vec()
    } else {
        vec![cli.task.into()]
    };

    let name = doc.name().to_string();
    let prepared = PreparedResume::prepare(doc, &config)
        .await
        .context("Failed to prepare resume")?;

    let mut history = AnalysisHistory::new();
    for task in tasks {
        let progress = (!cli.quiet).then(|| spinner(task));
        let result = prepared.ask(&job, task, &config).await;
        if let Some(bar) = progress {
            bar.finish_and_clear();
        }
        let output = result.with_context(|| format!("{} failed", task))?;

        if !cli.json {
            print_output(&output)?;
        }
        history.append(&name, output);
    }

    if cli.json {
        let json = if cli.all_tasks {
            serde_json::to_string_pretty(&history)
        } else {
            match history.latest() {
                Some(entry) => serde_json::to_string_pretty(&entry.output),
                None => Ok(String::from("null")),
            }
        }
        .context("Failed to serialise output")?;
        println!("{json}");
    }

    if !cli.quiet && !cli.json {
        let (input_tokens, output_tokens) = history.entries().iter().fold((0, 0), |acc, e| {
            (acc.0 + e.output.stats.input_tokens, acc.1 + e.output.stats.output_tokens)
        });
        eprintln!(
            "{}  {} {}  {} tokens in  /  {} tokens out",
            green("✔"),
            history.len(),
            if history.len() == 1 { "analysis" } else { "analyses" },
            dim(&input_tokens.to_string()),
            dim(&output_tokens.to_string()),
        );
    }

    Ok(())
}

fn spinner(task: AnalysisTask) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("Analysing");
    bar.set_message(task.label());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_output(output: &AnalysisOutput) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "## {}\n", output.task).context("Failed to write to stdout")?;
    if let Some(score) = output.score {
        writeln!(handle, "Match score: {}%\n", score).context("Failed to write to stdout")?;
    }
    handle
        .write_all(output.response.as_bytes())
        .context("Failed to write to stdout")?;
    if !output.response.ends_with('\n') {
        handle.write_all(b"\n").context("Failed to write to stdout")?;
    }
    writeln!(handle).context("Failed to write to stdout")?;
    Ok(())
}

async fn job_description(cli: &Cli) -> Result<String> {
    let text = match (&cli.job, &cli.job_text) {
        (Some(path), _) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read job description from {:?}", path))?,
        (None, Some(text)) => text.clone(),
        (None, None) => bail!("A job description is required: pass --job FILE or --job-text TEXT"),
    };
    if text.trim().is_empty() {
        bail!("The job description is empty");
    }
    Ok(text)
}

fn render_options(cli: &Cli) -> RenderOptions {
    RenderOptions {
        dpi: cli.dpi,
        jpeg_quality: cli.jpeg_quality,
        font_path: cli.font.clone(),
        search_system_fonts: !cli.no_system_fonts,
        ..RenderOptions::default()
    }
}

/// Map CLI args to `AnalysisConfig`.
async fn build_config(cli: &Cli, render: RenderOptions) -> Result<AnalysisConfig> {
    let mut builder = AnalysisConfig::builder()
        .render(render)
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref path) = cli.instruction {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read instruction from {:?}", path))?;
        builder = builder.instruction(text);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }

    builder.build().context("Invalid configuration")
}
