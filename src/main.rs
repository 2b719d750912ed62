use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use competitor_analysis::compare::{Comparator, ComparisonRequest};
use competitor_analysis::config::Config;
use competitor_analysis::report::{report_filename, split, PdfRenderer};
use competitor_analysis::server;

#[derive(Parser)]
#[command(
    name = "competitor-analysis",
    about = "Side-by-side company comparisons backed by a generative model"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Compare two companies from the terminal
    Compare {
        company_a: String,
        company_b: String,
        /// Model id; unknown ids fall back to gemini-2.5-flash
        #[arg(short, long)]
        model: Option<String>,
        /// Ground the answer in web search results
        #[arg(long)]
        web_search: bool,
        /// Also write the PDF report to this path
        #[arg(long)]
        pdf: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.port = port;
            }
            server::serve(config).await?;
        }
        Commands::Compare {
            company_a,
            company_b,
            model,
            web_search,
            pdf,
        } => {
            let comparator = Comparator::new(&config);
            let response = comparator
                .compare(ComparisonRequest {
                    company_a,
                    company_b,
                    model,
                    use_web_search: web_search,
                })
                .await
                .context("Comparison failed")?;

            let parts = split(&response.response_text);
            println!("\n{}\n", parts.table_markdown);
            if !parts.summary_text.is_empty() {
                println!("{}\n", parts.summary_text);
            }
            eprintln!("model: {} | {}", response.model, response.timestamp);

            if let Some(path) = pdf {
                let renderer = PdfRenderer::load(&config.pdf_font_dir, &config.pdf_font_family)?;
                let bytes = renderer.render(
                    &response.company_a,
                    &response.company_b,
                    &response.response_text,
                    response.model.as_str(),
                    chrono::Utc::now(),
                )?;
                let path = if path.is_empty() {
                    report_filename(&response.company_a, &response.company_b)
                } else {
                    path
                };
                std::fs::write(&path, bytes)
                    .with_context(|| format!("Failed to write PDF to {path}"))?;
                eprintln!("wrote {path}");
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
