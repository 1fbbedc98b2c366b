mod emit;
mod normalize;
mod records;
mod settings;
mod site;
mod template;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use settings::{Overrides, Settings};

#[derive(Parser)]
#[command(name = "demo_sites", about = "Generate demo landing pages from a leads table")]
struct Cli {
    #[command(flatten)]
    paths: PathArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct PathArgs {
    /// Page template [env: DEMO_TEMPLATE] [default: template/index.html]
    #[arg(long, global = true)]
    template: Option<PathBuf>,
    /// Leads table [env: DEMO_INPUT] [default: leads.csv]
    #[arg(long, global = true)]
    input: Option<PathBuf>,
    /// Output root [env: DEMO_OUTPUT] [default: output]
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Column delimiter of the leads table [env: DEMO_DELIMITER] [default: ,]
    #[arg(long, global = true)]
    delimiter: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one page per valid row (the default)
    Generate {
        /// Year shown in the page footer (default: current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show the slug each row would get, without writing anything
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let settings = Settings::load(&Overrides {
        template: cli.paths.template,
        input: cli.paths.input,
        output: cli.paths.output,
        delimiter: cli.paths.delimiter,
    })?;
    info!(
        template = %settings.template.display(),
        input = %settings.input.display(),
        output = %settings.output.display(),
        "Settings resolved"
    );

    match cli.command.unwrap_or(Commands::Generate { year: None }) {
        Commands::Generate { year } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let stats = site::generate(&settings, year)?;
            println!(
                "Generated {} demo site(s) into {}/",
                stats.generated,
                settings.output.display()
            );
        }
        Commands::List { limit } => {
            let planned = site::plan(&settings)?;
            if planned.is_empty() {
                println!("No rows in {}.", settings.input.display());
                return Ok(());
            }

            println!(
                "{:>4} | {:<28} | {:<16} | {:<40}",
                "Row", "Business", "City", "Slug"
            );
            println!("{}", "-".repeat(97));

            for p in planned.iter().take(limit) {
                let slug = p.slug.as_deref().unwrap_or("(skipped)");
                println!(
                    "{:>4} | {:<28} | {:<16} | {:<40}",
                    p.row,
                    cell(&p.business_name, 28),
                    cell(&p.city, 16),
                    slug
                );
            }

            let valid = planned.iter().filter(|p| p.slug.is_some()).count();
            println!(
                "\n{} rows | {} would be generated | {} skipped",
                planned.len(),
                valid,
                planned.len() - valid
            );
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", elapsed_label(elapsed));
    }

    Ok(())
}

/// Fit `s` into a table column of `width` chars, marking cuts with `…`.
fn cell(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn elapsed_label(d: Duration) -> String {
    match d.as_secs() {
        s if s < 60 => format!("{:.1}s", d.as_secs_f64()),
        s => format!("{}m {:02}s", s / 60, s % 60),
    }
}
