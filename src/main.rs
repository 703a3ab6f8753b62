use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use somatic_triage::annotate::report::{summarize, AnnotationSummary};
use somatic_triage::annotate::{AnnotatedVariant, Annotator, RestAnnotator};
use somatic_triage::config::{Config, ConfigOverrides};
use somatic_triage::criteria::{load_criteria, validate_against_schema};
use somatic_triage::engine::{evaluate_record, RunStatistics, Verdict};
use somatic_triage::output::csv::{annotations_to_csv, statistics_to_csv};
use somatic_triage::output::render_json;
use somatic_triage::output::table::{
    render_annotations_table, render_statistics_table, render_summary_table,
};
use somatic_triage::vcf::reader::VcfReader;
use somatic_triage::vcf::writer::VcfWriter;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "somatic-triage",
    about = "Criteria-driven filtering and annotation for tumor-only variant calls"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short = 'C', long)]
    criteria: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Evaluate every record against the criteria and write survivors
    Filter {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long = "keep-review")]
        keep_review: Option<bool>,
    },
    /// Annotate PASS records with gene/disease metadata
    Annotate {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Filter, then annotate the passing records
    Run {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[derive(Debug, Serialize)]
struct AnnotationReport {
    variants: Vec<AnnotatedVariant>,
    summary: AnnotationSummary,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let keep_review = match &cli.command {
        Commands::Filter { keep_review, .. } => *keep_review,
        _ => None,
    };
    config.apply_overrides(ConfigOverrides {
        criteria_path: cli.criteria.as_ref().map(|p| p.display().to_string()),
        keep_review_records: keep_review,
    });

    match &cli.command {
        Commands::Config { init, show } => {
            if *init {
                Config::write_template(&config_path)?;
                println!("Wrote config template to {}", config_path.display());
            }
            if *show || !*init {
                println!("{}", render_json(&config)?);
            }
        }
        Commands::Filter { input, out, .. } => {
            let stats = run_filter(input, out, &config)?;
            print_statistics(&stats, cli.output)?;
        }
        Commands::Annotate {
            input,
            report,
            limit,
        } => {
            let annotator = RestAnnotator::new(config.annotation.clone());
            let variants = run_annotate(input, &annotator, &config, *limit).await?;
            print_annotations(&variants, report.as_deref(), cli.output)?;
        }
        Commands::Run { input, out, report } => {
            let stats = run_filter(input, out, &config)?;
            print_statistics(&stats, cli.output)?;
            let annotator = RestAnnotator::new(config.annotation.clone());
            let variants = run_annotate(out, &annotator, &config, None).await?;
            print_annotations(&variants, report.as_deref(), cli.output)?;
        }
    }

    Ok(())
}

fn run_filter(input: &Path, out: &Path, config: &Config) -> Result<RunStatistics> {
    let criteria = load_criteria(Path::new(&config.criteria.path))?;
    info!(
        "loaded {} criteria from {} (sha256 {})",
        criteria.criteria.len(),
        criteria.source,
        &criteria.raw_hash[..12]
    );

    let mut reader = VcfReader::from_path(input)
        .with_context(|| format!("failed opening input VCF: {}", input.display()))?;
    validate_against_schema(&criteria, &reader.header().info)?;

    let mut writer = VcfWriter::create(out)
        .with_context(|| format!("failed creating output VCF: {}", out.display()))?;
    let review_marker = config.filter.review_marker.clone();
    let declarations: Vec<(&str, &str)> = if config.filter.keep_review_records {
        vec![(
            review_marker.as_str(),
            "One or more filter criteria could not be evaluated",
        )]
    } else {
        Vec::new()
    };
    writer.write_header(reader.header(), &declarations)?;

    let schema = reader.header().info.clone();
    let mut stats = RunStatistics::default();
    for record in &mut reader {
        let record = record?;
        let verdict = evaluate_record(&record, &criteria, &schema);
        stats.observe(&verdict);
        match verdict.status {
            Verdict::Pass => writer.write_record(&record, "PASS")?,
            Verdict::Review if config.filter.keep_review_records => {
                writer.write_record(&record, &review_marker)?;
            }
            Verdict::Review | Verdict::Fail => {}
        }
    }
    writer.flush()?;
    info!(
        "processed {} records, {} passed, {} flagged for review",
        stats.total_seen, stats.total_passed, stats.total_review
    );
    Ok(stats)
}

async fn run_annotate(
    input: &Path,
    annotator: &dyn Annotator,
    config: &Config,
    limit: Option<usize>,
) -> Result<Vec<AnnotatedVariant>> {
    let reader = VcfReader::from_path(input)
        .with_context(|| format!("failed opening VCF: {}", input.display()))?;
    let delay = Duration::from_millis(config.annotation.request_delay_ms);
    let mut variants = Vec::new();
    for record in reader {
        let record = record?;
        if record.filter != "PASS" {
            continue;
        }
        if limit.is_some_and(|limit| variants.len() >= limit) {
            break;
        }
        info!(
            "annotating {} {}>{}",
            record.coordinate(),
            record.reference,
            record.alts.join(",")
        );
        match annotator.annotate(&record).await {
            Ok(variant) => variants.push(variant),
            Err(error) => warn!("annotation failed for {}: {error}", record.coordinate()),
        }
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
    info!("annotated {} passing variants", variants.len());
    Ok(variants)
}

fn print_statistics(stats: &RunStatistics, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_statistics_table(stats)),
        OutputFormat::Json => println!("{}", render_json(stats)?),
        OutputFormat::Csv => println!("{}", statistics_to_csv(stats)?),
    }
    Ok(())
}

fn print_annotations(
    variants: &[AnnotatedVariant],
    report_path: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let summary = summarize(variants);
    if let Some(path) = report_path {
        std::fs::write(path, annotations_to_csv(variants)?)
            .with_context(|| format!("failed writing report: {}", path.display()))?;
        info!("wrote annotation report to {}", path.display());
    }
    match format {
        OutputFormat::Table => {
            println!("{}", render_annotations_table(variants));
            println!("{}", render_summary_table(&summary));
        }
        OutputFormat::Json => {
            let report = AnnotationReport {
                variants: variants.to_vec(),
                summary,
            };
            println!("{}", render_json(&report)?);
        }
        OutputFormat::Csv => println!("{}", annotations_to_csv(variants)?),
    }
    Ok(())
}
