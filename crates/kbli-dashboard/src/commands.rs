//! Command implementations for the dashboard CLI.
//!
//! Each view renders the current snapshot as plain text (or JSON with
//! `--json`). A view whose source table failed to load prints a
//! "data unavailable" notice instead of failing the whole command.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use kbli_index::ClusterMember;
use kbli_service::{DashboardService, ExportView, ServiceError, Snapshot};
use kbli_types::Settings;

use crate::cli::{Cli, Commands};

/// Output format for views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Load configuration and apply CLI overrides (highest precedence).
pub fn load_settings(
    config_path: Option<&str>,
    data_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;

    if let Some(data_dir) = data_dir_override {
        settings.data_dir = data_dir.to_string();
    }
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    Ok(settings)
}

/// Initialize logging to stderr; `RUST_LOG` takes precedence over settings.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Run one CLI invocation end to end.
pub fn run(cli: Cli) -> Result<()> {
    let settings = load_settings(
        cli.config.as_deref(),
        cli.data_dir.as_deref(),
        cli.log_level.as_deref(),
    )?;
    init_logging(&settings)?;

    let format = if cli.json { Format::Json } else { Format::Text };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Commands::Config = cli.command {
        return show_config(&settings, &mut out);
    }

    info!(data_dir = %settings.expanded_data_dir().display(), "Opening dashboard");
    let service = DashboardService::open(settings).context("Failed to open dashboard")?;
    let snapshot = service.snapshot();

    let result = execute(&snapshot, cli.command, format, &mut out);
    report_unavailable(result, &mut out)
}

/// Dispatch a view command against a snapshot.
pub fn execute<W: Write>(
    snapshot: &Snapshot,
    command: Commands,
    format: Format,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Summary => show_summary(snapshot, format, out),
        Commands::Clusters => show_clusters(snapshot, format, out),
        Commands::Cluster { name } => show_cluster(snapshot, name.as_deref(), format, out),
        Commands::Multi { flagged } => show_multi(snapshot, flagged, format, out),
        Commands::Single => show_single(snapshot, format, out),
        Commands::Cooccurrence { top } => show_cooccurrence(snapshot, top, format, out),
        Commands::Search { query } => show_search(snapshot, &query, format, out),
        Commands::Unclassified => show_unclassified(snapshot, format, out),
        Commands::Jobs { cluster } => show_jobs(snapshot, cluster.as_deref(), format, out),
        Commands::Export { view, arg, output } => {
            let view: ExportView = view.parse()?;
            let written = match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    let written = view.export(snapshot, arg.as_deref(), BufWriter::new(file))?;
                    writeln!(out, "Exported {written} records to {}", path.display())?;
                    written
                }
                None => view.export(snapshot, arg.as_deref(), &mut *out)?,
            };
            debug!(view = %view, written, "Export finished");
            Ok(())
        }
        Commands::Config => anyhow::bail!("config is handled before the snapshot is opened"),
    }
}

/// Turn an unavailable-table error into a notice; propagate anything else.
pub fn report_unavailable<W: Write>(result: Result<()>, out: &mut W) -> Result<()> {
    if let Err(err) = &result {
        if let Some(service_err) = err.downcast_ref::<ServiceError>() {
            if service_err.is_unavailable() {
                writeln!(out, "{service_err}")?;
                writeln!(out, "This view is disabled until the table loads.")?;
                return Ok(());
            }
        }
    }
    result
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn show_config<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    let rendered = toml::to_string_pretty(settings).context("Failed to render settings")?;
    write!(out, "{rendered}")?;
    Ok(())
}

pub fn show_summary<W: Write>(snapshot: &Snapshot, format: Format, out: &mut W) -> Result<()> {
    let summary = snapshot.summary();
    if format == Format::Json {
        return print_json(out, &summary);
    }

    let count = |value: Option<usize>| {
        value
            .map(|v| v.to_string())
            .unwrap_or_else(|| "unavailable".to_string())
    };

    writeln!(out, "KBLI Cluster Dashboard (snapshot v{})", summary.version)?;
    writeln!(out, "Loaded at: {}", summary.loaded_at.to_rfc3339())?;
    writeln!(out)?;
    writeln!(out, "Total KBLI in clusters: {}", count(summary.assignment_rows))?;
    writeln!(out, "Total KBLI reference:   {}", count(summary.reference_rows))?;
    writeln!(out, "Total UMKM jobs:        {}", count(summary.jobs))?;
    writeln!(out)?;

    writeln!(out, "Tables:")?;
    for status in &summary.tables {
        match (&status.version, &status.error) {
            (Some(version), _) => writeln!(
                out,
                "  {:<13} ok       {} rows  [{}]",
                status.table.as_str(),
                version.rows,
                version.short_hash()
            )?,
            (None, error) => writeln!(
                out,
                "  {:<13} missing  {}",
                status.table.as_str(),
                error.as_deref().unwrap_or("unknown error")
            )?,
        }
    }

    if let Some(stats) = &summary.index {
        writeln!(out)?;
        writeln!(out, "Membership index:")?;
        writeln!(out, "  Codes:          {}", stats.codes)?;
        writeln!(out, "  Clusters:       {}", stats.clusters)?;
        writeln!(out, "  Multi-cluster:  {}", stats.multi)?;
        writeln!(out, "  Single-cluster: {}", stats.single)?;
        writeln!(
            out,
            "  Flagged (>= {} clusters): {}",
            snapshot.config().review_threshold,
            stats.flagged
        )?;
        writeln!(out, "  Dropped rows:   {}", stats.dropped_rows)?;
        if stats.multi == 0 {
            writeln!(out, "  Every code belongs to exactly one cluster: fully consistent.")?;
        }
    }
    Ok(())
}

pub fn show_clusters<W: Write>(snapshot: &Snapshot, format: Format, out: &mut W) -> Result<()> {
    let clusters = snapshot.clusters()?;
    if format == Format::Json {
        return print_json(out, &clusters);
    }

    if clusters.is_empty() {
        writeln!(out, "No clusters found")?;
        return Ok(());
    }
    for (cluster, codes) in &clusters {
        writeln!(out, "{codes:>6}  {cluster}")?;
    }
    writeln!(out, "Total clusters: {}", clusters.len())?;
    Ok(())
}

fn write_member<W: Write>(out: &mut W, member: &ClusterMember, placeholder: &str) -> Result<()> {
    writeln!(out, "{} - {}", member.code, member.title)?;
    writeln!(
        out,
        "    Description: {}",
        member.description.as_deref().unwrap_or(placeholder)
    )?;
    if member.is_multi() {
        writeln!(out, "    Clusters: {}", member.clusters.join(", "))?;
    }
    Ok(())
}

pub fn show_cluster<W: Write>(
    snapshot: &Snapshot,
    cluster: Option<&str>,
    format: Format,
    out: &mut W,
) -> Result<()> {
    let listing = snapshot.cluster_listing(cluster)?;
    if format == Format::Json {
        return print_json(out, &listing);
    }

    writeln!(out, "KBLI - Cluster: {}", listing.cluster)?;
    if listing.is_empty() {
        writeln!(out, "No data for the selected cluster")?;
        return Ok(());
    }

    let placeholder = &snapshot.labels().unavailable;
    for member in &listing.members {
        write_member(out, member, placeholder)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "KBLI codes: {} | Total clusters: {}",
        listing.len(),
        snapshot.index()?.clusters().len()
    )?;
    Ok(())
}

pub fn show_multi<W: Write>(
    snapshot: &Snapshot,
    flagged_only: bool,
    format: Format,
    out: &mut W,
) -> Result<()> {
    let entries = snapshot.multi(flagged_only)?;
    if format == Format::Json {
        return print_json(out, &entries);
    }

    let threshold = snapshot.config().review_threshold;
    if entries.is_empty() {
        if flagged_only {
            writeln!(out, "No codes with {threshold} or more clusters")?;
        } else {
            writeln!(
                out,
                "No multi-cluster codes: every code belongs to exactly one cluster (fully consistent)"
            )?;
        }
        return Ok(());
    }

    for entry in &entries {
        let marker = if entry.is_flagged(threshold) { "  [review]" } else { "" };
        writeln!(
            out,
            "{} - {} ({} clusters){marker}",
            entry.code,
            entry.title,
            entry.count()
        )?;
        writeln!(out, "    {}", entry.clusters.join(", "))?;
    }
    writeln!(out)?;
    writeln!(out, "Multi-cluster codes: {}", entries.len())?;
    Ok(())
}

pub fn show_single<W: Write>(snapshot: &Snapshot, format: Format, out: &mut W) -> Result<()> {
    let entries = snapshot.single()?;
    if format == Format::Json {
        return print_json(out, entries);
    }

    if entries.is_empty() {
        writeln!(out, "No single-cluster codes")?;
        return Ok(());
    }
    for entry in entries {
        writeln!(out, "{} - {}  [{}]", entry.code, entry.title, entry.cluster)?;
    }
    writeln!(out)?;
    writeln!(out, "Single-cluster codes: {}", entries.len())?;
    Ok(())
}

pub fn show_cooccurrence<W: Write>(
    snapshot: &Snapshot,
    top: Option<usize>,
    format: Format,
    out: &mut W,
) -> Result<()> {
    let report = snapshot.cooccurrence()?;
    let pairs = match top {
        Some(n) => report.top(n),
        None => report.pairs(),
    };
    if format == Format::Json {
        return print_json(out, pairs);
    }

    if pairs.is_empty() {
        writeln!(out, "No co-occurring clusters: no code spans two clusters")?;
        return Ok(());
    }
    for (rank, p) in pairs.iter().enumerate() {
        writeln!(
            out,
            "{:>3}. {} + {}: {}",
            rank + 1,
            p.pair.first,
            p.pair.second,
            p.count
        )?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "Pairs: {} | Total co-occurrences: {} | Multi-cluster codes: {}",
        report.pairs().len(),
        report.total(),
        report.entries()
    )?;
    Ok(())
}

pub fn show_search<W: Write>(
    snapshot: &Snapshot,
    query: &str,
    format: Format,
    out: &mut W,
) -> Result<()> {
    let hits = snapshot.search(query)?;
    if format == Format::Json {
        return print_json(out, &hits);
    }

    if hits.is_empty() {
        writeln!(out, "No results for '{query}'")?;
        return Ok(());
    }

    writeln!(out, "Found {} results for '{query}'", hits.len())?;
    let placeholder = &snapshot.labels().unavailable;
    for hit in &hits {
        writeln!(out, "{} - {}", hit.code, hit.title)?;
        writeln!(
            out,
            "    Description: {}",
            hit.description.as_deref().unwrap_or(placeholder)
        )?;
        if hit.clusters.len() > 1 {
            writeln!(out, "    Cluster: {}", hit.clusters.join(", "))?;
        } else {
            writeln!(out, "    Cluster: {}", hit.cluster)?;
        }
    }
    Ok(())
}

pub fn show_unclassified<W: Write>(snapshot: &Snapshot, format: Format, out: &mut W) -> Result<()> {
    let report = snapshot.unclassified()?;
    if format == Format::Json {
        return print_json(out, &report);
    }

    let placeholder = &snapshot.labels().unavailable;
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| placeholder.clone());

    writeln!(out, "Resolved:")?;
    if report.resolved.is_empty() {
        writeln!(out, "  No jobs were resolved")?;
    }
    for row in &report.resolved {
        writeln!(out, "  {} - {}", text(&row.code), text(&row.title))?;
        writeln!(out, "      UMKM job: {}", text(&row.job))?;
        writeln!(out, "      KBLI description: {}", text(&row.description))?;
    }

    writeln!(out)?;
    writeln!(out, "Not found:")?;
    if report.not_found.is_empty() {
        writeln!(out, "  Every job was resolved")?;
    }
    for row in &report.not_found {
        writeln!(out, "  * {}", text(&row.job))?;
        writeln!(
            out,
            "      Status: {} | Cluster: {}",
            text(&row.code),
            text(&row.cluster)
        )?;
        writeln!(out, "      Needs manual classification")?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Total: {} | Resolved: {} | Not found: {} | Success rate: {:.1}%",
        report.total(),
        report.resolved.len(),
        report.not_found.len(),
        report.success_rate()
    )?;
    Ok(())
}

pub fn show_jobs<W: Write>(
    snapshot: &Snapshot,
    cluster: Option<&str>,
    format: Format,
    out: &mut W,
) -> Result<()> {
    let report = snapshot.jobs()?;
    let cluster = cluster
        .or_else(|| report.clusters().first().map(String::as_str))
        .unwrap_or("");
    let selection = report.select(cluster);
    if format == Format::Json {
        return print_json(out, &selection);
    }

    writeln!(out, "UMKM jobs - Cluster: {}", selection.cluster)?;
    if selection.is_empty() {
        writeln!(out, "No jobs for the selected cluster")?;
    } else {
        for row in &selection.jobs {
            writeln!(out, "  * {}", row.job.as_deref().unwrap_or_default())?;
        }
        writeln!(
            out,
            "Jobs: {} | Total clusters: {} | Share: {:.1}%",
            selection.len(),
            report.clusters().len(),
            selection.share
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Overall:")?;
    writeln!(out, "  Total UMKM jobs:     {}", report.total_jobs())?;
    writeln!(out, "  Total clusters:      {}", report.clusters().len())?;
    writeln!(out, "  Unclassified:        {}", report.unclassified())?;
    writeln!(
        out,
        "  Classification rate: {:.1}%",
        report.classification_rate()
    )?;
    Ok(())
}
