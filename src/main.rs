use anyhow::{Context, Result};
use clap::Parser;
use sarctransform::{config::Cli, known_releases, output, scan_sarcs, SchoolDirectory};
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging (stderr; stdout carries the result) ─────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sarctransform=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(io::stderr)
        .init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) resolve the school ───────────────────────────────────────
    let cli = Cli::parse();
    let schools = SchoolDirectory::default();
    let school = match cli.school.as_deref().or_else(|| schools.default_alias()) {
        Some(s) => s.to_string(),
        None => anyhow::bail!("no school given and the alias table is empty"),
    };
    let cds_code = schools.resolve(&school)?;
    let data_dir = cli.data_dir();
    info!(%school, %cds_code, data_dir = %data_dir.display(), "startup");

    // ─── 3) scan every release and merge ─────────────────────────────
    let releases = known_releases();
    let series = scan_sarcs(&releases, &data_dir, &cds_code)
        .with_context(|| format!("scanning SARC releases for {}", school))?;

    // ─── 4) print ────────────────────────────────────────────────────
    output::render(&series, cli.format, io::stdout().lock())?;
    info!(fields = series.len(), "all done");
    Ok(())
}
