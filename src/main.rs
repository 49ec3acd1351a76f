use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use chesstime::aggregator::{self, PerfTable};
use chesstime::archive::MonthRange;
use chesstime::cli::Cli;
use chesstime::config::Config;
use chesstime::remote::{self, ArchiveSource, ChessComClient};
use chesstime::report;
use chesstime::tz::Zone;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    chesstime::logging::init(args.verbose);

    let cfg = Config::load(&args.config)?;
    // pick zone: CLI override > config
    let zone: Zone = match args.tz {
        Some(z) => z,
        None => cfg
            .timezone
            .parse()
            .with_context(|| format!("timezone in {}", args.config.display()))?,
    };
    let client = ChessComClient::new(&cfg).context("building HTTP client")?;

    let range = MonthRange {
        start: args.since,
        end: args.until,
        excludes: args.excludes.clone(),
    };

    if args.list {
        let selected = remote::select_archives(&client, &args.user, &range, args.switch_at)?;
        for archive in &selected {
            println!("{} {}", archive.month(), archive.url());
        }
        return Ok(());
    }

    let table = match (args.switch_at, args.tz_after) {
        (Some(switch), Some(zone_after)) => {
            let (before, after) = range.split_at(switch);
            info!("timezone switch on {}: {} -> {}", switch, zone, zone_after);
            let a = run(&client, &args.user, &before, &cfg.time_classes, zone)?;
            let b = run(&client, &args.user, &after, &cfg.time_classes, zone_after)?;
            report::mean(&a, &b)
        }
        _ => run(&client, &args.user, &range, &cfg.time_classes, zone)?,
    };

    if args.out == Path::new("-") {
        report::write_perf(&table, std::io::stdout().lock())?;
    } else {
        report::write_perf_file(&table, &args.out)
            .with_context(|| format!("writing {}", args.out.display()))?;
        info!("wrote {}", args.out.display());
    }
    Ok(())
}

fn run<S: ArchiveSource + ?Sized>(
    source: &S,
    user: &str,
    range: &MonthRange,
    time_classes: &[String],
    zone: Zone,
) -> anyhow::Result<PerfTable> {
    let stream = remote::all_games(source, user, range)
        .with_context(|| format!("resolving archives for {user}"))?;
    let table = aggregator::aggregate(stream, user, time_classes, zone)
        .with_context(|| format!("aggregating games for {user}"))?;
    Ok(table)
}
