//! windlytics entry point: CLI wiring and config-driven run construction.

use std::path::Path;
use std::process;

use chrono::Local;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use windlytics::cli::Cli;
use windlytics::config::{self, AppConfig};
use windlytics::geo;
use windlytics::io::export::export_series_csv;
use windlytics::service::http::HttpServiceClient;
use windlytics::session::{MapSession, SiteList};
use windlytics::sim::aggregate::ResultAggregator;
use windlytics::sim::orchestrator::Orchestrator;
use windlytics::view::{ResultsView, ViewContent};

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn load_config(cli: &Cli) -> AppConfig {
    // --config takes priority, then --preset, then the nova_scotia default
    let loaded = if let Some(ref path) = cli.source.config {
        AppConfig::from_toml_file(path)
    } else if let Some(ref name) = cli.source.preset {
        AppConfig::from_preset(name)
    } else {
        Ok(AppConfig::default())
    };
    let mut cfg = loaded.unwrap_or_else(|e| fail(e));

    if let Err(e) = cfg.apply_env_overrides() {
        fail(e);
    }

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli);
    let period = cli
        .period
        .period(Local::now().date_naive())
        .unwrap_or_else(|e| fail(e));

    let client = HttpServiceClient::from_config(&cfg.service).unwrap_or_else(|e| fail(e));
    let mut session = MapSession::from_config(&cfg);

    let sites = SiteList::from_toml_file(&cli.sites).unwrap_or_else(|e| fail(e));
    session.replay(&sites).unwrap_or_else(|e| fail(e));

    if let Some(area) = cli.area {
        let estimate = area.approx_area_km2();
        println!(
            "Area: {:.1} km x {:.1} km ({:.1} km2)",
            estimate.width_km, estimate.height_km, estimate.area_km2
        );
        if let Some(ref path) = cli.places {
            let places = config::load_places(path).unwrap_or_else(|e| fail(e));
            for place in geo::places_within(&area, &places) {
                println!("  {} ({:.4}, {:.4})", place.name, place.lat, place.lng);
            }
        }
        if let Some(count) = cli.generate {
            session.select_area(area).unwrap_or_else(|e| fail(e));
            let added = session
                .generate_in_selection(&client, count, cli.generate_model.as_deref())
                .unwrap_or_else(|e| fail(format!("placement generation failed: {e}")));
            println!("Generated {} placements", added.len());
        }
    }

    let orchestrator = Orchestrator::new(&client, cfg.catalog());
    let aggregator = ResultAggregator::new(cfg.pricing.price_per_mwh);
    let mut view = ResultsView::new();
    let outcome = orchestrator
        .run(session.store_mut(), &period, &mut view)
        .unwrap_or_else(|e| fail(e));

    for message in view.notifications().iter() {
        eprintln!("{message}");
    }
    if let Some(e) = outcome.partial_failure() {
        warn!("{e}");
    }

    let placements = session.store().snapshot();
    for p in &placements {
        let zones: Vec<&str> = session
            .zones_at(p.id)
            .map(|z| z.iter().map(|zone| zone.name.as_str()).collect())
            .unwrap_or_default();
        let model = p.turbine_type.as_deref().unwrap_or("-");
        let status = match (aggregator.summary(p), p.result.as_ref().and_then(|r| r.error())) {
            (Some(summary), _) => summary.to_string(),
            (None, Some(error)) => format!("failed: {error}"),
            (None, None) => "not simulated".to_string(),
        };
        let banks = if zones.is_empty() {
            String::new()
        } else {
            format!(" [on {}]", zones.join(", "))
        };
        println!("Turbine {} ({:.4}, {:.4}) {model}: {status}{banks}", p.id, p.lat, p.lng);
    }

    view.toggle_comparison();
    if let Some(ViewContent::Comparison(comparison)) = view.render(&placements, &aggregator) {
        println!("\nTotal: {}", comparison.aggregate);

        if let Some(ref path) = cli.series_out {
            if let Err(e) = export_series_csv(&comparison.series, Path::new(path)) {
                fail(format!("failed to write CSV: {e}"));
            }
            eprintln!("Series written to {}", path.display());
        }
    } else {
        eprintln!("No placement has a turbine model; nothing was simulated.");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(windlytics::api::AppState {
            placements,
            aggregator,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(windlytics::api::serve(state, addr)) {
            fail(format!("server error: {e}"));
        }
    }
}
