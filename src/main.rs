use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::backend::{Backend, HttpBackend};
use storefront::config::Config;
use storefront::install::InstallOrchestrator;
use storefront::notify::{Notifier, Severity};
use storefront::pagination::{ListingPhase, PaginationEngine};
use storefront::scroll::ScrollTrigger;

/// Console client for the emporium service marketplace
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Registry base URL
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Search query (empty lists the server's default ordering)
    #[arg(short, long, default_value = "")]
    query: String,

    /// Maximum number of pages to fetch
    #[arg(long, default_value_t = 3)]
    pages: u32,

    /// Install the given service after listing
    #[arg(long, value_name = "SERVICE_ID")]
    install: Option<String>,

    /// Environment value for the install form, KEY=VALUE (repeatable)
    #[arg(long, value_name = "KEY=VALUE")]
    env: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_ref(), args.url.as_deref())?;
    info!("Using registry at {}", config.registry_url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;
    let backend: Arc<dyn Backend> =
        Arc::new(HttpBackend::with_client(&config.registry_url, client));

    let (notifier, mut notifications) = Notifier::channel();
    let engine = PaginationEngine::new(Arc::clone(&backend), notifier.clone());
    let trigger = ScrollTrigger::new(engine.clone());
    let mut updates = engine.subscribe();

    // Page through the listing, driving the engine through the same manual
    // "load more" control the UI uses.
    engine.reset(args.query.clone());
    let mut fetched_pages = 0;
    let failed = loop {
        updates.changed().await?;
        let snap = updates.borrow_and_update().clone();
        match snap.phase {
            ListingPhase::Loaded => {
                fetched_pages += 1;
                if !snap.has_more || fetched_pages >= args.pages {
                    break false;
                }
                trigger.load_more();
            }
            ListingPhase::Error => break true,
            _ => {}
        }
    };

    let snap = engine.snapshot();
    let total = snap
        .total_count
        .map(|t| format!(" of {}", t))
        .unwrap_or_default();
    println!("Found {} service(s){}:\n", snap.services.len(), total);
    for svc in &snap.services {
        let verified = if svc.is_verified { " [verified]" } else { "" };
        println!("  - {} ({}){}", svc.name, svc.id, verified);
        println!("    {}", svc.description);
        println!(
            "    Author: {}, Platform: {}, Downloads: {}",
            svc.author, svc.platform, svc.downloads
        );
        println!();
    }

    if let Some(service_id) = &args.install {
        let installer = InstallOrchestrator::new(Arc::clone(&backend), notifier);
        let service = snap
            .services
            .iter()
            .find(|s| &s.id == service_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("service {} not in the listing", service_id))?;

        installer.open(&service).await;
        for pair in &args.env {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| anyhow::anyhow!("--env expects KEY=VALUE, got {:?}", pair))?;
            if let Some(error) = installer.set_field(key, value) {
                println!("  {}: {}", key, error);
            }
        }

        if !installer.can_submit() {
            for field in installer.fields() {
                if field.required && field.value.trim().is_empty() {
                    println!("  missing required field: {}", field.label);
                }
            }
            drain_notifications(&mut notifications);
            anyhow::bail!("install form incomplete for {}", service_id);
        }

        installer.submit().await;
    }

    drain_notifications(&mut notifications);
    if failed {
        anyhow::bail!("listing failed");
    }
    Ok(())
}

fn drain_notifications(
    notifications: &mut tokio::sync::mpsc::UnboundedReceiver<storefront::notify::Notification>,
) {
    while let Ok(note) = notifications.try_recv() {
        match note.severity {
            Severity::Success => println!("ok: {}", note.message),
            Severity::Error => println!("error: {}", note.message),
        }
    }
}
