use anyhow::Result;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use gun_iq::config::{Config, FetchStrategy};
use gun_iq::metrics;
use gun_iq::pricing::PriceStatus;
use gun_iq::selection::LoadoutSnapshot;
use gun_iq::session::Session;
use tracing::info;

/// Execute the loadout command
///
/// Selects the firearm, waits for every attachment price, then toggles the
/// requested attachments and prints the build with its total.
pub async fn execute(
    cfg: &Config,
    firearm: &str,
    attachments: &[String],
    concurrent: bool,
    show_metrics: bool,
) -> Result<()> {
    let mut cfg = cfg.clone();
    if concurrent {
        cfg.pricing.strategy = FetchStrategy::Concurrent;
    }

    let metrics_handle = if show_metrics {
        Some(metrics::init_metrics()?)
    } else {
        None
    };

    let session = Session::from_config(&cfg)?;

    println!("{}", format!("Fetching attachment prices for {}...", firearm).bright_black());
    let snapshot = session.select_firearm(firearm).await?;

    for requested in attachments {
        let name = resolve_attachment_name(&snapshot, requested);
        session.toggle_attachment(&name).await?;
    }

    let snapshot = session.snapshot().await;
    info!(
        total = %snapshot.total,
        selected = snapshot.attachments.iter().filter(|a| a.selected).count(),
        "Loadout priced"
    );

    print_loadout(&snapshot);

    if let Some(handle) = metrics_handle {
        println!();
        println!("{}", handle.render());
    }
    Ok(())
}

/// Match a user-typed attachment name case-insensitively
fn resolve_attachment_name(snapshot: &LoadoutSnapshot, requested: &str) -> String {
    let needle = requested.trim().to_lowercase();
    snapshot
        .attachments
        .iter()
        .find(|a| a.attachment.name.to_lowercase() == needle)
        .map(|a| a.attachment.name.clone())
        .unwrap_or_else(|| requested.to_string())
}

fn print_loadout(snapshot: &LoadoutSnapshot) {
    let Some(firearm) = &snapshot.firearm else {
        return;
    };

    println!();
    println!("{}", format!("{} Loadout Builder", firearm.name).yellow().bold());
    println!(
        "Caliber: {}    Base Price: {}",
        firearm.caliber, firearm.base_price
    );
    println!();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("").fg(Color::Yellow),
        Cell::new("ATTACHMENT").fg(Color::Yellow),
        Cell::new("TYPE").fg(Color::Yellow),
        Cell::new("LIVE PRICE").fg(Color::Yellow),
    ]);

    for row in &snapshot.attachments {
        let marker = if row.selected {
            Cell::new("✓").fg(Color::Green)
        } else {
            Cell::new("")
        };

        let price = match row.status {
            PriceStatus::Available(price) => Cell::new(price.to_string()).fg(Color::Green),
            PriceStatus::Unavailable => Cell::new("Unavailable").fg(Color::Red),
            PriceStatus::Loading => Cell::new("Loading...").fg(Color::DarkGrey),
        };

        table.add_row(vec![
            marker,
            Cell::new(&row.attachment.name),
            Cell::new(&row.attachment.category),
            price,
        ]);
    }

    println!("{}", table);
    println!();
    println!(
        "{}",
        format!("Total Loadout Price: {}", snapshot.total).green().bold()
    );
}
