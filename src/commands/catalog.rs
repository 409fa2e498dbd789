use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use gun_iq::config::Config;
use gun_iq::session::Session;
use tracing::info;

/// Execute the catalog command
pub async fn execute(cfg: &Config, search: Option<String>) -> Result<()> {
    let session = Session::from_config(cfg)?;
    if let Some(query) = search {
        session.set_search(query).await;
    }

    let firearms = session.visible_firearms().await;
    info!(matches = firearms.len(), "Catalog listed");

    if firearms.is_empty() {
        println!("No firearms match \"{}\"", session.search().await);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("FIREARM").fg(Color::Yellow),
        Cell::new("CALIBER").fg(Color::Yellow),
        Cell::new("BASE PRICE").fg(Color::Yellow),
        Cell::new("ATTACHMENTS").fg(Color::Yellow),
    ]);

    for firearm in &firearms {
        let attachments = firearm
            .attachments
            .iter()
            .map(|a| format!("{} ({})", a.name, a.category))
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            Cell::new(&firearm.name),
            Cell::new(&firearm.caliber),
            Cell::new(firearm.base_price.to_string()),
            Cell::new(attachments),
        ]);
    }

    println!("{}", table);
    Ok(())
}
