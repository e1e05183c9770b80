use anyhow::Context;
use pos_server::orders::summarize;
use pos_server::{PosState, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. .env, config, logging
    let (config, _log_guard) = setup_environment().context("failed to set up environment")?;

    tracing::info!(
        work_dir = %config.work_dir,
        environment = %config.environment,
        timezone = %config.business_timezone,
        "POS server starting"
    );

    // 2. Store and services
    let state = PosState::initialize(&config).context("failed to open database")?;

    // 3. Optional menu import
    match state.import_configured_menu() {
        Ok(Some(count)) => tracing::info!(items = count, "Menu replaced from import file"),
        Ok(None) => {}
        Err(e) => tracing::error!(error = %e, "Menu import failed, keeping current menu"),
    }

    // 4. Follow the live feeds until Ctrl-C
    let _tables = state.feeds.on_tables(|tables| {
        let summaries = summarize(tables);
        let occupied = summaries.iter().filter(|t| !t.deletable).count();
        tracing::info!(tables = summaries.len(), occupied, "Tables changed");
    })?;
    let _menu = state.feeds.on_menu(|menu| {
        tracing::info!(items = menu.len(), "Menu changed");
    })?;
    let _sales = state.feeds.on_recent_sales(|sales| {
        if let Some(latest) = sales.first() {
            tracing::info!(
                sale_id = %latest.id,
                table = %latest.table_name,
                total = %pos_server::utils::format_colones(latest.total),
                "Latest sale"
            );
        }
    })?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("Shutting down");

    Ok(())
}
