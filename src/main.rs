use anyhow::Result;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use zonecomps::{
    load_sales, summarize, ImprovedCriteria, LandCriteria, MarketConfig,
};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) config ───────────────────────────────────────────────────
    let cfg = match env::var("ZONECOMPS_CONFIG") {
        Ok(path) => {
            info!(path = %path, "loading config");
            MarketConfig::from_yaml_file(&path)?
        }
        Err(_) => MarketConfig::default(),
    };
    let zones = cfg.market_zones();
    if zones.is_empty() {
        warn!("no market zones configured; every filter will come back empty");
    }
    let zone_list: Vec<&str> = zones.iter().collect();
    info!(zones = ?zone_list, data = %cfg.data_path.display(), "startup");

    // ─── 3) load + normalize ─────────────────────────────────────────
    let table = load_sales(&cfg.data_path, &cfg.load)?;

    // ─── 4) filter + summarize ───────────────────────────────────────
    let improved = table.improved(&ImprovedCriteria {
        zones: zones.clone(),
        ..ImprovedCriteria::default()
    })?;
    let land = table.land(&LandCriteria {
        zones,
        ..LandCriteria::default()
    })?;

    println!("IMPROVED SUMMARY");
    println!("{}", summarize(&improved)?);
    println!();

    println!("LAND SUMMARY");
    println!("{}", summarize(&land)?);
    Ok(())
}
