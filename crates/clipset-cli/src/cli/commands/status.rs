//! `clipset status` – per-state record counts from the store.

use anyhow::Result;
use clipset_core::config::ClipsetConfig;
use clipset_core::record::RecordState;
use clipset_core::store::Catalog;

pub fn run_status(cfg: &ClipsetConfig) -> Result<()> {
    let Some(catalog) = Catalog::load(&cfg.store_path)? else {
        println!("No record store at {}.", cfg.store_path.display());
        return Ok(());
    };

    let counts = catalog.counts();
    println!("{:<16} {}", "STATE", "COUNT");
    println!("{:<16} {}", RecordState::Pending.as_str(), counts.pending);
    println!(
        "{:<16} {}",
        RecordState::DownloadedOnly.as_str(),
        counts.downloaded_only
    );
    println!("{:<16} {}", RecordState::Done.as_str(), counts.done);
    println!(
        "{:<16} {}",
        RecordState::Unavailable.as_str(),
        counts.unavailable
    );
    println!("{:<16} {}", "total", counts.total());
    Ok(())
}
