//! Stock management commands.
//!
//! # Usage
//!
//! ```bash
//! pantry-cli stock add Apple Milk
//! pantry-cli stock list
//! ```

use pantry_core::{IngestOutcome, MAX_INGEST_ITEMS};
use pantry_web::db::InventoryRepository;

use super::{CommandError, connect};

/// Add one unit per name, in batches of [`MAX_INGEST_ITEMS`].
///
/// Each batch is one ingestion, exactly as if it had been submitted through
/// the add-items form.
pub async fn add(items: &[String]) -> Result<(), CommandError> {
    let pool = connect().await?;
    let inventory = InventoryRepository::new(&pool);

    for batch in items.chunks(MAX_INGEST_ITEMS) {
        let report = inventory.ingest(batch).await?;

        #[allow(clippy::print_stdout)]
        for outcome in report.outcomes() {
            match outcome {
                IngestOutcome::Added { item } => println!("added    {item}"),
                IngestOutcome::Skipped { input, reason } => {
                    println!("skipped  {input} ({reason})");
                }
            }
        }
    }

    Ok(())
}

/// Print every item and its quantity.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;
    let items = InventoryRepository::new(&pool).list().await?;

    #[allow(clippy::print_stdout)]
    {
        if items.is_empty() {
            println!("No items in the inventory.");
        }
        for row in items {
            println!("{:>6}  {}", row.quantity, row.item);
        }
    }

    Ok(())
}
