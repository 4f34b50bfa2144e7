//! Action log command.

use pantry_web::db::ActionLogRepository;

use super::{CommandError, connect};

/// Print log entries, newest first.
pub async fn show(limit: Option<i64>) -> Result<(), CommandError> {
    let pool = connect().await?;
    let entries = ActionLogRepository::new(&pool).list(limit).await?;

    #[allow(clippy::print_stdout)]
    for entry in entries {
        let shopper = entry.shopper.as_ref().map_or("", |s| s.as_str());
        println!(
            "{}  {:<18}  {:<24}  {}",
            entry.logged_at.format("%Y-%m-%d %H:%M:%S"),
            entry.action.label(),
            entry.item.as_str(),
            shopper,
        );
    }

    Ok(())
}
