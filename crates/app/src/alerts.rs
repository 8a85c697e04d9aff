//! Monthly budget alert loop.
//!
//! Sleeps until 09:00 UTC on the first day of each month, then runs one
//! scan pass over every budget. The scan itself lives in the engine.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use engine::Engine;

pub async fn run(engine: Arc<Engine>) {
    loop {
        let now = Utc::now();
        let next = next_run_after(now);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!("next budget alert scan at {next}");
        tokio::time::sleep(wait).await;

        match engine.budget_alert_scan(Utc::now()).await {
            Ok(flagged) => tracing::info!("budget alert scan flagged {flagged} budgets"),
            Err(err) => tracing::error!("budget alert scan failed: {err}"),
        }
    }
}

/// 09:00 UTC on the first day of the month after `now`.
fn next_run_after(now: DateTime<Utc>) -> DateTime<Utc> {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|date| date.and_hms_opt(9, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_else(|| now + Days::new(30))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn next_run_is_first_of_next_month() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        assert_eq!(
            next_run_after(now),
            Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_run_crosses_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(
            next_run_after(now),
            Utc.with_ymd_and_hms(2027, 1, 1, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_run_on_the_first_still_targets_the_following_month() {
        let now = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
        assert_eq!(
            next_run_after(now),
            Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap()
        );
    }
}
