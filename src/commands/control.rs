use anyhow::Result;
use chrono::{Datelike, Local, Utc, Weekday};
use serde::Serialize;
use std::path::Path;

use crate::config::{self, PeriodKind};
use crate::daemon;
use crate::otp;
use crate::schedule;

/// Run the lock daemon in the foreground
pub fn run(config_path: &Path) -> Result<()> {
    let config = config::load_config(config_path)?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(daemon::run_lock_daemon(config))
}

#[derive(Serialize)]
struct StatusReport {
    timetable: &'static str,
    period: String,
    icon: String,
    kind: Option<PeriodKind>,
    start: Option<String>,
    end: Option<String>,
    remaining_minutes: Option<i64>,
    auto_lock_active: bool,
    code_rotates_in_seconds: u32,
}

/// Show the current period and code rotation status
pub fn status(config_path: &Path, json: bool) -> Result<()> {
    let config = config::load_config(config_path)?;
    let now = Local::now();

    let period = schedule::current_period(&config.schedule, now);
    let timetable = if now.weekday() == Weekday::Fri {
        "friday"
    } else {
        "standard"
    };

    let report = StatusReport {
        timetable,
        period: period.label().to_string(),
        icon: period.icon().to_string(),
        kind: period.entry().map(|e| e.kind),
        start: period.entry().map(|e| e.start.format("%H:%M").to_string()),
        end: period.entry().map(|e| e.end.format("%H:%M").to_string()),
        remaining_minutes: period
            .entry()
            .map(|e| schedule::remaining_minutes(e, now.time())),
        auto_lock_active: period.is_break(),
        code_rotates_in_seconds: otp::seconds_until_rotation(now.with_timezone(&Utc)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Smart Board Lock Status");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Timetable:      {} ({})", report.timetable, now.format("%A"));

    match (&report.start, &report.end) {
        (Some(start), Some(end)) => {
            println!(
                "Period:         {} {} ({} - {})",
                report.icon, report.period, start, end
            );
            if let Some(minutes) = report.remaining_minutes {
                println!("Remaining:      {} minutes", minutes);
            }
        }
        _ => {
            println!(
                "Period:         {} {} (outside school hours)",
                report.icon, report.period
            );
        }
    }

    println!(
        "Auto-lock:      {}",
        if report.auto_lock_active {
            "active (break in progress)"
        } else {
            "inactive"
        }
    );
    println!(
        "Code rotation:  {} seconds",
        report.code_rotates_in_seconds
    );

    Ok(())
}

/// Print the code currently shown on the board (or its complement)
pub fn code(config_path: &Path, real: bool) -> Result<()> {
    let config = config::load_config(config_path)?;

    let display = otp::display_code(&config.unlock.secret, Utc::now());
    if real {
        println!("{}", otp::real_code(&display));
    } else {
        println!("{}", display);
    }

    Ok(())
}

/// Check an unlock code against the current time window
pub fn verify(config_path: &Path, code: &str) -> Result<()> {
    let config = config::load_config(config_path)?;

    if otp::verify_code(code, &config.unlock.secret, Utc::now()) {
        println!("✓ Code accepted (valid for the current ±1 minute window)");
        Ok(())
    } else {
        anyhow::bail!("Code rejected");
    }
}
