use anyhow::Result;
use chrono::Local;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::LockConfig;
use crate::lock::{LockController, Tick, UnlockDuration, UnlockOutcome};
use crate::notify;

const NOTIFY_TITLE: &str = "Smart Board Lock";

/// Run the lock daemon in a loop.
///
/// A one-second tick drives the code rotation and the schedule check;
/// unlock codes arrive as lines on stdin. Both paths run on this one
/// task, so verification and the lock transition never race the
/// auto-lock check. A faulty tick is logged and the loop keeps going.
pub async fn run_lock_daemon(config: LockConfig) -> Result<()> {
    info!("Starting smart board lock daemon");
    info!(
        "Schedule: {} standard and {} friday periods",
        config.schedule.standard.len(),
        config.schedule.friday.len()
    );
    if config.schedule.standard.is_empty() && config.schedule.friday.is_empty() {
        warn!("No periods configured; the board will report out-of-hours all week");
    }
    info!("Unlock by typing the 6-digit real code (append 'one-period' to limit it); type 'lock' to lock again");

    let notifications = config.notifications.enabled;
    let mut controller = LockController::new(config);

    if notifications {
        if let Err(e) = notify::send(NOTIFY_TITLE, "Smart board lock active") {
            warn!("Failed to send notification: {:#}", e);
        }
    }

    let mut ticker = time::interval(Duration::from_secs(1));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut last_label: Option<String> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let tick = controller.tick(Local::now());
                handle_tick(&tick, &mut last_label, notifications);
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => handle_request(&mut controller, &line),
                    Ok(None) => {
                        debug!("stdin closed; running unattended");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("Failed to read unlock input: {:#}", e);
                        stdin_open = false;
                    }
                }
            }
        }
    }
}

fn handle_tick(tick: &Tick, last_label: &mut Option<String>, notifications: bool) {
    let label = tick.period.label();
    if last_label.as_deref() != Some(label) {
        info!("Period: {} {}", tick.period.icon(), label);
        *last_label = Some(label.to_string());
    }

    // seconds_until_rotation restarts at 60 right after a bucket change
    if tick.seconds_until_rotation == 60 {
        debug!("Display code rotated: {}", tick.display_code);
    }

    if tick.auto_locked {
        info!("{} started, locking the board", label);
        if notifications {
            let message = format!("{} started, the board has been locked.", label);
            if let Err(e) = notify::send(NOTIFY_TITLE, &message) {
                warn!("Failed to send notification: {:#}", e);
            }
        }
    }
}

/// A request typed on stdin
#[derive(Debug, PartialEq, Eq)]
enum Request {
    Unlock { code: String, duration: UnlockDuration },
    Lock,
}

fn parse_request(line: &str) -> Option<Request> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next()?;

    if first.eq_ignore_ascii_case("lock") {
        return Some(Request::Lock);
    }

    let duration = match tokens.next() {
        None => UnlockDuration::Unlimited,
        Some(t) if t.eq_ignore_ascii_case("one-period") => UnlockDuration::OnePeriod,
        Some(t) if t.eq_ignore_ascii_case("unlimited") => UnlockDuration::Unlimited,
        Some(_) => return None,
    };

    Some(Request::Unlock {
        code: first.to_string(),
        duration,
    })
}

fn handle_request(controller: &mut LockController, line: &str) {
    let Some(request) = parse_request(line) else {
        if !line.trim().is_empty() {
            warn!("Unrecognized input; expected a 6-digit code or 'lock'");
        }
        return;
    };

    match request {
        Request::Lock => {
            controller.lock();
            info!("Board locked");
        }
        Request::Unlock { code, duration } => {
            match controller.submit_code(&code, duration, Local::now()) {
                UnlockOutcome::Accepted { duration } => {
                    info!("Code accepted, board unlocked ({})", duration);
                }
                UnlockOutcome::Rejected => {
                    warn!("Invalid code; type the real code from the companion app, not the one on screen");
                }
            }
        }
    }
}
