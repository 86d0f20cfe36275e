use anyhow::Result;

/// Send a desktop notification (platform-specific). Failures are the
/// caller's to downgrade; nothing here is load-bearing.
pub fn send(title: &str, message: &str) -> Result<()> {
    #[cfg(target_os = "linux")]
    {
        // Use notify-send on Linux
        use std::process::Command;
        Command::new("notify-send")
            .arg(title)
            .arg(message)
            .arg("--urgency=normal")
            .arg("--icon=dialog-information")
            .output()?;
    }

    #[cfg(target_os = "macos")]
    {
        // Use osascript to display notification on macOS
        use std::process::Command;
        let script = format!(
            "display notification \"{}\" with title \"{}\"",
            message, title
        );
        Command::new("osascript").arg("-e").arg(&script).output()?;
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        // No toast integration yet; at least leave a trace in the log
        tracing::warn!("Notification: {} - {}", title, message);
    }

    Ok(())
}
