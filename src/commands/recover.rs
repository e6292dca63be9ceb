//! Crash recovery CLI command.
//!
//! Opening the store already replays the journal; this reports what that
//! pass did and runs one more pass to confirm nothing is left pending.

use crate::output::{self, OutputFormat};
use notehub_core::error::AppError;
use notehub_service::NoteHub;

/// Execute the recover command
pub async fn execute(hub: &NoteHub, format: OutputFormat) -> Result<(), AppError> {
    let mut report = hub.recovered();
    let again = hub.recovery.recover().await?;
    report.rolled_forward += again.rolled_forward;
    report.rolled_back += again.rolled_back;

    output::print_item(&report, format, |r| {
        if r.total() == 0 {
            output::print_success("No interrupted operations found");
            return;
        }
        output::print_success(&format!("Recovered {} interrupted operation(s)", r.total()));
        output::print_kv("Rolled forward", &r.rolled_forward.to_string());
        output::print_kv("Rolled back", &r.rolled_back.to_string());
    });

    Ok(())
}
