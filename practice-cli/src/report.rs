// Failure reporting at the process edge
use error_common::PracticeError;

/// Exit status for a failed command: 2 when the input can be fixed, 1 otherwise
pub fn exit_status(err: &PracticeError) -> u8 {
    if err.is_client_error() {
        2
    } else {
        1
    }
}

/// Pretty JSON body of the error report written to stderr
pub fn render_error(err: &PracticeError) -> String {
    let report = err.to_report();
    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|_| format!("{}: {}", report.code, report.message))
}
