//! Output formatting

pub mod human;
pub mod json;

use crate::cli::OutputFormat;
use crate::pipeline::QueryResponse;

/// Format a query response for output
pub fn format_response(response: &QueryResponse, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => human::format(response),
        OutputFormat::Json => json::format(response),
    }
}
