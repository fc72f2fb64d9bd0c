//! `tslite classify`

use super::{render, App, ClassifyArgs};
use anyhow::{anyhow, Result};
use tracing::info;
use tslite_client::{ClassificationRequest, ClassificationResult, RequestOrchestrator};
use tslite_history::HistoryEntry;

/// Build the request from command-line arguments
pub fn build_request(args: &ClassifyArgs) -> ClassificationRequest {
    let mut request = ClassificationRequest::new(args.description.join(" "));
    if let Some(country) = &args.country {
        request = request.with_country(country.clone());
    }
    if let Some(value) = args.value {
        request = request.with_declared_value(value);
    }
    request
}

/// Submit, print and (unless disabled) record
pub async fn submit_and_record(
    app: &mut App,
    orchestrator: &RequestOrchestrator,
    request: ClassificationRequest,
    json: bool,
    record: bool,
) -> Result<()> {
    let result = orchestrator
        .submit(&request)
        .await
        .map_err(|e| anyhow!(render::error_message(&e)))?;

    print_result(&result, json)?;

    if record {
        app.store.record(HistoryEntry::new(request, result));
        info!(entries = app.store.len(), "Recorded classification");
    }
    Ok(())
}

fn print_result(result: &ClassificationResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", render::result_text(result));
    }
    Ok(())
}

/// Run `classify`
pub async fn run(app: &mut App, args: ClassifyArgs) -> Result<()> {
    let request = build_request(&args);
    let orchestrator = app.orchestrator()?;
    submit_and_record(app, &orchestrator, request, args.json, !args.no_record).await
}
