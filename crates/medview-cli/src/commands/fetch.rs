use std::process::ExitCode;

use anyhow::Result;
use medview_core::{OrdsClient, PatientId, RecordSource, ViewState, Viewer};

use crate::cli::OutputFormat;
use crate::output::{print_error, print_json, render};

pub async fn fetch(
    viewer: &Viewer<OrdsClient>,
    raw_id: &str,
    format: OutputFormat,
) -> Result<ExitCode> {
    match format {
        OutputFormat::Raw => fetch_raw(viewer, raw_id).await,
        OutputFormat::Json => match viewer.fetch(raw_id).await {
            Ok(outcome) => {
                print_json(&outcome)?;
                Ok(ExitCode::SUCCESS)
            }
            Err(e) => {
                print_error(&format!("{}: {}", e.status_line(), e.user_message()));
                Ok(ExitCode::FAILURE)
            }
        },
        OutputFormat::Table => {
            let mut state = ViewState::new();
            let ticket = state.begin();
            let result = viewer.fetch(raw_id).await;
            state.complete(ticket, result);
            println!("{}", render(&state));
            Ok(if state.error().is_some() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}

/// Print the body as received, skipping normalization.
async fn fetch_raw(viewer: &Viewer<OrdsClient>, raw_id: &str) -> Result<ExitCode> {
    let result = match PatientId::parse(raw_id, viewer.id_policy()) {
        Ok(id) => viewer.source().fetch(&id).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(fetched) => {
            print_json(&fetched.body)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            print_error(&format!("{}: {}", e.status_line(), e.user_message()));
            Ok(ExitCode::FAILURE)
        }
    }
}
