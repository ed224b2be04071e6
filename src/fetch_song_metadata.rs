// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! This module has the function that called by the main function.

use std::io;

use clap::Parser;
use log::{debug, info};
use thiserror::Error;

use crate::{
    batch::{self, QueryOutcome},
    resolve_error::ResolveError,
    spotify::{SpotifyClient, SpotifySongResolver},
};

// The registered application credentials, used when the caller supplies none.
const DEFAULT_CLIENT_ID: &str = "5f573c9620494bae87890c0f08a60293";
const DEFAULT_CLIENT_SECRET: &str = "212476d9b0f3472eaa762d90b19b0ba8";

/// The struct for setting.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Fetch and print metadata of songs for queries."
)]
pub struct Setting {
    #[arg(
        long,
        value_name = "ID",
        default_value = DEFAULT_CLIENT_ID,
        value_parser = is_credential_not_empty,
        help = "A client ID for the provider API."
    )]
    client_id: String,

    #[arg(
        long,
        value_name = "SECRET",
        default_value = DEFAULT_CLIENT_SECRET,
        value_parser = is_credential_not_empty,
        help = "A client secret for the provider API."
    )]
    client_secret: String,

    #[arg(
        required = true,
        value_name = "QUERY",
        help = "Song search terms or track URLs."
    )]
    queries: Vec<String>,
}

/// Error of fetch_song_metadata.
#[derive(Error, Debug)]
pub enum FetchSongMetadataError {
    #[error("Client initialization is failed: {0}")]
    InitializationFailed(ResolveError),

    #[error("Writing the report is failed: {0}")]
    ReportingFailed(io::Error),
}

#[cfg_attr(test, mockall::automock)]
trait FetchSongMetadataRunner {
    fn initialize_client(&self, client_id: &str, client_secret: &str) -> Result<(), ResolveError>;

    fn process_queries(&self, queries: &[String]) -> Result<Vec<QueryOutcome>, io::Error>;
}

struct FetchSongMetadata;

impl FetchSongMetadataRunner for FetchSongMetadata {
    fn initialize_client(&self, client_id: &str, client_secret: &str) -> Result<(), ResolveError> {
        SpotifyClient::init(client_id, client_secret)
    }

    fn process_queries(&self, queries: &[String]) -> Result<Vec<QueryOutcome>, io::Error> {
        let resolver = SpotifySongResolver::new(None);
        let mut stdout = io::stdout().lock();

        batch::process_all(&resolver, &mut stdout, queries)
    }
}

fn is_credential_not_empty(argument: &str) -> Result<String, String> {
    if argument.trim().is_empty() {
        Err("The credential is empty.".to_owned())
    } else {
        Ok(argument.to_owned())
    }
}

fn fetch_song_metadata_on_runner<T: FetchSongMetadataRunner>(
    setting: &Setting,
    runner: T,
) -> Result<Vec<QueryOutcome>, FetchSongMetadataError> {
    info!("Fetches metadata for {} queries.", setting.queries.len());

    debug!("Client ID: {}", setting.client_id);

    runner
        .initialize_client(&setting.client_id, &setting.client_secret)
        .map_err(FetchSongMetadataError::InitializationFailed)?;

    let outcomes = runner
        .process_queries(&setting.queries)
        .map_err(FetchSongMetadataError::ReportingFailed)?;

    info!("Completed.");

    Ok(outcomes)
}

/// Fetches and prints metadata of songs for the queries.
///
/// The provider client is initialized once, then every query is resolved and
/// reported to the standard output. A failing query is reported and skipped,
/// it never aborts the batch.
pub fn fetch_song_metadata(
    setting: &Setting,
) -> Result<Vec<QueryOutcome>, FetchSongMetadataError> {
    fetch_song_metadata_on_runner(setting, FetchSongMetadata)
}
