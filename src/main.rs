// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::process::exit;

use clap::Parser;

use env_logger::Env;
use fetch_song_metadata::fetch_song_metadata::{
    fetch_song_metadata, FetchSongMetadataError, Setting,
};
use log::error;

fn initialize_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_target(false)
        .format_timestamp(None)
        .init();
}

fn main() {
    initialize_logging();

    let result = fetch_song_metadata(&Setting::parse());

    if result.is_err() {
        match result.unwrap_err() {
            FetchSongMetadataError::InitializationFailed(error) => {
                error!("Client initialization is failed. Detail: {error}");
            }
            FetchSongMetadataError::ReportingFailed(error) => {
                error!("Writing the report is failed. Detail: {error}");
            }
        }

        exit(1);
    }
}
