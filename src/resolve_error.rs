// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Error about resolving a query to a song.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("The query is empty.")]
    EmptyQuery,

    #[error("No song is found for the query `{query}`.")]
    NotFound { query: String },

    #[error("The client is not initialized.")]
    ClientNotInitialized,

    #[error("Authentication is failed: {cause}")]
    AuthenticationFailed { cause: String },

    #[error("The request is failed: {cause}")]
    RequestFailed { cause: String },

    #[error("The response could not be read: {cause}")]
    MalformedResponse { cause: String },
}
