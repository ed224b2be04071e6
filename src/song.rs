// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Song records resolved from the provider.

use std::{collections::BTreeMap, fmt::Display};

/// The nested metadata block attached by the secondary provider.
///
/// An empty block means no secondary metadata is available.
pub type MetadataBlock = BTreeMap<String, String>;

/// A song resolved from one query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSong {
    pub name: String,

    pub artists: Vec<String>,

    pub album_name: String,

    pub album_artist: Option<String>,

    pub duration_seconds: u32,

    pub year: Option<u32>,

    pub track_number: u32,

    pub disc_number: u32,

    pub explicit: bool,

    pub popularity: u32,

    pub song_id: String,

    pub url: String,

    pub isrc: Option<String>,

    pub cover_url: Option<String>,

    pub extra_metadata: MetadataBlock,
}

impl ResolvedSong {
    /// Enumerates the public attributes as name and rendered value pairs.
    ///
    /// The pairs are in declaration order. The extra metadata block is not
    /// included because it is reported as its own section.
    pub fn attribute_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("artists", self.artists.join(", ")),
            ("album_name", self.album_name.clone()),
            ("album_artist", render_optional(&self.album_artist)),
            ("duration_seconds", self.duration_seconds.to_string()),
            ("year", render_optional(&self.year)),
            ("track_number", self.track_number.to_string()),
            ("disc_number", self.disc_number.to_string()),
            ("explicit", self.explicit.to_string()),
            ("popularity", self.popularity.to_string()),
            ("song_id", self.song_id.clone()),
            ("url", self.url.clone()),
            ("isrc", render_optional(&self.isrc)),
            ("cover_url", render_optional(&self.cover_url)),
        ]
    }
}

fn render_optional<T: Display>(value: &Option<T>) -> String {
    value
        .as_ref()
        .map(|value| value.to_string())
        .unwrap_or_else(|| "none".to_owned())
}
