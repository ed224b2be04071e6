// SPDX-FileCopyrightText: 2024 Keita Kita <maoutwo@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Song resolution by the Spotify Web API.

use std::{sync::OnceLock, time::Duration};

use anyhow::{anyhow, Result};
use base64::Engine as _;
use log::debug;
use serde_json::Value;

use crate::{
    resolve_error::ResolveError,
    resolver::{self, ResolverSettings, SongResolver, EXTRA_METADATA_OPTION},
    song::{MetadataBlock, ResolvedSong},
};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE_URL: &str = "https://api.spotify.com/v1";
const TRACK_URL_PREFIX: &str = "https://open.spotify.com/track/";

static CLIENT: OnceLock<SpotifyClient> = OnceLock::new();

/// The process wide authenticated client.
///
/// The client is initialized once before any resolution and only read
/// afterwards.
pub struct SpotifyClient {
    http_client: ureq::Agent,
    access_token: String,
}

impl SpotifyClient {
    /// Initializes the process wide client.
    ///
    /// Repeated initialization keeps the first client.
    pub fn init(client_id: &str, client_secret: &str) -> Result<(), ResolveError> {
        let http_client = create_http_client();
        let access_token = request_token(&http_client, client_id, client_secret)?;

        let _ = CLIENT.set(SpotifyClient {
            http_client,
            access_token,
        });

        Ok(())
    }

    pub fn get() -> Result<&'static SpotifyClient, ResolveError> {
        CLIENT.get().ok_or(ResolveError::ClientNotInitialized)
    }

    fn request_json(&self, url: &str) -> Result<Value, ResolveError> {
        let response = self
            .http_client
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
            .call()
            .map_err(map_request_error)?;

        response
            .into_json()
            .map_err(|error| ResolveError::MalformedResponse {
                cause: error.to_string(),
            })
    }
}

fn create_http_client() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout_connect(Duration::from_secs(5))
        .timeout_read(Duration::from_secs(15))
        .timeout_write(Duration::from_secs(15))
        .build()
}

fn request_token(
    http_client: &ureq::Agent,
    client_id: &str,
    client_secret: &str,
) -> Result<String, ResolveError> {
    let authorization =
        base64::engine::general_purpose::STANDARD.encode(format!("{client_id}:{client_secret}"));

    let response = http_client
        .post(TOKEN_URL)
        .set("Authorization", &format!("Basic {authorization}"))
        .send_form(&[("grant_type", "client_credentials")])
        .map_err(|error| ResolveError::AuthenticationFailed {
            cause: error.to_string(),
        })?;

    let parsed: Value = response
        .into_json()
        .map_err(|error| ResolveError::MalformedResponse {
            cause: error.to_string(),
        })?;

    parse_token(&parsed).map_err(|error| ResolveError::MalformedResponse {
        cause: error.to_string(),
    })
}

fn map_request_error(error: ureq::Error) -> ResolveError {
    match &error {
        ureq::Error::Status(401 | 403, _) => ResolveError::AuthenticationFailed {
            cause: error.to_string(),
        },
        _ => ResolveError::RequestFailed {
            cause: error.to_string(),
        },
    }
}

fn parse_token(response: &Value) -> Result<String> {
    response
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("The token response has no access_token."))
}

fn track_id_from_url(query: &str) -> Option<&str> {
    let rest = query.strip_prefix(TRACK_URL_PREFIX)?;
    let track_id = rest.split(['?', '/']).next().unwrap_or_default();

    (!track_id.is_empty()).then_some(track_id)
}

fn first_search_hit(response: &Value) -> Option<&Value> {
    response
        .get("tracks")?
        .get("items")?
        .as_array()?
        .first()
}

fn year_from_release_date(release_date: &str) -> Option<u32> {
    release_date.split('-').next()?.parse().ok()
}

fn song_from_track(track: &Value) -> Result<ResolvedSong> {
    let name = track
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("The track has no name."))?
        .to_owned();

    let song_id = track
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();

    let artists = track
        .get("artists")
        .and_then(Value::as_array)
        .map(|artists| {
            artists
                .iter()
                .filter_map(|artist| artist.get("name").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let album = track.get("album");

    Ok(ResolvedSong {
        name,
        artists,
        album_name: album
            .and_then(|album| album.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown Album")
            .to_owned(),
        album_artist: album
            .and_then(|album| album.get("artists"))
            .and_then(Value::as_array)
            .and_then(|artists| artists.first())
            .and_then(|artist| artist.get("name"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        duration_seconds: (track
            .get("duration_ms")
            .and_then(Value::as_u64)
            .unwrap_or_default()
            / 1000) as u32,
        year: album
            .and_then(|album| album.get("release_date"))
            .and_then(Value::as_str)
            .and_then(year_from_release_date),
        track_number: track
            .get("track_number")
            .and_then(Value::as_u64)
            .unwrap_or_default() as u32,
        disc_number: track
            .get("disc_number")
            .and_then(Value::as_u64)
            .unwrap_or(1) as u32,
        explicit: track
            .get("explicit")
            .and_then(Value::as_bool)
            .unwrap_or_default(),
        popularity: track
            .get("popularity")
            .and_then(Value::as_u64)
            .unwrap_or_default() as u32,
        url: track
            .get("external_urls")
            .and_then(|urls| urls.get("spotify"))
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{TRACK_URL_PREFIX}{song_id}")),
        isrc: track
            .get("external_ids")
            .and_then(|ids| ids.get("isrc"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        cover_url: album
            .and_then(|album| album.get("images"))
            .and_then(Value::as_array)
            .and_then(|images| images.first())
            .and_then(|image| image.get("url"))
            .and_then(Value::as_str)
            .map(str::to_owned),
        song_id,
        extra_metadata: MetadataBlock::new(),
    })
}

fn render_feature(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn metadata_block_from_features(features: &Value) -> MetadataBlock {
    // Resource locator entries repeat the track id and are not metadata.
    const EXCLUDED_KEYS: &[&str] = &["type", "id", "uri", "track_href", "analysis_url"];

    let Some(object) = features.as_object() else {
        return MetadataBlock::new();
    };

    object
        .iter()
        .filter(|(key, _)| !EXCLUDED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| render_feature(value).map(|value| (key.clone(), value)))
        .collect()
}

/// A resolver backed by the Spotify Web API.
///
/// The extra metadata option is always enabled regardless of the caller
/// supplied settings.
pub struct SpotifySongResolver {
    settings: ResolverSettings,
}

impl SpotifySongResolver {
    pub fn new(settings: Option<ResolverSettings>) -> Self {
        SpotifySongResolver {
            settings: resolver::with_extra_metadata_forced(settings),
        }
    }

    fn fetches_extra_metadata(&self) -> bool {
        self.settings
            .get(EXTRA_METADATA_OPTION)
            .and_then(Value::as_bool)
            .unwrap_or_default()
    }

    fn fetch_track(&self, client: &SpotifyClient, query: &str) -> Result<Value, ResolveError> {
        match track_id_from_url(query) {
            Some(track_id) => client.request_json(&format!("{API_BASE_URL}/tracks/{track_id}")),
            None => {
                let url = format!(
                    "{API_BASE_URL}/search?type=track&limit=1&q={}",
                    urlencoding::encode(query)
                );
                let response = client.request_json(&url)?;

                first_search_hit(&response)
                    .cloned()
                    .ok_or_else(|| ResolveError::NotFound {
                        query: query.to_owned(),
                    })
            }
        }
    }
}

impl SongResolver for SpotifySongResolver {
    fn resolve(&self, query: &str) -> Result<ResolvedSong, ResolveError> {
        if query.trim().is_empty() {
            return Err(ResolveError::EmptyQuery);
        }

        let client = SpotifyClient::get()?;
        let track = self.fetch_track(client, query)?;

        let mut song =
            song_from_track(&track).map_err(|error| ResolveError::MalformedResponse {
                cause: error.to_string(),
            })?;

        if self.fetches_extra_metadata() {
            // A missing secondary record leaves the block empty instead of
            // failing the whole query.
            match client.request_json(&format!("{API_BASE_URL}/audio-features/{}", song.song_id)) {
                Ok(features) => song.extra_metadata = metadata_block_from_features(&features),
                Err(error) => debug!("No extra metadata for `{}`: {error}", song.name),
            }
        }

        Ok(song)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_parsed() {
        let response: Value = serde_json::from_str(
            r#"{"access_token": "NgCXRK...MzYjw", "token_type": "Bearer", "expires_in": 3600}"#,
        )
        .unwrap();

        assert_eq!("NgCXRK...MzYjw", parse_token(&response).unwrap());
    }

    #[test]
    fn token_response_without_token_is_an_error() {
        let response: Value =
            serde_json::from_str(r#"{"error": "invalid_client"}"#).unwrap();

        assert!(parse_token(&response).is_err());
    }

    #[test]
    fn track_id_is_extracted_from_track_url() {
        assert_eq!(
            Some("0VjIjW4GlUZAMYd2vXMi3b"),
            track_id_from_url("https://open.spotify.com/track/0VjIjW4GlUZAMYd2vXMi3b")
        );
        assert_eq!(
            Some("0VjIjW4GlUZAMYd2vXMi3b"),
            track_id_from_url("https://open.spotify.com/track/0VjIjW4GlUZAMYd2vXMi3b?si=abc")
        );
    }

    #[test]
    fn free_text_query_has_no_track_id() {
        assert!(track_id_from_url("The Weeknd - Blinding Lights").is_none());
        assert!(track_id_from_url("https://open.spotify.com/track/").is_none());
    }

    #[test]
    fn year_is_parsed_from_release_date() {
        assert_eq!(Some(2020), year_from_release_date("2020-03-20"));
        assert_eq!(Some(1999), year_from_release_date("1999"));
        assert!(year_from_release_date("unknown").is_none());
    }

    fn create_track() -> Value {
        serde_json::from_str(
            r#"{
                "name": "Blinding Lights",
                "id": "0VjIjW4GlUZAMYd2vXMi3b",
                "artists": [{"name": "The Weeknd"}],
                "album": {
                    "name": "After Hours",
                    "artists": [{"name": "The Weeknd"}],
                    "release_date": "2020-03-20",
                    "images": [{"url": "https://i.scdn.co/image/ab67616d"}]
                },
                "duration_ms": 200040,
                "track_number": 9,
                "disc_number": 1,
                "explicit": false,
                "popularity": 90,
                "external_urls": {"spotify": "https://open.spotify.com/track/0VjIjW4GlUZAMYd2vXMi3b"},
                "external_ids": {"isrc": "USUG11904206"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn song_is_created_from_track() {
        let song = song_from_track(&create_track()).unwrap();

        assert_eq!("Blinding Lights", song.name);
        assert_eq!(vec!["The Weeknd".to_owned()], song.artists);
        assert_eq!("After Hours", song.album_name);
        assert_eq!(Some("The Weeknd".to_owned()), song.album_artist);
        assert_eq!(200, song.duration_seconds);
        assert_eq!(Some(2020), song.year);
        assert_eq!(9, song.track_number);
        assert_eq!(1, song.disc_number);
        assert!(!song.explicit);
        assert_eq!(90, song.popularity);
        assert_eq!("0VjIjW4GlUZAMYd2vXMi3b", song.song_id);
        assert_eq!(Some("USUG11904206".to_owned()), song.isrc);
        assert!(song.extra_metadata.is_empty());
    }

    #[test]
    fn song_is_created_from_minimal_track() {
        let track: Value =
            serde_json::from_str(r#"{"name": "Fade", "id": "abc"}"#).unwrap();

        let song = song_from_track(&track).unwrap();

        assert_eq!("Fade", song.name);
        assert!(song.artists.is_empty());
        assert_eq!("Unknown Album", song.album_name);
        assert!(song.album_artist.is_none());
        assert!(song.year.is_none());
        assert_eq!("https://open.spotify.com/track/abc", song.url);
    }

    #[test]
    fn track_without_name_is_an_error() {
        let track: Value = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();

        assert!(song_from_track(&track).is_err());
    }

    #[test]
    fn first_search_hit_is_taken() {
        let response: Value = serde_json::from_str(
            r#"{"tracks": {"items": [{"name": "First"}, {"name": "Second"}]}}"#,
        )
        .unwrap();

        let hit = first_search_hit(&response).unwrap();

        assert_eq!(Some("First"), hit.get("name").and_then(Value::as_str));
    }

    #[test]
    fn empty_search_has_no_hit() {
        let response: Value = serde_json::from_str(r#"{"tracks": {"items": []}}"#).unwrap();

        assert!(first_search_hit(&response).is_none());
    }

    #[test]
    fn features_become_a_metadata_block() {
        let features: Value = serde_json::from_str(
            r#"{
                "danceability": 0.514,
                "energy": 0.73,
                "tempo": 171.005,
                "mode": 1,
                "type": "audio_features",
                "id": "0VjIjW4GlUZAMYd2vXMi3b",
                "uri": "spotify:track:0VjIjW4GlUZAMYd2vXMi3b",
                "track_href": "https://api.spotify.com/v1/tracks/0VjIjW4GlUZAMYd2vXMi3b",
                "analysis_url": "https://api.spotify.com/v1/audio-analysis/0VjIjW4GlUZAMYd2vXMi3b"
            }"#,
        )
        .unwrap();

        let block = metadata_block_from_features(&features);

        assert_eq!(4, block.len());
        assert_eq!(Some(&"0.514".to_owned()), block.get("danceability"));
        assert_eq!(Some(&"171.005".to_owned()), block.get("tempo"));
        assert!(block.get("id").is_none());
        assert!(block.get("analysis_url").is_none());
    }

    #[test]
    fn non_object_features_become_an_empty_block() {
        assert!(metadata_block_from_features(&Value::Null).is_empty());
    }

    #[test]
    fn resolver_always_fetches_extra_metadata() {
        let mut settings = ResolverSettings::new();

        settings.insert(EXTRA_METADATA_OPTION.to_owned(), Value::Bool(false));

        let resolver = SpotifySongResolver::new(Some(settings));

        assert!(resolver.fetches_extra_metadata());
    }

    #[test]
    fn empty_query_is_rejected_before_any_request() {
        let resolver = SpotifySongResolver::new(None);

        let error = resolver.resolve("  ").unwrap_err();

        assert!(matches!(error, ResolveError::EmptyQuery));
    }
}
