use std::collections::BTreeMap;

use fetch_song_metadata::{
    resolve_error::ResolveError,
    resolver::SongResolver,
    song::{MetadataBlock, ResolvedSong},
};

/// A resolver that answers from a fixed query to song table.
///
/// An unknown query fails as not found.
pub struct StubResolver {
    songs: BTreeMap<String, ResolvedSong>,
}

impl StubResolver {
    pub fn new(songs: Vec<(&str, ResolvedSong)>) -> Self {
        StubResolver {
            songs: songs
                .into_iter()
                .map(|(query, song)| (query.to_owned(), song))
                .collect(),
        }
    }
}

impl SongResolver for StubResolver {
    fn resolve(&self, query: &str) -> Result<ResolvedSong, ResolveError> {
        self.songs
            .get(query)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound {
                query: query.to_owned(),
            })
    }
}

pub fn create_song(name: &str) -> ResolvedSong {
    ResolvedSong {
        name: name.to_owned(),
        artists: vec!["Artist".to_owned()],
        album_name: "Album".to_owned(),
        album_artist: None,
        duration_seconds: 180,
        year: None,
        track_number: 1,
        disc_number: 1,
        explicit: false,
        popularity: 50,
        song_id: "id".to_owned(),
        url: "https://open.spotify.com/track/id".to_owned(),
        isrc: None,
        cover_url: None,
        extra_metadata: MetadataBlock::new(),
    }
}

pub fn create_song_with_metadata(name: &str, entries: &[(&str, &str)]) -> ResolvedSong {
    let mut song = create_song(name);

    song.extra_metadata = entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    song
}
