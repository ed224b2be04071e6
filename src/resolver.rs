use std::collections::BTreeMap;

use serde_json::Value;

use crate::{resolve_error::ResolveError, song::ResolvedSong};

/// The option that is always enabled for constructed resolvers.
pub const EXTRA_METADATA_OPTION: &str = "extra_metadata";

/// Settings for constructing a resolver.
pub type ResolverSettings = BTreeMap<String, Value>;

/// Returns the settings with the extra metadata option enabled.
///
/// Every other entry of the caller supplied settings is preserved unchanged.
/// Absent settings are treated as empty.
pub fn with_extra_metadata_forced(settings: Option<ResolverSettings>) -> ResolverSettings {
    let mut settings = settings.unwrap_or_default();

    settings.insert(EXTRA_METADATA_OPTION.to_owned(), Value::Bool(true));

    settings
}

/// Resolves one query to a song.
///
/// The resolution strategy, a track URL or a free text search, is the
/// implementor's concern.
#[cfg_attr(test, mockall::automock)]
pub trait SongResolver {
    fn resolve(&self, query: &str) -> Result<ResolvedSong, ResolveError>;
}
