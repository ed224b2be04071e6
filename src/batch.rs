use std::io::{self, Write};

use log::debug;

use crate::{report, resolve_error::ResolveError, resolver::SongResolver, song::ResolvedSong};

/// Outcome of one query in a batch.
#[derive(Debug)]
pub struct QueryOutcome {
    pub query: String,

    pub result: Result<ResolvedSong, ResolveError>,
}

/// Resolves and reports every query, in input order, each exactly once.
///
/// A resolution failure is written as a diagnostic line to the writer and the
/// batch continues with the next query. A writer failure aborts the batch
/// because the output stream is gone.
pub fn process_all<W: Write>(
    resolver: &dyn SongResolver,
    writer: &mut W,
    queries: &[String],
) -> io::Result<Vec<QueryOutcome>> {
    let mut outcomes = Vec::with_capacity(queries.len());

    for query in queries {
        debug!("Resolves the query: {query}");

        let result = resolver.resolve(query);

        match &result {
            Ok(song) => report::report_song(writer, song)?,
            Err(error) => writeln!(writer, "Error processing query '{query}': {error}")?,
        }

        outcomes.push(QueryOutcome {
            query: query.clone(),
            result,
        });
    }

    Ok(outcomes)
}
