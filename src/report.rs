//! Printing resolved songs.

use std::io::{self, Write};

use crate::song::ResolvedSong;

/// Writes one `name: value` line per attribute of the song.
///
/// When the extra metadata block is not empty, a bordered section naming the
/// song follows the attribute lines. An empty block prints no section.
pub fn report_song<W: Write>(writer: &mut W, song: &ResolvedSong) -> io::Result<()> {
    for (name, value) in song.attribute_pairs() {
        writeln!(writer, "{name}: {value}")?;
    }

    if song.extra_metadata.is_empty() {
        return Ok(());
    }

    writeln!(writer)?;
    writeln!(writer, "===== EXTRA METADATA FOR {} =====", song.name)?;

    for (key, value) in &song.extra_metadata {
        writeln!(writer, "{key}: {value}")?;
    }

    writeln!(writer, "============================")?;

    Ok(())
}
