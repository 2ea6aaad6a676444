// Archive Expansion
//
// Payloads that are not Gbx data may be zip containers holding many Gbx
// files. This module does the zip side of that: structural probing and
// entry extraction, with read failures degraded to skips.

use std::io::{Cursor, Read};

use bytes::Bytes;
use tracing::warn;
use zip::ZipArchive;

/// One extracted archive entry.
pub(crate) struct ArchiveEntry {
	/// Full entry path inside the archive.
	pub path: String,
	pub data: Bytes,
}

/// Open `data` as a zip archive. `None` means the bytes are not a zip
/// container at all, which callers treat as "not an archive" rather than
/// an error.
pub(crate) fn open(data: &[u8]) -> Option<ZipArchive<Cursor<&[u8]>>> {
	ZipArchive::new(Cursor::new(data)).ok()
}

/// Read the entry at `index`. Directory markers and nameless entries are
/// skipped silently, unreadable entries are logged and skipped.
pub(crate) fn read_entry(
	archive: &mut ZipArchive<Cursor<&[u8]>>,
	index: usize,
) -> Option<ArchiveEntry> {
	let mut entry = match archive.by_index(index) {
		Ok(entry) => entry,
		Err(err) => {
			warn!(target: "gbx_io", index, error = %err, "failed to open archive entry");
			return None;
		},
	};

	if entry.is_dir() || file_name(entry.name()).is_empty() {
		return None;
	}

	let path = entry.name().to_string();
	// Size fields in the zip directory are untrusted input. Grow the buffer
	// from the actual read instead of preallocating from a declaration.
	let mut data = Vec::new();
	if let Err(err) = entry.read_to_end(&mut data) {
		warn!(target: "gbx_io", entry = %path, error = %err, "failed to read archive entry");
		return None;
	}

	Some(ArchiveEntry { path, data: data.into() })
}

/// Last path segment of an entry name.
fn file_name(path: &str) -> &str {
	path.rsplit(['/', '\\']).next().unwrap_or(path)
}
