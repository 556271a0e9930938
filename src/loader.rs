use crate::error::MfResult;
use crate::track::{assign_indices, CamelotKey, Track};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Highest valid energy level; anything above is treated as unknown.
const MAX_ENERGY: u8 = 10;

/// On-disk shape of one track. Every field except `path` may be missing.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TrackRecord {
    path: String,
    key: String,
    artist: String,
    album: String,
    genre: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    energy: Option<u8>,
    #[serde(deserialize_with = "csv::invalid_option")]
    bpm: Option<f64>,
}

/// Loads a track list, JSON when the extension says so, CSV otherwise.
/// Indices are assigned in file order.
pub fn load_tracks<P: AsRef<Path>>(path: P) -> MfResult<Vec<Track>> {
    let path = path.as_ref();
    debug!("Loading tracks from {}", path.display());
    let file = File::open(path)?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        read_json(file)
    } else {
        read_csv(file)
    }
}

/// CSV with a `path,key,artist,album,genre,energy,bpm` header; extra columns are ignored.
pub fn read_csv<R: Read>(reader: R) -> MfResult<Vec<Track>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let rec: TrackRecord = result?;
        records.push(rec);
    }
    Ok(into_tracks(records))
}

/// JSON array of objects with the same field names as the CSV header.
pub fn read_json<R: Read>(reader: R) -> MfResult<Vec<Track>> {
    let records: Vec<TrackRecord> = serde_json::from_reader(reader)?;
    Ok(into_tracks(records))
}

fn into_tracks(records: Vec<TrackRecord>) -> Vec<Track> {
    let mut skipped = 0;
    let mut tracks: Vec<Track> = records
        .into_iter()
        .filter_map(|rec| {
            if rec.path.trim().is_empty() {
                skipped += 1;
                return None;
            }
            Some(convert(rec))
        })
        .collect();

    if skipped > 0 {
        warn!("Skipped {} rows without a path", skipped);
    }
    assign_indices(&mut tracks);
    debug!("Loaded {} tracks", tracks.len());
    tracks
}

fn convert(rec: TrackRecord) -> Track {
    let key = CamelotKey::parse(&rec.key);
    if key.is_none() && !rec.key.trim().is_empty() {
        warn!("'{}': unrecognised key '{}', treating as unknown", rec.path, rec.key);
    }

    let energy = match rec.energy {
        Some(e) if e <= MAX_ENERGY => e,
        Some(e) => {
            warn!("'{}': energy {} out of range, treating as unknown", rec.path, e);
            0
        }
        None => 0,
    };

    let bpm = rec.bpm.filter(|b| b.is_finite() && *b > 0.0).unwrap_or(0.0);

    Track {
        path: rec.path,
        key,
        artist: rec.artist,
        album: rec.album,
        genre: rec.genre,
        energy,
        bpm,
        index: 0,
    }
}
