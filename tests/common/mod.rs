#![allow(dead_code)]

use mixforge::track::{assign_indices, CamelotKey, Track};

/// Builder for Track to keep test fixtures short
pub struct TrackBuilder {
    track: Track,
}

impl TrackBuilder {
    pub fn new(path: &str) -> Self {
        Self {
            track: Track::new(path),
        }
    }

    pub fn key(mut self, key: &str) -> Self {
        self.track.key = CamelotKey::parse(key);
        self
    }

    pub fn artist(mut self, artist: &str) -> Self {
        self.track.artist = artist.to_string();
        self
    }

    pub fn album(mut self, album: &str) -> Self {
        self.track.album = album.to_string();
        self
    }

    pub fn genre(mut self, genre: &str) -> Self {
        self.track.genre = genre.to_string();
        self
    }

    pub fn energy(mut self, energy: u8) -> Self {
        self.track.energy = energy;
        self
    }

    pub fn bpm(mut self, bpm: f64) -> Self {
        self.track.bpm = bpm;
        self
    }

    pub fn build(self) -> Track {
        self.track
    }
}

/// Indexes the list in order, ready for `build_cache`.
pub fn indexed(mut tracks: Vec<Track>) -> Vec<Track> {
    assign_indices(&mut tracks);
    tracks
}

/// A small, varied crate of tracks covering every scoring component.
pub fn sample_crate() -> Vec<Track> {
    const ROWS: &[(&str, &str, &str, &str, u8, f64)] = &[
        ("01.mp3", "8A", "Moodymann", "deep house", 4, 122.0),
        ("02.mp3", "9A", "Kerri Chandler", "deep house", 5, 123.0),
        ("03.mp3", "9B", "Kerri Chandler", "house", 6, 124.0),
        ("04.mp3", "10A", "Ben Klock", "techno", 8, 130.0),
        ("05.mp3", "3A", "Nina Kraviz", "minimal techno", 7, 128.0),
        ("06.mp3", "12B", "Jamiroquai", "acid jazz", 5, 110.0),
        ("07.mp3", "", "Unknown", "", 0, 0.0),
        ("08.mp3", "1B", "Daft Punk", "nu disco", 6, 116.0),
        ("09.mp3", "5A", "Sade", "neo soul", 3, 92.0),
        ("10.mp3", "4A", "Burial", "dubstep", 4, 140.0),
        ("11.mp3", "6B", "Aphex Twin", "ambient", 1, 70.0),
        ("12.mp3", "11A", "Ben Klock", "techno", 9, 132.0),
    ];

    indexed(
        ROWS.iter()
            .map(|&(path, key, artist, genre, energy, bpm)| {
                TrackBuilder::new(path)
                    .key(key)
                    .artist(artist)
                    .album(if artist == "Ben Klock" { "Berghain" } else { "" })
                    .genre(genre)
                    .energy(energy)
                    .bpm(bpm)
                    .build()
            })
            .collect(),
    )
}
