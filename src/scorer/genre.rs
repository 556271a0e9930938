use crate::consts::{
    GENRE_ANCESTOR, GENRE_IDENTICAL, GENRE_SAME_FAMILY, GENRE_SIBLING, GENRE_UNRELATED,
};

/// Child -> parent links. Roots are the genres that never appear on the left.
const GENRE_PARENTS: &[(&str, &str)] = &[
    // Electronic
    ("house", "electronic"),
    ("deep house", "house"),
    ("tech house", "house"),
    ("progressive house", "house"),
    ("afro house", "house"),
    ("techno", "electronic"),
    ("minimal techno", "techno"),
    ("melodic techno", "techno"),
    ("trance", "electronic"),
    ("progressive trance", "trance"),
    ("psytrance", "trance"),
    ("drum and bass", "electronic"),
    ("liquid funk", "drum and bass"),
    ("neurofunk", "drum and bass"),
    ("dubstep", "electronic"),
    ("breakbeat", "electronic"),
    ("electro", "electronic"),
    ("ambient", "electronic"),
    ("downtempo", "electronic"),
    ("trip hop", "downtempo"),
    ("synthwave", "electronic"),
    // Disco / funk / soul
    ("soul", "r&b"),
    ("funk", "r&b"),
    ("disco", "funk"),
    ("nu disco", "disco"),
    ("neo soul", "soul"),
    // Hip hop
    ("rap", "hip hop"),
    ("trap", "hip hop"),
    ("boom bap", "hip hop"),
    // Rock
    ("indie rock", "rock"),
    ("alternative rock", "rock"),
    ("hard rock", "rock"),
    ("punk", "rock"),
    ("post punk", "punk"),
    ("metal", "rock"),
    ("heavy metal", "metal"),
    ("death metal", "metal"),
    // Pop
    ("synthpop", "pop"),
    ("dance pop", "pop"),
    ("indie pop", "pop"),
    ("k-pop", "pop"),
    // Jazz
    ("bebop", "jazz"),
    ("smooth jazz", "jazz"),
    ("jazz fusion", "jazz"),
    ("acid jazz", "jazz"),
    // Classical
    ("baroque", "classical"),
    ("romantic", "classical"),
    ("contemporary classical", "classical"),
    // Reggae
    ("dub", "reggae"),
    ("dancehall", "reggae"),
];

fn normalize(genre: &str) -> String {
    genre.trim().to_lowercase()
}

fn parent_of(genre: &str) -> Option<&'static str> {
    GENRE_PARENTS
        .iter()
        .find(|(child, _)| *child == genre)
        .map(|(_, parent)| *parent)
}

/// `[genre, parent, grandparent, ...]` up to the root. Unknown genres are their own root.
pub fn ancestor_chain(genre: &str) -> Vec<String> {
    let mut chain = vec![normalize(genre)];
    while let Some(parent) = chain.last().and_then(|g| parent_of(g)) {
        // cycle guard
        if chain.iter().any(|g| g == parent) {
            break;
        }
        chain.push(parent.to_string());
    }
    chain
}

/// Genre dissimilarity in {0.0, 0.15, 0.3, 0.7, 1.0}; 0.0 means identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    chain_similarity(&ancestor_chain(a), &ancestor_chain(b))
}

/// Same as [`similarity`] on chains produced by [`ancestor_chain`], so callers
/// comparing many pairs can walk each genre's ancestry once.
///
/// The "same family" bucket matches a shared ancestor at any depth, not only
/// a shared grandparent.
pub fn chain_similarity(chain_a: &[String], chain_b: &[String]) -> f64 {
    let (a, b) = match (chain_a.first(), chain_b.first()) {
        (Some(a), Some(b)) => (a, b),
        _ => return GENRE_UNRELATED,
    };

    if a == b {
        return GENRE_IDENTICAL;
    }
    if a.is_empty() || b.is_empty() {
        return GENRE_UNRELATED;
    }

    if chain_a.contains(b) || chain_b.contains(a) {
        return GENRE_ANCESTOR;
    }

    if let (Some(pa), Some(pb)) = (chain_a.get(1), chain_b.get(1)) {
        if pa == pb {
            return GENRE_SIBLING;
        }
    }

    if chain_a.iter().any(|g| chain_b.contains(g)) {
        return GENRE_SAME_FAMILY;
    }

    GENRE_UNRELATED
}
