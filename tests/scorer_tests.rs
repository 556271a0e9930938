use mixforge::config::Weights;
use mixforge::scorer::{build_cache, genre, harmonic, tempo, Component, Evaluator};
use mixforge::track::CamelotKey;
use rstest::rstest;

mod common;
use common::{indexed, sample_crate, TrackBuilder};

fn key(s: &str) -> Option<CamelotKey> {
    CamelotKey::parse(s)
}

fn weights_only(f: impl FnOnce(&mut Weights)) -> Weights {
    let mut w = Weights::harmonic_only();
    w.harmonic = 0.0;
    f(&mut w);
    w
}

#[rstest]
#[case("8A", "8A", 0)]
#[case("8A", "9A", 1)]
#[case("8A", "7A", 1)]
#[case("12B", "1B", 1)]
#[case("8A", "8B", 1)]
#[case("8A", "11B", 2)]
#[case("11B", "8A", 2)]
#[case("11A", "2B", 2)]
#[case("8A", "10A", 10)]
#[case("8A", "9B", 10)]
#[case("8A", "", 10)]
#[case("junk", "8A", 10)]
fn test_harmonic_table(#[case] a: &str, #[case] b: &str, #[case] expected: u8) {
    assert_eq!(harmonic::distance(key(a), key(b)), expected);
}

#[rstest]
#[case("house", "house", 0.0)]
#[case("", "", 0.0)]
#[case("  House ", "house", 0.0)]
#[case("deep house", "house", 0.15)]
#[case("house", "deep house", 0.15)]
#[case("deep house", "electronic", 0.15)]
#[case("deep house", "tech house", 0.3)]
#[case("house", "techno", 0.3)]
#[case("deep house", "techno", 0.7)]
#[case("deep house", "minimal techno", 0.7)]
// Shared ancestor three levels up still counts as the same family.
#[case("nu disco", "neo soul", 0.7)]
#[case("house", "jazz", 1.0)]
#[case("house", "", 1.0)]
#[case("polka", "zydeco", 1.0)]
fn test_genre_table(#[case] a: &str, #[case] b: &str, #[case] expected: f64) {
    assert_eq!(genre::similarity(a, b), expected);
}

#[rstest]
#[case(128.0, 128.0, 0.0)]
#[case(128.0, 64.0, 0.0)]
#[case(85.0, 170.0, 0.0)]
#[case(126.0, 128.0, 2.0)]
#[case(0.0, 128.0, 0.0)]
fn test_tempo_table(#[case] a: f64, #[case] b: f64, #[case] expected: f64) {
    assert!((tempo::distance(a, b) - expected).abs() < 1e-12);
}

#[test]
fn test_repeat_artist_costs_more() {
    let tracks = indexed(vec![
        TrackBuilder::new("a").artist("x").build(),
        TrackBuilder::new("b").artist("x").build(),
        TrackBuilder::new("c").artist("y").build(),
    ]);
    let (cache, norm) = build_cache(&tracks).unwrap();
    let eval = Evaluator::new(&cache, &norm, &weights_only(|w| w.same_artist = 1.0));

    // a b c repeats once, a c b never does
    assert!((eval.cost_full(&[0, 1, 2]) - 0.5).abs() < 1e-12);
    assert_eq!(eval.cost_full(&[0, 2, 1]), 0.0);
}

#[test]
fn test_unknown_energy_is_neutral() {
    let tracks = indexed(vec![
        TrackBuilder::new("a").energy(2).build(),
        TrackBuilder::new("b").energy(0).build(),
        TrackBuilder::new("c").energy(9).build(),
    ]);
    let (cache, norm) = build_cache(&tracks).unwrap();
    let eval = Evaluator::new(&cache, &norm, &weights_only(|w| w.energy = 1.0));

    assert_eq!(eval.cost_full(&[0, 1, 2]), 0.0);
    // |2 - 9| / ((9 - 2) * 2)
    assert!((eval.cost_full(&[0, 2, 1]) - 0.5).abs() < 1e-12);
}

#[test]
fn test_position_bias_prefers_quiet_openers() {
    let tracks = indexed(vec![
        TrackBuilder::new("loud").energy(10).build(),
        TrackBuilder::new("mid").energy(5).build(),
        TrackBuilder::new("quiet").energy(1).build(),
        TrackBuilder::new("x").energy(5).build(),
    ]);
    let (cache, norm) = build_cache(&tracks).unwrap();
    let eval = Evaluator::new(
        &cache,
        &norm,
        &weights_only(|w| {
            w.position_bias = 1.0;
            w.position_bias_portion = 0.5;
        }),
    );

    let quiet_first = eval.score_full(&[2, 1, 0, 3]);
    let loud_first = eval.score_full(&[0, 1, 2, 3]);
    assert!(quiet_first.position_bias < loud_first.position_bias);

    // cutoff = 2: position 0 full weight, position 1 half, the rest nothing
    let expected = (10.0 * 1.0 + 5.0 * 0.5) / 10.0;
    assert!((loud_first.position_bias - expected).abs() < 1e-12);
    assert_eq!(loud_first.get(Component::Harmonic), 0.0);
}

#[test]
fn test_sample_crate_breakdown_is_consistent() {
    let tracks = sample_crate();
    let (cache, norm) = build_cache(&tracks).unwrap();
    let eval = Evaluator::new(&cache, &norm, &Weights::default());
    let genes: Vec<usize> = (0..tracks.len()).collect();

    let detail = eval.score_full(&genes);
    assert!((detail.total - eval.cost_full(&genes)).abs() < 1e-12);
    for (component, value) in detail.components() {
        assert!(value.is_finite(), "{} is not finite", component);
        assert!(value >= 0.0, "{} went negative", component);
    }
}

#[test]
fn test_reindexing_invalidates_cache() {
    let mut tracks = sample_crate();
    tracks.swap(0, 1);
    assert!(build_cache(&tracks).is_err());
}
