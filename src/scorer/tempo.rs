/// Smallest BPM gap between two tracks when half-time and double-time mixes
/// count as equivalent. Unknown tempo (0 or negative) contributes nothing.
pub fn distance(bpm_a: f64, bpm_b: f64) -> f64 {
    if bpm_a <= 0.0 || bpm_b <= 0.0 || !bpm_a.is_finite() || !bpm_b.is_finite() {
        return 0.0;
    }

    [
        (bpm_a - bpm_b).abs(),
        (bpm_a * 0.5 - bpm_b).abs(),
        (bpm_a * 2.0 - bpm_b).abs(),
        (bpm_a - bpm_b * 0.5).abs(),
        (bpm_a - bpm_b * 2.0).abs(),
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}
