/// Order Crossover (OX) into a preallocated child.
///
/// Copies `p1[cut1..=cut2]` in place, then fills the remaining positions,
/// starting after `cut2` and wrapping, with `p2`'s genes in `p2`'s order
/// (also starting after `cut2`), skipping genes already placed.
///
/// Genes are track indices `0..n`; `placed` is scratch of length >= n.
pub fn order_crossover(
    dst: &mut [usize],
    p1: &[usize],
    p2: &[usize],
    rng: &mut fastrand::Rng,
    placed: &mut [bool],
) {
    let n = p1.len();
    debug_assert_eq!(p2.len(), n);
    debug_assert_eq!(dst.len(), n);
    if n == 0 {
        return;
    }

    let (mut a, mut b) = (rng.usize(0..n), rng.usize(0..n));
    if a > b {
        std::mem::swap(&mut a, &mut b);
    }
    crossover_between(dst, p1, p2, a, b, placed);
}

/// OX with explicit, ordered cut points.
pub(crate) fn crossover_between(
    dst: &mut [usize],
    p1: &[usize],
    p2: &[usize],
    cut1: usize,
    cut2: usize,
    placed: &mut [bool],
) {
    let n = p1.len();
    placed[..n].fill(false);

    for i in cut1..=cut2 {
        dst[i] = p1[i];
        placed[p1[i]] = true;
    }

    let mut pos = (cut2 + 1) % n;
    let mut from = (cut2 + 1) % n;
    for _ in 0..(n - (cut2 - cut1 + 1)) {
        while placed[p2[from]] {
            from = (from + 1) % n;
        }
        dst[pos] = p2[from];
        placed[p2[from]] = true;
        pos = (pos + 1) % n;
        from = (from + 1) % n;
    }
}
