use crate::consts::{SCORE_EPSILON, TWO_OPT_MAX_ITERATIONS};
use crate::scorer::Evaluator;
use tracing::{debug, warn};

/// 2-opt with don't-look bits, in place. Returns the final full cost.
///
/// A reversal of `[i, j]` is kept only if it lowers the cost by more than
/// `SCORE_EPSILON`; each trial re-scores `[i, min(j + 1, n - 1)]` only.
/// Any improvement re-opens every position.
///
/// `exhausted` is scratch space for the don't-look bits and must hold at
/// least `genes.len()` entries; its contents on entry are ignored.
///
/// # Panics
///
/// If `exhausted` is shorter than `genes`.
pub fn refine(genes: &mut [usize], eval: &Evaluator, exhausted: &mut [bool]) -> f64 {
    let n = genes.len();
    if n < 2 {
        return eval.cost_full(genes);
    }

    let mut total = eval.cost_full(genes);
    let start_cost = total;
    let exhausted = &mut exhausted[..n];
    exhausted.fill(false);
    let mut passes = 0;

    loop {
        if passes >= TWO_OPT_MAX_ITERATIONS {
            warn!(
                "2-opt stopped at the {} pass cap (cost {:.6})",
                TWO_OPT_MAX_ITERATIONS, total
            );
            break;
        }
        passes += 1;

        let mut improved = false;
        for i in 0..n - 1 {
            if exhausted[i] {
                continue;
            }

            let mut improved_here = false;
            for j in (i + 1)..n {
                let end = (j + 1).min(n - 1);
                let before = eval.cost_range(genes, i, end);
                genes[i..=j].reverse();
                let delta = eval.cost_range(genes, i, end) - before;

                if delta < -SCORE_EPSILON {
                    total += delta;
                    improved_here = true;
                    improved = true;
                    exhausted.fill(false);
                } else {
                    genes[i..=j].reverse();
                }
            }

            if !improved_here {
                exhausted[i] = true;
            }
        }

        if !improved {
            break;
        }
    }

    // running total drifts with rounding
    let total = eval.cost_full(genes);
    debug!(
        "2-opt: {} passes, {:.6} -> {:.6}",
        passes, start_cost, total
    );
    total
}
