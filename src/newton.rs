//! Bounded Newton-Raphson root finding

/// Iteration budget of [`newton_raphson`]
pub const MAX_ITERATIONS: usize = 100;
/// How many past iterates are checked for a cycle
pub const CYCLE_HISTORY: usize = 8;

/// The iteration budget ran out before reaching a fixed point
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DidNotConverge;

/// Find `x` such that `f(x) == goal`, starting from `initial`.
///
/// `df` is the derivative of `f`. Iteration stops on an exact hit, on a fixed point
/// (`next == x`), or when the next iterate repeats one of the last [`CYCLE_HISTORY`] iterates.
/// Near a root the iterates can cycle through a few values a bit apart in the last place; the
/// member of the cycle closest to `goal` wins, the current iterate on ties. Everything is plain
/// `f64` arithmetic so identical inputs always walk the same iterates.
pub fn newton_raphson<F, D>(f: F, df: D, goal: f64, initial: f64) -> Result<f64, DidNotConverge>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let mut x = initial;
    // (iterate, |residual|), newest first
    let mut history = [(0.0, 0.0); CYCLE_HISTORY];
    let mut len = 0;

    for _ in 0..MAX_ITERATIONS {
        let residual = f(x) - goal;
        if residual == 0.0 {
            return Ok(x);
        }
        let next = x - residual / df(x);
        if next == x {
            return Ok(x);
        }

        history.copy_within(0..CYCLE_HISTORY - 1, 1);
        history[0] = (x, libm::fabs(residual));
        len = (len + 1).min(CYCLE_HISTORY);

        if let Some(repeat) = (1..len).find(|&k| history[k].0 == next) {
            let mut best = history[0];
            for &candidate in &history[1..=repeat] {
                if candidate.1 < best.1 {
                    best = candidate;
                }
            }
            return Ok(best.0);
        }
        x = next;
    }

    Err(DidNotConverge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_root() {
        let root = newton_raphson(|x| x * x, |x| 2.0 * x, 2.0, 1.0).unwrap();
        assert!((root - core::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn exact_hit_returns_start() {
        assert_eq!(newton_raphson(|x| 3.0 * x, |_| 3.0, 0.0, 0.0), Ok(0.0));
    }

    #[test]
    fn oscillation_keeps_closer_current_iterate() {
        // From 0 the iterates are 0, 1, 0, ...; at x = 1, |f(1)| = 1 beats |f(0)| = 2
        let f = |x: f64| x * x * x - 2.0 * x + 2.0;
        let df = |x: f64| 3.0 * x * x - 2.0;
        assert_eq!(newton_raphson(f, df, 0.0, 0.0), Ok(1.0));
    }

    #[test]
    fn oscillation_moves_to_closer_next_iterate() {
        // Same cycle entered from 1: at x = 0 the next iterate 1 repeats and is closer
        let f = |x: f64| x * x * x - 2.0 * x + 2.0;
        let df = |x: f64| 3.0 * x * x - 2.0;
        assert_eq!(newton_raphson(f, df, 0.0, 1.0), Ok(1.0));
    }

    // Stand-in slope that sends 1 -> 2 -> 3 -> 1 for f(x) = x
    fn three_cycle_slope(x: f64) -> f64 {
        if x == 1.0 {
            -1.0
        } else if x == 2.0 {
            -2.0
        } else {
            1.5
        }
    }

    #[test]
    fn three_cycle_picks_closest_member() {
        for start in [1.0, 2.0, 3.0] {
            assert_eq!(newton_raphson(|x| x, three_cycle_slope, 0.0, start), Ok(1.0), "start={start}");
        }
    }

    #[test]
    fn three_cycle_prefers_member_nearest_goal() {
        // |x - 2.9| is smallest at 3 whichever member the cycle is noticed from
        for start in [1.0, 2.0, 3.0] {
            let slope = |x: f64| three_cycle_slope(x) * (x - 2.9) / x;
            assert_eq!(newton_raphson(|x| x, slope, 2.9, start), Ok(3.0), "start={start}");
        }
    }

    #[test]
    fn divergent_iteration_does_not_converge() {
        // Newton on atan overshoots further on every step once |x0| > 1.39
        let f = |x: f64| libm::atan(x);
        let df = |x: f64| 1.0 / (1.0 + x * x);
        assert_eq!(newton_raphson(f, df, 0.0, 2.0), Err(DidNotConverge));
    }

    #[test]
    fn nan_derivative_does_not_converge() {
        assert_eq!(newton_raphson(|x| x - 1.0, |_| f64::NAN, 0.0, 0.0), Err(DidNotConverge));
    }

    #[test]
    fn deterministic() {
        let f = |x: f64| libm::exp(x) - 3.0 * x;
        let df = |x: f64| libm::exp(x) - 3.0;
        assert_eq!(newton_raphson(f, df, 0.5, 0.0), newton_raphson(f, df, 0.5, 0.0));
    }
}
