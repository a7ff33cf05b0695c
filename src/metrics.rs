//! Goodness-of-fit metrics for simulated vs. observed gauge flow.
//!
//! Both series must have equal length; trim any warm-up months before
//! calling (e.g. `&flow[6..]`).

/// Nash-Sutcliffe Efficiency. Range: (-inf, 1], 1 = perfect.
///
/// Returns `f64::NEG_INFINITY` when the observed series is constant (the
/// spread term vanishes and the efficiency is undefined).
pub fn nse(observed: &[f64], simulated: &[f64]) -> f64 {
    check_lengths(observed, simulated);
    let mean_obs = mean(observed);
    let (residual, spread) = observed.iter().zip(simulated).fold(
        (0.0, 0.0),
        |(residual, spread), (o, s)| {
            (residual + (o - s).powi(2), spread + (o - mean_obs).powi(2))
        },
    );
    if spread == 0.0 {
        return f64::NEG_INFINITY;
    }
    1.0 - residual / spread
}

/// Root Mean Square Error. Range: [0, inf), 0 = perfect.
pub fn rmse(observed: &[f64], simulated: &[f64]) -> f64 {
    check_lengths(observed, simulated);
    let residual: f64 = observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (o - s).powi(2))
        .sum();
    (residual / observed.len() as f64).sqrt()
}

fn check_lengths(observed: &[f64], simulated: &[f64]) {
    assert_eq!(
        observed.len(),
        simulated.len(),
        "observed and simulated series must have the same length"
    );
}

fn mean(series: &[f64]) -> f64 {
    series.iter().sum::<f64>() / series.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn nse_perfect_match() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_relative_eq!(nse(&obs, &obs), 1.0);
    }

    #[test]
    fn nse_mean_simulation_gives_zero() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sim = [3.0; 5];
        assert_relative_eq!(nse(&obs, &sim), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn nse_constant_observed_returns_neg_inf() {
        let obs = [5.0; 5];
        let sim = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(nse(&obs, &sim), f64::NEG_INFINITY);
    }

    #[test]
    fn nse_poor_simulation_negative() {
        let obs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let sim = [5.0, 4.0, 3.0, 2.0, 1.0];
        assert!(nse(&obs, &sim) < 0.0);
    }

    #[test]
    #[should_panic(expected = "same length")]
    fn nse_panics_on_mismatched_lengths() {
        nse(&[1.0, 2.0], &[1.0]);
    }

    #[test]
    fn rmse_known_value() {
        let obs = [1.0, 2.0, 3.0];
        let sim = [2.0, 2.0, 3.0];
        assert_relative_eq!(rmse(&obs, &sim), (1.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn rmse_zero_for_perfect_match() {
        let obs = [1.0, 2.0, 3.0];
        assert_relative_eq!(rmse(&obs, &obs), 0.0);
    }
}
