/// Least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a first-degree polynomial through `points`.
///
/// Returns `None` with fewer than two points or when every x is identical.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
    let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
    let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();
    let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < f64::EPSILON {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(LinearFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line_is_recovered() {
        let fit = linear_fit(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-9);
        assert!((fit.intercept - 1.0).abs() < 1e-9);
        assert!((fit.at(4.0) - 9.0).abs() < 1e-9);
    }

    #[test]
    fn noisy_points_fit_least_squares() {
        let fit = linear_fit(&[(1.0, 10.0), (3.0, 30.0), (4.0, 20.0)]).unwrap();
        // mean x = 8/3, mean y = 20; Sxy = 20, Sxx = 14/3
        assert!((fit.slope - 30.0 / 7.0).abs() < 1e-9);
        assert!((fit.intercept - (20.0 - 30.0 / 7.0 * 8.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn too_few_points_have_no_fit() {
        assert_eq!(linear_fit(&[]), None);
        assert_eq!(linear_fit(&[(2.0, 40.0)]), None);
        assert_eq!(linear_fit(&[(2.0, 40.0), (2.0, 50.0)]), None);
    }
}
