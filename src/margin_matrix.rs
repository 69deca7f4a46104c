/// `n_classes × n_classes` asymmetric margin threshold matrix
/// (`SPEC_FULL.md` §4.3), indexed `[predicted_top][predicted_runner_up]`.
///
/// `decrease` and `increase` are deliberately asymmetric, reproduced
/// verbatim from the source: `increase` floors at `theta`, `decrease` does
/// not. See `DESIGN.md` for the open-question note.
pub struct MarginMatrix {
    theta: f64,
    step_size: f64,
    m: Vec<Vec<f64>>,
}

impl MarginMatrix {
    pub fn new(n_classes: usize, theta: f64, step_size: f64) -> Self {
        MarginMatrix {
            theta,
            step_size,
            m: vec![vec![theta; n_classes]; n_classes],
        }
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.m[i][j]
    }

    pub fn decrease(&mut self, i: usize, j: usize) {
        self.m[i][j] *= 1.0 - self.step_size;
    }

    pub fn increase(&mut self, i: usize, j: usize) {
        self.m[i][j] = (self.m[i][j] * (1.0 + self.step_size)).max(self.theta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialized_to_theta() {
        let mm = MarginMatrix::new(3, 0.2, 0.1);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(mm.get(i, j), 0.2);
            }
        }
    }

    #[test]
    fn increase_floors_at_theta_but_decrease_does_not() {
        let mut mm = MarginMatrix::new(2, 0.1, 0.5);
        mm.decrease(0, 1);
        mm.decrease(0, 1);
        mm.decrease(0, 1);
        mm.decrease(0, 1);
        assert!(mm.get(0, 1) < 0.1, "decrease must not be floored at theta");

        mm.increase(0, 1);
        assert!(mm.get(0, 1) >= 0.1, "increase must be floored at theta");
    }

    #[test]
    fn double_decrease_is_square_factor() {
        let mut mm = MarginMatrix::new(2, 0.1, 0.1);
        mm.decrease(1, 0);
        mm.decrease(1, 0);
        let expected = 0.1 * 0.9 * 0.9;
        assert!((mm.get(1, 0) - expected).abs() < 1e-12);
    }
}
