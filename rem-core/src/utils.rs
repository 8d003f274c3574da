use crate::imports::*;

/// Returns true if `val1` and `val2` are within a relative/absolute `epsilon` of each other,
/// depending on magnitude.  
pub fn almost_eq(val1: f64, val2: f64, epsilon: Option<f64>) -> bool {
    let epsilon = epsilon.unwrap_or(1e-8);
    ((val2 - val1) / (val1 + val2)).abs() < epsilon || (val2 - val1).abs() < epsilon
}

/// Rectangle-rule running integral of `values` over `time`: the first element
/// is 0 and each following element adds `values[i] * (time[i] - time[i - 1])`.
///
/// # Arguments
///
/// * `time` - strictly increasing time vector
/// * `values` - values sampled at `time`, same length
pub fn integrate(time: &[f64], values: &[f64]) -> RemResult<Vec<f64>> {
    if time.len() != values.len() {
        return Err(RemError::InvalidConfiguration(format!(
            "cannot integrate {} values over {} time steps",
            values.len(),
            time.len()
        )));
    }
    let mut total = 0.0;
    Ok(time
        .iter()
        .enumerate()
        .map(|(i, t)| {
            if i > 0 {
                total += values[i] * (t - time[i - 1]);
            }
            total
        })
        .collect())
}

/// Elementwise operations on reference curves.  Every fallible operation names
/// the curve it was called on so faults can be traced back to the reference
/// data.
#[ext(Curve)]
pub impl [f64] {
    /// Returns a copy with every element multiplied by `factor`
    fn scaled(&self, factor: f64) -> Vec<f64> {
        self.iter().map(|v| v * factor).collect()
    }

    /// Returns a copy with every element divided by `divisor`, failing when
    /// `divisor` is zero or not finite
    fn divided(&self, divisor: f64, name: &str) -> RemResult<Vec<f64>> {
        if divisor == 0.0 || !divisor.is_finite() {
            return Err(RemError::InvalidReferenceData(format!(
                "`{name}` divided by degenerate value {divisor}"
            )));
        }
        Ok(self.iter().map(|v| v / divisor).collect())
    }

    /// Largest element, failing on an empty curve
    fn max_value(&self, name: &str) -> RemResult<f64> {
        self.iter()
            .copied()
            .fold(None, |acc: Option<f64>, v| {
                Some(acc.map_or(v, |a| a.max(v)))
            })
            .ok_or_else(|| RemError::InvalidReferenceData(format!("`{name}` is empty")))
    }

    /// Elementwise `self[i] / denom[i]`, failing on length mismatch or any zero
    /// element of `denom`
    fn ratio_to(&self, denom: &[f64], name: &str, denom_name: &str) -> RemResult<Vec<f64>> {
        if self.len() != denom.len() {
            return Err(RemError::InvalidReferenceData(format!(
                "`{name}` has length {} but `{denom_name}` has length {}",
                self.len(),
                denom.len()
            )));
        }
        if let Some(i) = denom.iter().position(|d| *d == 0.0) {
            return Err(RemError::InvalidReferenceData(format!(
                "`{denom_name}` is zero at index {i}"
            )));
        }
        Ok(self.iter().zip(denom).map(|(n, d)| n / d).collect())
    }

    /// Elementwise `self[i] * other[i]`, failing on length mismatch
    fn times(&self, other: &[f64], name: &str, other_name: &str) -> RemResult<Vec<f64>> {
        if self.len() != other.len() {
            return Err(RemError::InvalidReferenceData(format!(
                "`{name}` has length {} but `{other_name}` has length {}",
                self.len(),
                other.len()
            )));
        }
        Ok(self.iter().zip(other).map(|(a, b)| a * b).collect())
    }
}

/// Checks that a scalar used as a denominator is usable, returning it unchanged
pub fn nonzero(value: f64, name: &str) -> RemResult<f64> {
    if value == 0.0 || !value.is_finite() {
        Err(RemError::InvalidReferenceData(format!(
            "`{name}` is {value}, cannot divide by it"
        )))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate() {
        let time = [0.0, 1.0, 3.0, 4.0];
        let vals = [5.0, 2.0, 1.0, 10.0];
        assert_eq!(integrate(&time, &vals).unwrap(), vec![0.0, 2.0, 4.0, 14.0]);
        assert!(integrate(&time, &vals[..2]).is_err());
        assert!(integrate(&[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_curve_ops() {
        let curve = vec![1.0, -2.0, 4.0];
        assert_eq!(curve.scaled(2.0), vec![2.0, -4.0, 8.0]);
        assert_eq!(curve.max_value("curve").unwrap(), 4.0);
        assert!(Vec::<f64>::new().max_value("empty").is_err());
        assert!(curve.divided(0.0, "curve").is_err());
        assert_eq!(
            curve.ratio_to(&[1.0, 2.0, 8.0], "a", "b").unwrap(),
            vec![1.0, -1.0, 0.5]
        );
        assert!(matches!(
            curve.ratio_to(&[1.0, 0.0, 8.0], "a", "b"),
            Err(RemError::InvalidReferenceData(_))
        ));
        assert!(curve.ratio_to(&[1.0], "a", "b").is_err());
        assert!(nonzero(0.0, "zero").is_err());
        assert!(almost_eq(nonzero(2.5, "x").unwrap(), 2.5, None));
    }
}
