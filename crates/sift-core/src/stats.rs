//! Gap statistics shared by the recurrence detector and the inventory tracker
//!
//! Both classify purchase cadence the same way: mean day-gap plus population
//! standard deviation over the gaps between consecutive dated events.

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for fewer than two samples
pub fn std_dev_population(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[5.0]), 5.0);
        assert_eq!(mean(&[30.0, 31.0, 29.0, 30.0]), 30.0);
    }

    #[test]
    fn test_std_dev_population() {
        assert_eq!(std_dev_population(&[]), 0.0);
        assert_eq!(std_dev_population(&[30.0]), 0.0);
        assert_eq!(std_dev_population(&[30.0, 30.0, 30.0]), 0.0);
        // gaps [30,31,29,30]: deviations 0,1,-1,0 -> variance 0.5
        let sd = std_dev_population(&[30.0, 31.0, 29.0, 30.0]);
        assert!((sd - 0.5f64.sqrt()).abs() < 1e-12);
        // gaps [5,40,12,33]: wildly irregular
        let sd = std_dev_population(&[5.0, 40.0, 12.0, 33.0]);
        assert!(sd > 14.0);
    }
}
