use crate::error::LenErr;
use chrono::prelude::*;

/// Days from 0001-01-01 (day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a date to a floating point number of days since 1970-01-01,
/// the same ordinal used by the usual plotting date converters.
pub fn date_to_num(date: &NaiveDate) -> f64 {
    (date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE) as f64
}

/// Minimum and maximum of the finite values, None when there is no finite value.
pub fn finite_min_and_max<'a, I>(s: I) -> Option<(f64, f64)>
where
    I: Iterator<Item = &'a f64>,
{
    let mut finite = s.filter(|v| v.is_finite());
    let first = *finite.next()?;
    let (mut min, mut max) = (first, first);
    for v in finite {
        if *v > max {
            max = *v
        } else if *v < min {
            min = *v
        }
    }
    return Some((min, max));
}

/// First-degree polynomial y = slope * x + intercept.
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

// Ordinary least squares fit of a straight line.
// Pairs with a non-finite x or y are skipped, as missing values.
// The sums are centered on the means to keep the precision
// with large date ordinals (~2E+4 days).
// At least two distinct x values are required, otherwise the slope is undefined;
// identical y values are fine and give a horizontal line.
pub fn linear_fit(x: &[f64], y: &[f64]) -> Result<LinearFit, LenErr> {
    let min_len = 2usize;
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(xe, ye)| xe.is_finite() && ye.is_finite())
        .map(|(xe, ye)| (*xe, *ye))
        .collect();
    let n = pairs.len();
    if n < min_len {
        return Err(LenErr {
            min_len,
            got_len: n,
        });
    }
    let x_mean = pairs.iter().map(|(xe, _)| xe).sum::<f64>() / n as f64;
    let y_mean = pairs.iter().map(|(_, ye)| ye).sum::<f64>() / n as f64;
    let (sxy, sxx) = pairs.iter().fold((0., 0.), |(sxy, sxx), (xe, ye)| {
        let dx = xe - x_mean;
        (sxy + dx * (ye - y_mean), sxx + dx * dx)
    });
    if sxx == 0. {
        // all the points share the same x
        return Err(LenErr {
            min_len,
            got_len: 1,
        });
    }
    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    Ok(LinearFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.)
    }

    #[test]
    fn date_to_num_counts_days_from_unix_epoch() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        let next = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        let recent = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        assert_eq!(date_to_num(&epoch), 0.);
        assert_eq!(date_to_num(&next), 1.);
        assert_eq!(date_to_num(&recent), 19358.);
    }

    #[test]
    fn fit_passes_through_two_points() {
        let x = [19358., 19389.];
        let y = [100., 110.];
        let fit = linear_fit(&x, &y).unwrap();
        println!("{:?}", fit);
        assert!(close(fit.at(x[0]), y[0]));
        assert!(close(fit.at(x[1]), y[1]));
    }

    #[test]
    fn fit_recovers_exact_line() {
        let x: Vec<f64> = (0..20).map(|n| 19000. + 30. * n as f64).collect();
        let y: Vec<f64> = x.iter().map(|xe| 2.5 * xe - 1000.).collect();
        let fit = linear_fit(&x, &y).unwrap();
        assert!(close(fit.slope, 2.5));
        assert!(close(fit.intercept, -1000.));
    }

    #[test]
    fn fit_constant_values_is_horizontal() {
        let x = [1., 2., 3., 4.];
        let y = [7.; 4];
        let fit = linear_fit(&x, &y).unwrap();
        assert_eq!(fit.slope, 0.);
        assert_eq!(fit.at(100.), 7.);
    }

    #[test]
    fn fit_skips_nan_values() {
        let x = [0., 1., 2., 3.];
        let y = [0., f64::NAN, 2., 3.];
        let fit = linear_fit(&x, &y).unwrap();
        assert!(close(fit.slope, 1.));
        assert!(close(fit.intercept, 0.));
    }

    #[test]
    fn fit_empty_is_len_error() {
        let err = linear_fit(&[], &[]).unwrap_err();
        assert_eq!(
            err,
            LenErr {
                min_len: 2,
                got_len: 0
            }
        );
    }

    #[test]
    fn fit_single_date_is_len_error() {
        assert!(linear_fit(&[5.], &[1.]).is_err());
        let err = linear_fit(&[5., 5., 5.], &[1., 2., 3.]).unwrap_err();
        assert_eq!(err.got_len, 1);
    }

    #[test]
    fn min_and_max_ignores_nan() {
        let v = [f64::NAN, 3., -1., 8., f64::NAN];
        assert_eq!(finite_min_and_max(v.iter()), Some((-1., 8.)));
        let none: [f64; 2] = [f64::NAN, f64::INFINITY];
        assert_eq!(finite_min_and_max(none.iter()), None);
    }
}
