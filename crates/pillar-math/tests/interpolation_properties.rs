//! Property tests for interpolators and root finders.

use pillar_math::prelude::*;
use proptest::prelude::*;

/// Strictly increasing abscissae with gaps in (0.05, 3).
fn nodes(min: usize, max: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.05f64..3.0, 0.2f64..1.5), min..max).prop_map(|pairs| {
        let mut x = 0.0;
        let mut xs = Vec::with_capacity(pairs.len());
        let mut ys = Vec::with_capacity(pairs.len());
        for (gap, y) in pairs {
            x += gap;
            xs.push(x);
            ys.push(y);
        }
        (xs, ys)
    })
}

/// Increasing node values.
fn monotone_nodes() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    nodes(3, 12).prop_map(|(xs, steps)| {
        let mut y = 0.0;
        let ys = steps
            .iter()
            .map(|s| {
                y += s * s * s;
                y
            })
            .collect();
        (xs, ys)
    })
}

fn methods() -> Vec<InterpolationMethod> {
    vec![
        InterpolationMethod::Linear,
        InterpolationMethod::LogLinear,
        InterpolationMethod::BackwardFlat,
        InterpolationMethod::NaturalCubic,
        InterpolationMethod::MonotonicCubic,
        InterpolationMethod::KrugerCubic,
        InterpolationMethod::not_a_knot_spline(false),
        InterpolationMethod::Cubic {
            derivative: CubicDerivative::FritschButland,
            left: CubicBoundary::NotAKnot,
            right: CubicBoundary::NotAKnot,
            monotonic: false,
        },
    ]
}

proptest! {
    #[test]
    fn every_method_passes_through_nodes((xs, ys) in nodes(2, 10)) {
        for method in methods() {
            let interp = method.build(xs.clone(), ys.clone(), false).unwrap();
            for (x, y) in xs.iter().zip(ys.iter()) {
                let value = interp.interpolate(*x).unwrap();
                prop_assert!((value - y).abs() < 1e-12 * y.abs().max(1.0), "{method} at {x}");
            }
        }
    }

    #[test]
    fn hyman_filter_keeps_monotone_data_monotone((xs, ys) in monotone_nodes()) {
        let interp = InterpolationMethod::MonotonicCubic.build(xs.clone(), ys, false).unwrap();
        let (lo, hi) = (xs[0], xs[xs.len() - 1]);
        let mut prev = interp.interpolate(lo).unwrap();
        for k in 1..=400 {
            let x = lo + (hi - lo) * f64::from(k) / 400.0;
            let value = interp.interpolate(x.min(hi)).unwrap();
            prop_assert!(value >= prev - 1e-12);
            prev = value;
        }
    }

    #[test]
    fn primitive_matches_quadrature((xs, ys) in nodes(3, 8)) {
        for method in methods() {
            let interp = method.build(xs.clone(), ys.clone(), false).unwrap();
            // composite Simpson inside each segment, exact for cubics
            let mut sum = 0.0;
            for w in xs.windows(2) {
                let steps = 40;
                let h = (w[1] - w[0]) / f64::from(steps);
                for k in 0..steps {
                    let a = w[0] + f64::from(k) * h;
                    let m = a + h / 2.0;
                    let b = if k + 1 == steps { w[1] } else { a + h };
                    // a backward-flat node takes the value of the segment to its left
                    let fa = interp.interpolate(if k == 0 { a + h * 1e-9 } else { a }).unwrap();
                    let fm = interp.interpolate(m).unwrap();
                    let fb = interp.interpolate(b).unwrap();
                    sum += h / 6.0 * (fa + 4.0 * fm + fb);
                }
            }
            let primitive = interp.primitive(xs[xs.len() - 1]).unwrap();
            prop_assert!((primitive - sum).abs() < 1e-8 * sum.abs().max(1.0), "{method}");
        }
    }

    #[test]
    fn brent_and_newton_agree(target in 0.01f64..0.99, guess in 0.0f64..1.0) {
        let f = |x: f64| Ok::<_, MathError>(x.powi(3) + x - target * 2.0);
        let config = SolverConfig::default();
        let a = brent(f, guess, 0.0, 1.0, &config).unwrap().root;
        let b = newton_safe(f, guess, 0.0, 1.0, &config).unwrap().root;
        prop_assert!((a - b).abs() < 1e-10);
    }
}
