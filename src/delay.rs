//! Stochastic delay models for synthetic stream generation.
//!
//! `DelayModel` is a closed set of three distributions selected by a
//! configuration string (`kind,param1[,param2]`). Parameters are validated at
//! construction so sampling itself cannot fail. The random source is passed
//! in by the caller, which keeps sampling reproducible under test.

use chrono::Duration;
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

use crate::error::StreamError;

/// A delay distribution: constant, exponential, or normal, in milliseconds.
#[derive(Clone, Copy, Debug)]
pub struct DelayModel(Inner);

#[derive(Clone, Copy, Debug)]
enum Inner {
    Constant {
        delay_ms: f64,
    },
    Exponential {
        mean_ms: f64,
        sampler: Exp<f64>,
    },
    Normal {
        mu_ms: f64,
        sigma_ms: f64,
        sampler: Normal<f64>,
    },
}

impl DelayModel {
    /// Parse a `kind,param1[,param2]` specification.
    ///
    /// Recognized kinds: `const`/`constant` (1 parameter), `exp`/`exponential`
    /// (1 parameter), `norm`/`normal` (2 parameters).
    pub fn parse(spec: &str) -> Result<Self, StreamError> {
        let config_err = |reason: String| StreamError::Config {
            spec: spec.to_string(),
            reason,
        };
        let mut tokens = spec.split(',');
        let kind = tokens.next().unwrap_or_default();
        let params = tokens
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| config_err(format!("'{token}' is not a number")))
            })
            .collect::<Result<Vec<f64>, StreamError>>()?;

        match kind {
            "const" | "constant" => match params[..] {
                [delay_ms] => Ok(Self::constant(delay_ms)),
                _ => Err(config_err(format!(
                    "'{kind}' expects exactly 1 parameter, got {}",
                    params.len()
                ))),
            },
            "exp" | "exponential" => match params[..] {
                [mean_ms] => Self::exponential(mean_ms),
                _ => Err(config_err(format!(
                    "'{kind}' expects exactly 1 parameter, got {}",
                    params.len()
                ))),
            },
            "norm" | "normal" => match params[..] {
                [mu_ms, sigma_ms] => Self::normal(mu_ms, sigma_ms),
                _ => Err(config_err(format!(
                    "'{kind}' expects exactly 2 parameters, got {}",
                    params.len()
                ))),
            },
            _ => Err(config_err(format!("unknown distribution kind '{kind}'"))),
        }
    }

    /// Fixed delay; every sample returns `delay_ms` exactly.
    pub fn constant(delay_ms: f64) -> Self {
        Self(Inner::Constant { delay_ms })
    }

    /// Exponentially distributed delay with mean `mean_ms`, `mean_ms > 0`.
    pub fn exponential(mean_ms: f64) -> Result<Self, StreamError> {
        if !(mean_ms > 0.0) || !mean_ms.is_finite() {
            return Err(StreamError::Config {
                spec: format!("exp,{mean_ms}"),
                reason: "exponential mean must be > 0".to_string(),
            });
        }
        let sampler = Exp::new(1.0 / mean_ms).map_err(|e| StreamError::Config {
            spec: format!("exp,{mean_ms}"),
            reason: e.to_string(),
        })?;
        Ok(Self(Inner::Exponential { mean_ms, sampler }))
    }

    /// Normally distributed delay with mean `mu_ms` and standard deviation
    /// `sigma_ms`, `sigma_ms >= 0`.
    pub fn normal(mu_ms: f64, sigma_ms: f64) -> Result<Self, StreamError> {
        if !(sigma_ms >= 0.0) || !mu_ms.is_finite() {
            return Err(StreamError::Config {
                spec: format!("norm,{mu_ms},{sigma_ms}"),
                reason: "normal sigma must be >= 0".to_string(),
            });
        }
        let sampler = Normal::new(mu_ms, sigma_ms).map_err(|e| StreamError::Config {
            spec: format!("norm,{mu_ms},{sigma_ms}"),
            reason: e.to_string(),
        })?;
        Ok(Self(Inner::Normal {
            mu_ms,
            sigma_ms,
            sampler,
        }))
    }

    /// Stable, filesystem-safe tag encoding kind and parameters.
    ///
    /// Distinct parameter tuples always yield distinct tags; the tag names
    /// the synthetic directory of the stream the model produced.
    pub fn tag(&self) -> String {
        match self.0 {
            Inner::Constant { delay_ms } => format!("const_{}", fmt_param(delay_ms)),
            Inner::Exponential { mean_ms, .. } => format!("exp_{}", fmt_param(mean_ms)),
            Inner::Normal {
                mu_ms, sigma_ms, ..
            } => format!("norm_{}_{}", fmt_param(mu_ms), fmt_param(sigma_ms)),
        }
    }

    /// Draw one delay in milliseconds.
    pub fn sample_ms<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match &self.0 {
            Inner::Constant { delay_ms } => *delay_ms,
            Inner::Exponential { sampler, .. } => sampler.sample(rng),
            Inner::Normal { sampler, .. } => sampler.sample(rng),
        }
    }

    /// Draw one delay as a duration, rounded to microsecond precision.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::microseconds((self.sample_ms(rng) * 1_000.0).round() as i64)
    }
}

/// Integral parameters render without a decimal point (`100`, not `100.0`).
fn fmt_param(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn parses_all_kind_aliases() {
        for spec in ["const,100", "constant,100"] {
            assert_eq!(DelayModel::parse(spec).expect(spec).tag(), "const_100");
        }
        for spec in ["exp,250", "exponential,250"] {
            assert_eq!(DelayModel::parse(spec).expect(spec).tag(), "exp_250");
        }
        for spec in ["norm,20,5", "normal,20,5"] {
            assert_eq!(DelayModel::parse(spec).expect(spec).tag(), "norm_20_5");
        }
    }

    #[test]
    fn rejects_unknown_kind_naming_the_token() {
        let err = DelayModel::parse("weird,1,2,3").expect_err("unknown kind");
        match err {
            StreamError::Config { spec, reason } => {
                assert_eq!(spec, "weird,1,2,3");
                assert!(reason.contains("'weird'"), "reason was: {reason}");
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_parameter_count() {
        for spec in ["const", "const,1,2", "exp,1,2", "norm,1", "norm,1,2,3"] {
            assert!(matches!(
                DelayModel::parse(spec),
                Err(StreamError::Config { .. })
            ));
        }
    }

    #[test]
    fn rejects_non_numeric_parameters() {
        let err = DelayModel::parse("const,fast").expect_err("non-numeric");
        match err {
            StreamError::Config { reason, .. } => assert!(reason.contains("'fast'")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_distribution_parameters() {
        assert!(matches!(
            DelayModel::exponential(0.0),
            Err(StreamError::Config { .. })
        ));
        assert!(matches!(
            DelayModel::exponential(-3.0),
            Err(StreamError::Config { .. })
        ));
        assert!(matches!(
            DelayModel::normal(10.0, -1.0),
            Err(StreamError::Config { .. })
        ));
        // Degenerate but legal: sigma == 0.
        assert!(DelayModel::normal(10.0, 0.0).is_ok());
    }

    #[test]
    fn constant_samples_are_exact() {
        let model = DelayModel::constant(100.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert_eq!(model.sample_ms(&mut rng), 100.0);
            assert_eq!(model.sample(&mut rng), Duration::milliseconds(100));
        }
    }

    #[test]
    fn exponential_converges_to_its_mean() {
        let mean_ms = 250.0;
        let model = DelayModel::exponential(mean_ms).expect("valid mean");
        let mut rng = StdRng::seed_from_u64(7);
        let n = 100_000;
        let mut sum = 0.0;
        for _ in 0..n {
            let sample = model.sample_ms(&mut rng);
            assert!(sample >= 0.0);
            sum += sample;
        }
        let observed = sum / n as f64;
        assert!(
            (observed - mean_ms).abs() < mean_ms * 0.05,
            "observed mean {observed}"
        );
    }

    #[test]
    fn normal_converges_to_mu_and_sigma() {
        let (mu_ms, sigma_ms) = (20.0, 5.0);
        let model = DelayModel::normal(mu_ms, sigma_ms).expect("valid parameters");
        let mut rng = StdRng::seed_from_u64(42);
        let n = 100_000;
        let samples: Vec<f64> = (0..n).map(|_| model.sample_ms(&mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - mu_ms).abs() < 0.5, "observed mean {mean}");
        assert!(
            (variance.sqrt() - sigma_ms).abs() < sigma_ms * 0.05,
            "observed sigma {}",
            variance.sqrt()
        );
    }

    #[test]
    fn tags_are_stable_and_collision_free() {
        let a = DelayModel::parse("norm,20,5").unwrap();
        let b = DelayModel::parse("norm,20,5.5").unwrap();
        let c = DelayModel::parse("norm,20.5,5").unwrap();
        assert_eq!(a.tag(), "norm_20_5");
        assert_eq!(b.tag(), "norm_20_5.5");
        assert_eq!(c.tag(), "norm_20.5_5");
        assert_ne!(a.tag(), b.tag());
        assert_ne!(b.tag(), c.tag());
        // Stable across calls.
        assert_eq!(a.tag(), a.tag());
    }
}
