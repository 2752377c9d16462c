use rand::distributions::{Distribution, Uniform};
use rand_seeder::{Seeder, SipRng};

use crate::types::Time;
use crate::utils::prelude::*;

const DEFAULT_SEED: &str = "stripy zebra";

/// Where the burst lengths come from. Every process is present at time 0.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "type")]
pub enum WorkloadConfig {
    Fixed {
        bursts: Vec<Time>,
    },
    Random {
        count: usize,
        low: Time,
        high: Time,
        /// Optional seed, so that a run can be reproduced
        seed: Option<String>,
    },
}

/// Materialize the burst lengths described by the config
pub fn bursts(cfg: &WorkloadConfig) -> Result<Vec<Time>> {
    let bursts = match cfg {
        WorkloadConfig::Fixed { bursts } => bursts.clone(),
        WorkloadConfig::Random { count, low, high, seed } => {
            if low > high {
                return Err(Error::invalid_argument(format!(
                    "empty burst range {}..={}",
                    low, high
                )));
            }
            let rng: SipRng = Seeder::from(seed.as_deref().unwrap_or(DEFAULT_SEED)).make_rng();
            Uniform::new_inclusive(*low, *high)
                .sample_iter(rng)
                .take(*count)
                .collect()
        }
    };
    debug!(?bursts, "workload");
    Ok(bursts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random(seed: Option<&str>) -> WorkloadConfig {
        WorkloadConfig::Random {
            count: 20,
            low: 1,
            high: 6,
            seed: seed.map(Into::into),
        }
    }

    #[test]
    fn fixed_is_verbatim() {
        let cfg = WorkloadConfig::Fixed { bursts: vec![5, 0, 8] };
        assert_eq!(bursts(&cfg).unwrap(), vec![5, 0, 8]);
    }

    #[test]
    fn random_is_reproducible_and_in_range() {
        let a = bursts(&random(Some("abc"))).unwrap();
        let b = bursts(&random(Some("abc"))).unwrap();
        assert_eq!(a.len(), 20);
        assert_eq!(a, b);
        assert!(a.iter().all(|b| (1..=6).contains(b)));

        assert_eq!(bursts(&random(None)).unwrap(), bursts(&random(None)).unwrap());
    }

    #[test]
    fn random_rejects_empty_range() {
        let cfg = WorkloadConfig::Random {
            count: 3,
            low: 5,
            high: 4,
            seed: None,
        };
        assert!(matches!(bursts(&cfg), Err(Error::InvalidArgument(_))));
    }
}
