use rand::Rng;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplingError {
    #[error("weighted choice needs at least one candidate")]
    Empty,
    #[error("candidate {index} has weight {weight}; weights must be positive and finite")]
    InvalidWeight { index: usize, weight: f64 },
    #[error("weights sum to {0}; the total must be finite")]
    TotalOverflow(f64),
}

/// Linear cumulative-sum sampler for short candidate lists.
///
/// Weights need not sum to one; draws are normalized against their total.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedChoice<T> {
    candidates: Vec<(T, f64)>,
    total_weight: f64,
}

impl<T> WeightedChoice<T> {
    pub fn new(candidates: Vec<(T, f64)>) -> Result<Self, SamplingError> {
        if candidates.is_empty() {
            return Err(SamplingError::Empty);
        }

        for (index, (_, weight)) in candidates.iter().enumerate() {
            if !weight.is_finite() || *weight <= 0.0 {
                return Err(SamplingError::InvalidWeight {
                    index,
                    weight: *weight,
                });
            }
        }

        let total_weight: f64 = candidates.iter().map(|(_, weight)| weight).sum();
        if !total_weight.is_finite() {
            return Err(SamplingError::TotalOverflow(total_weight));
        }
        Ok(Self {
            candidates,
            total_weight,
        })
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Expected long-run frequency of the candidate at `index`.
    pub fn probability(&self, index: usize) -> Option<f64> {
        self.candidates
            .get(index)
            .map(|(_, weight)| weight / self.total_weight)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &T {
        let draw = rng.gen_range(0.0..self.total_weight);
        self.pick(draw)
    }

    fn pick(&self, draw: f64) -> &T {
        let mut cumulative = 0.0;
        for (value, weight) in &self.candidates {
            cumulative += weight;
            if cumulative >= draw {
                return value;
            }
        }
        // Rounding in the running sum can leave `draw` just above the last total.
        let (last, _) = &self.candidates[self.candidates.len() - 1];
        last
    }
}

impl<T: Clone> WeightedChoice<T> {
    pub fn sample_cloned<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.sample(rng).clone()
    }
}
