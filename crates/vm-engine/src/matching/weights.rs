/// Match-score weights. Skill compatibility dominates; availability and
/// interest refine the ordering rather than drive it.
pub const MATCH_WEIGHTS: Weights = Weights {
    skill: 0.40,
    location: 0.25,
    availability: 0.20,
    interest: 0.15,
};

#[derive(Debug, Clone, Copy)]
pub struct Weights {
    pub skill: f64,
    pub location: f64,
    pub availability: f64,
    pub interest: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skill + self.location + self.availability + self.interest
    }
}
