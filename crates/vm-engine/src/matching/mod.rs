pub mod availability;
pub mod interest;
pub mod location;
pub mod pipeline;
pub mod scoring;
pub mod skills;
pub mod weights;
