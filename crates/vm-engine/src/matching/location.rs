use crate::text::{location_tokens, non_blank};

/// Location compatibility in [0.0, 1.0].
///
/// Free-text locations are compared leniently: exact match wins, shared
/// tokens (commas stripped) still score well, and missing data on either
/// side stays neutral rather than disqualifying.
pub fn score_location(volunteer_location: Option<&str>, job_location: Option<&str>) -> f64 {
    match (non_blank(volunteer_location), non_blank(job_location)) {
        (None, None) => 0.8,
        (None, Some(_)) | (Some(_), None) => 0.6,
        (Some(volunteer), Some(job)) => {
            if volunteer.eq_ignore_ascii_case(job) {
                return 1.0;
            }
            let volunteer_tokens = location_tokens(volunteer);
            let job_tokens = location_tokens(job);
            if volunteer_tokens.intersection(&job_tokens).next().is_some() {
                0.8
            } else {
                0.4
            }
        }
    }
}
