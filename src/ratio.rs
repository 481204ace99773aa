//! Ratio engine
//!
//! Pure functions computing the four performance ratios of an accepted set.
//! Nothing is cached: every call walks the list again.
//!
//! Insertion divides by the graduation percentage. A proposal with a zero
//! graduation percentage contributes 0 to the insertion mean and still counts
//! in its denominator.

use serde::{Deserialize, Serialize};

use crate::error::{validation_error, GameResult};
use crate::proposal::Proposal;

pub const ZERO_STUDENTS_MESSAGE: &str = "student count must not be zero";

/// The four KPIs, each rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratios {
    pub attractiveness: f64,
    pub success: f64,
    pub insertion: f64,
    pub satisfaction: f64,
}

impl Ratios {
    pub const ZERO: Ratios = Ratios {
        attractiveness: 0.0,
        success: 0.0,
        insertion: 0.0,
        satisfaction: 0.0,
    };

    /// `[attractiveness, success, insertion, satisfaction]`
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.attractiveness,
            self.success,
            self.insertion,
            self.satisfaction,
        ]
    }
}

/// Mean of `candidates / students`. Requires non-zero students.
pub fn attractiveness(proposals: &[Proposal]) -> GameResult<f64> {
    ensure_students(proposals)?;
    Ok(rounded_mean(proposals, |p| {
        f64::from(p.candidates()) / f64::from(p.students())
    }))
}

/// Mean of `graduation / students`. Requires non-zero students.
pub fn success(proposals: &[Proposal]) -> GameResult<f64> {
    ensure_students(proposals)?;
    Ok(rounded_mean(proposals, |p| {
        f64::from(p.graduation_percent()) / f64::from(p.students())
    }))
}

/// Mean of `jobs / graduation`; zero-graduation proposals contribute 0.
pub fn insertion(proposals: &[Proposal]) -> f64 {
    rounded_mean(proposals, |p| match p.graduation_percent() {
        0 => 0.0,
        graduation => f64::from(p.jobs()) / f64::from(graduation),
    })
}

/// Smallest of the other three ratios
pub fn satisfaction(proposals: &[Proposal]) -> GameResult<f64> {
    let ratios = compute(proposals)?;
    Ok(ratios.satisfaction)
}

/// All four ratios in one pass over the preconditions
pub fn compute(proposals: &[Proposal]) -> GameResult<Ratios> {
    let attractiveness = attractiveness(proposals)?;
    let success = success(proposals)?;
    let insertion = insertion(proposals);
    let satisfaction = round2(attractiveness.min(success).min(insertion));

    Ok(Ratios {
        attractiveness,
        success,
        insertion,
        satisfaction,
    })
}

/// First proposal with zero students, if any
pub fn find_zero_students(proposals: &[Proposal]) -> Option<&Proposal> {
    proposals.iter().find(|p| p.students() == 0)
}

fn ensure_students(proposals: &[Proposal]) -> GameResult<()> {
    match find_zero_students(proposals) {
        Some(_) => Err(validation_error(ZERO_STUDENTS_MESSAGE)),
        None => Ok(()),
    }
}

fn rounded_mean(proposals: &[Proposal], term: impl Fn(&Proposal) -> f64) -> f64 {
    if proposals.is_empty() {
        return 0.0;
    }
    let sum: f64 = proposals.iter().map(term).sum();
    round2(sum / proposals.len() as f64)
}

/// Two decimals, ties to even (`0.125` becomes `0.12`).
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::proposal::Field;
    use pretty_assertions::assert_eq;

    fn accepted(id: u32, candidates: u32, jobs: u32, students: u32, graduation: u32) -> Proposal {
        let mut p = Proposal::new(id, format!("Formation {}", id), Field::Commerce, candidates, jobs).unwrap();
        p.set_students(students).unwrap();
        p.set_graduation_percent(graduation).unwrap();
        p
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        assert_eq!(compute(&[]).unwrap(), Ratios::ZERO);
        assert_eq!(insertion(&[]), 0.0);
    }

    #[test]
    fn test_single_proposal_reference_values() {
        let set = vec![accepted(1, 200, 30, 50, 80)];
        let ratios = compute(&set).unwrap();

        assert_eq!(
            ratios,
            Ratios {
                attractiveness: 4.0,
                success: 1.6,
                insertion: 0.38,
                satisfaction: 0.38,
            }
        );
        assert_eq!(ratios.as_array(), [4.0, 1.6, 0.38, 0.38]);
    }

    #[test]
    fn test_means_over_multiple_proposals() {
        let set = vec![accepted(1, 200, 30, 50, 80), accepted(2, 90, 60, 30, 60)];

        // (4 + 3) / 2
        assert_eq!(attractiveness(&set).unwrap(), 3.5);
        // (1.6 + 2) / 2
        assert_eq!(success(&set).unwrap(), 1.8);
        // (0.375 + 1) / 2 = 0.6875
        assert_eq!(insertion(&set), 0.69);
        assert_eq!(satisfaction(&set).unwrap(), 0.69);
    }

    #[test]
    fn test_rounds_to_two_decimals() {
        let set = vec![accepted(1, 100, 10, 3, 30)];
        assert_eq!(attractiveness(&set).unwrap(), 33.33);
        assert_eq!(success(&set).unwrap(), 10.0);
        assert_eq!(insertion(&set), 0.33);
    }

    #[test]
    fn test_ties_round_to_even() {
        // 1 / 8 = 0.125
        let set = vec![accepted(1, 16, 1, 8, 8)];
        assert_eq!(insertion(&set), 0.12);
        assert_eq!(success(&set).unwrap(), 1.0);

        // 3 / 8 = 0.375
        let set = vec![accepted(1, 16, 3, 8, 8)];
        assert_eq!(insertion(&set), 0.38);
    }

    #[test]
    fn test_zero_graduation_contributes_zero_to_insertion() {
        let set = vec![accepted(1, 200, 30, 50, 80), accepted(2, 100, 50, 20, 0)];

        // (0.375 + 0) / 2 = 0.1875
        assert_eq!(insertion(&set), 0.19);
        let ratios = compute(&set).unwrap();
        assert_eq!(ratios.success, 0.8);
        assert_eq!(ratios.satisfaction, 0.19);
    }

    #[test]
    fn test_zero_students_is_a_validation_error() {
        let set = vec![accepted(1, 200, 30, 50, 80), accepted(2, 100, 50, 0, 0)];

        let err = attractiveness(&set).unwrap_err();
        assert_eq!(err, GameError::Validation(ZERO_STUDENTS_MESSAGE.to_string()));
        assert!(success(&set).is_err());
        assert!(compute(&set).is_err());
        assert_eq!(find_zero_students(&set).map(Proposal::id), Some(2));
    }
}
