//! Proposal data models
//!
//! Defines a curriculum proposal and the closed set of fields it can belong to.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogRecord;
use crate::error::{invalid_argument, GameError, GameResult};

/// Catalog-assigned identifier, always in `1..=T`
pub type ProposalId = u32;

/// Field of study a proposal belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    Commerce,
    Engineering,
    Statistics,
    ComputerScience,
    Industry,
    Biology,
    Logistics,
    Chemistry,
    Environment,
    Mechanics,
    Administration,
    Law,
    Social,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::Commerce,
        Field::Engineering,
        Field::Statistics,
        Field::ComputerScience,
        Field::Industry,
        Field::Biology,
        Field::Logistics,
        Field::Chemistry,
        Field::Environment,
        Field::Mechanics,
        Field::Administration,
        Field::Law,
        Field::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Commerce => "COMMERCE",
            Field::Engineering => "ENGINEERING",
            Field::Statistics => "STATISTICS",
            Field::ComputerScience => "COMPUTER_SCIENCE",
            Field::Industry => "INDUSTRY",
            Field::Biology => "BIOLOGY",
            Field::Logistics => "LOGISTICS",
            Field::Chemistry => "CHEMISTRY",
            Field::Environment => "ENVIRONMENT",
            Field::Mechanics => "MECHANICS",
            Field::Administration => "ADMINISTRATION",
            Field::Law => "LAW",
            Field::Social => "SOCIAL",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = GameError;

    /// Case-insensitive. Legacy French catalog spellings are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        let field = match normalized.as_str() {
            "COMMERCE" => Field::Commerce,
            "ENGINEERING" | "INGENIERIE" => Field::Engineering,
            "STATISTICS" | "STATISTIQUES" => Field::Statistics,
            "COMPUTER_SCIENCE" | "INFORMATIQUE" => Field::ComputerScience,
            "INDUSTRY" | "INDUSTRIE" => Field::Industry,
            "BIOLOGY" | "BIOLOGIE" => Field::Biology,
            "LOGISTICS" | "LOGISTIQUE" => Field::Logistics,
            "CHEMISTRY" | "CHIMIE" => Field::Chemistry,
            "ENVIRONMENT" | "ENVIRONNEMENT" => Field::Environment,
            "MECHANICS" | "MECANIQUE" => Field::Mechanics,
            "ADMINISTRATION" => Field::Administration,
            "LAW" | "DROIT" => Field::Law,
            "SOCIAL" => Field::Social,
            _ => return Err(GameError::Parse(format!("unknown field '{}'", s))),
        };
        Ok(field)
    }
}

/// A curriculum offering drawn from the catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    id: ProposalId,
    name: String,
    field: Field,
    candidates: u32,
    jobs: u32,
    students: u32,
    graduation_percent: u32,
}

impl Proposal {
    pub const MAX_STUDENTS: u32 = 100;
    pub const MAX_GRADUATION: u32 = 100;

    /// Build a fresh proposal with zero students and zero graduation.
    pub(crate) fn new(
        id: ProposalId,
        name: impl Into<String>,
        field: Field,
        candidates: u32,
        jobs: u32,
    ) -> GameResult<Self> {
        let name = name.into();
        if id == 0 {
            return Err(invalid_argument("proposal id must be positive"));
        }
        if name.trim().is_empty() {
            return Err(invalid_argument(format!("proposal {} has an empty name", id)));
        }
        Ok(Self {
            id,
            name,
            field,
            candidates,
            jobs,
            students: 0,
            graduation_percent: 0,
        })
    }

    /// Typed boundary for raw catalog rows: the field text is parsed here.
    pub fn from_record(id: ProposalId, record: &CatalogRecord) -> GameResult<Self> {
        let field = record.field.parse::<Field>()?;
        Self::new(id, record.name.clone(), field, record.candidates, record.jobs)
    }

    /// Same catalog entry: id, name, field, candidates and jobs all agree.
    pub(crate) fn same_offering(&self, other: &Proposal) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.field == other.field
            && self.candidates == other.candidates
            && self.jobs == other.jobs
    }

    pub fn id(&self) -> ProposalId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn candidates(&self) -> u32 {
        self.candidates
    }

    pub fn jobs(&self) -> u32 {
        self.jobs
    }

    pub fn students(&self) -> u32 {
        self.students
    }

    pub fn graduation_percent(&self) -> u32 {
        self.graduation_percent
    }

    pub(crate) fn set_students(&mut self, students: u32) -> GameResult<()> {
        if students > Self::MAX_STUDENTS {
            return Err(invalid_argument(format!(
                "student count {} exceeds maximum of {}",
                students,
                Self::MAX_STUDENTS
            )));
        }
        self.students = students;
        Ok(())
    }

    pub(crate) fn set_graduation_percent(&mut self, percent: u32) -> GameResult<()> {
        if percent > Self::MAX_GRADUATION {
            return Err(invalid_argument(format!(
                "graduation percentage {} exceeds maximum of {}",
                percent,
                Self::MAX_GRADUATION
            )));
        }
        self.graduation_percent = percent;
        Ok(())
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Field: {}", self.field)?;
        writeln!(f, "Number of candidates: {}", self.candidates)?;
        writeln!(f, "Number of jobs: {}", self.jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_parse_is_case_insensitive() {
        assert_eq!("commerce".parse::<Field>().unwrap(), Field::Commerce);
        assert_eq!("Computer_Science".parse::<Field>().unwrap(), Field::ComputerScience);
        assert_eq!("computer science".parse::<Field>().unwrap(), Field::ComputerScience);
    }

    #[test]
    fn test_field_parse_accepts_legacy_spellings() {
        assert_eq!("Informatique".parse::<Field>().unwrap(), Field::ComputerScience);
        assert_eq!("DROIT".parse::<Field>().unwrap(), Field::Law);
        assert_eq!("mecanique".parse::<Field>().unwrap(), Field::Mechanics);
    }

    #[test]
    fn test_field_parse_rejects_unknown() {
        let err = "ASTROLOGY".parse::<Field>().unwrap_err();
        assert!(matches!(err, GameError::Parse(_)));
    }

    #[test]
    fn test_field_display_round_trips() {
        for field in Field::ALL {
            assert_eq!(field.to_string().parse::<Field>().unwrap(), field);
        }
    }

    #[test]
    fn test_new_proposal_starts_empty() {
        let p = Proposal::new(3, "BUT Chimie", Field::Chemistry, 120, 40).unwrap();
        assert_eq!(p.students(), 0);
        assert_eq!(p.graduation_percent(), 0);
        assert_eq!(p.candidates(), 120);
        assert_eq!(p.jobs(), 40);
    }

    #[test]
    fn test_new_proposal_rejects_empty_name() {
        let err = Proposal::new(1, "   ", Field::Law, 10, 10).unwrap_err();
        assert!(matches!(err, GameError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_record_parses_field() {
        let record = CatalogRecord {
            name: "BUT Informatique".to_string(),
            field: "informatique".to_string(),
            candidates: 300,
            jobs: 90,
        };
        let p = Proposal::from_record(7, &record).unwrap();
        assert_eq!(p.id(), 7);
        assert_eq!(p.field(), Field::ComputerScience);
    }

    #[test]
    fn test_setters_enforce_bounds() {
        let mut p = Proposal::new(1, "BUT GEA", Field::Administration, 80, 20).unwrap();
        assert!(p.set_students(100).is_ok());
        assert!(p.set_students(101).is_err());
        assert_eq!(p.students(), 100);
        assert!(p.set_graduation_percent(0).is_ok());
        assert!(p.set_graduation_percent(150).is_err());
    }

    #[test]
    fn test_same_offering_ignores_operating_parameters() {
        let genuine = Proposal::new(4, "BUT GEII", Field::Engineering, 150, 60).unwrap();
        let mut staffed = genuine.clone();
        staffed.set_students(40).unwrap();
        assert!(genuine.same_offering(&staffed));

        let inflated = Proposal::new(4, "BUT GEII", Field::Engineering, 150, 9999).unwrap();
        assert!(!genuine.same_offering(&inflated));
    }

    #[test]
    fn test_display_lists_details() {
        let p = Proposal::new(1, "BUT TC", Field::Commerce, 200, 30).unwrap();
        let text = p.to_string();
        assert!(text.starts_with("BUT TC\n"));
        assert!(text.contains("Field: COMMERCE"));
        assert!(text.contains("Number of candidates: 200"));
        assert!(text.contains("Number of jobs: 30"));
    }
}
