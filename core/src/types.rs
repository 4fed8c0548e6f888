//! Shared primitive and categorical types used across the generator.
//!
//! Every categorical column is a closed enum. `as_str()` returns the exact
//! label written to the output table; the order of `ALL` is the order the
//! sampler's weight tables are declared in.

use serde::{Deserialize, Serialize};

/// Applicant identifier, 1-based row index.
pub type ApplicantId = u32;

/// The canonical run identifier.
pub type RunId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Country {
    Syria,
    Afghanistan,
    Sudan,
    Myanmar,
    Eritrea,
    Venezuela,
    Iraq,
    Somalia,
}

impl Country {
    pub const ALL: [Country; 8] = [
        Self::Syria,
        Self::Afghanistan,
        Self::Sudan,
        Self::Myanmar,
        Self::Eritrea,
        Self::Venezuela,
        Self::Iraq,
        Self::Somalia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syria       => "Syria",
            Self::Afghanistan => "Afghanistan",
            Self::Sudan       => "Sudan",
            Self::Myanmar     => "Myanmar",
            Self::Eritrea     => "Eritrea",
            Self::Venezuela   => "Venezuela",
            Self::Iraq        => "Iraq",
            Self::Somalia     => "Somalia",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "Non-binary")]
    NonBinary,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Self::Male, Self::Female, Self::NonBinary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male      => "Male",
            Self::Female    => "Female",
            Self::NonBinary => "Non-binary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EducationLevel {
    None,
    Primary,
    Secondary,
    Tertiary,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 4] =
        [Self::None, Self::Primary, Self::Secondary, Self::Tertiary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None      => "None",
            Self::Primary   => "Primary",
            Self::Secondary => "Secondary",
            Self::Tertiary  => "Tertiary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageProficiency {
    None,
    Basic,
    Intermediate,
    Advanced,
    Fluent,
}

impl LanguageProficiency {
    pub const ALL: [LanguageProficiency; 5] = [
        Self::None,
        Self::Basic,
        Self::Intermediate,
        Self::Advanced,
        Self::Fluent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None         => "None",
            Self::Basic        => "Basic",
            Self::Intermediate => "Intermediate",
            Self::Advanced     => "Advanced",
            Self::Fluent       => "Fluent",
        }
    }
}

/// Convention ground the claim is made under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersecutionGround {
    Race,
    Religion,
    Nationality,
    PoliticalOpinion,
    SocialGroup,
}

impl PersecutionGround {
    pub const ALL: [PersecutionGround; 5] = [
        Self::Race,
        Self::Religion,
        Self::Nationality,
        Self::PoliticalOpinion,
        Self::SocialGroup,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Race             => "race",
            Self::Religion         => "religion",
            Self::Nationality      => "nationality",
            Self::PoliticalOpinion => "political_opinion",
            Self::SocialGroup      => "social_group",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersecutionType {
    Violence,
    Detention,
    Threats,
    SexualViolence,
    Discrimination,
}

impl PersecutionType {
    pub const ALL: [PersecutionType; 5] = [
        Self::Violence,
        Self::Detention,
        Self::Threats,
        Self::SexualViolence,
        Self::Discrimination,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Violence       => "violence",
            Self::Detention      => "detention",
            Self::Threats        => "threats",
            Self::SexualViolence => "sexual_violence",
            Self::Discrimination => "discrimination",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Deny,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deny    => "deny",
        }
    }

    /// The opposite category. Used when a reviewer overrides.
    pub fn flipped(self) -> Self {
        match self {
            Self::Approve => Self::Deny,
            Self::Deny    => Self::Approve,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppealOutcome {
    #[serde(rename = "overturned")]
    Overturned,
    #[serde(rename = "upheld")]
    Upheld,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl AppealOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overturned    => "overturned",
            Self::Upheld        => "upheld",
            Self::NotApplicable => "N/A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasFlag {
    None,
    Moderate,
    Severe,
}

impl BiasFlag {
    pub const ALL: [BiasFlag; 3] = [Self::None, Self::Moderate, Self::Severe];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None     => "none",
            Self::Moderate => "moderate",
            Self::Severe   => "severe",
        }
    }
}

/// Boolean literal pair used in the output table.
pub fn bool_label(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}
