//! Raid registration rules.
//!
//! Covers the value sets stored on participants, teams and documents, the
//! minority computation, team validation progress, team numbering, invite
//! tokens, and the merge rules for two solo teams.

use chrono::{Datelike, NaiveDate};
use rand::Rng;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Value sets
// ---------------------------------------------------------------------------

pub const SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];

pub const DIFFICULTY_DISCOVERY: &str = "discovery";
pub const DIFFICULTY_SPORTS: &str = "sports";
pub const DIFFICULTY_EXPERT: &str = "expert";
pub const DIFFICULTIES: &[&str] = &[DIFFICULTY_DISCOVERY, DIFFICULTY_SPORTS, DIFFICULTY_EXPERT];

pub const MEETING_PLACES: &[&str] = &["centrale", "bellecour", "anyway"];

pub const DOCUMENT_ID_CARD: &str = "idCard";
pub const DOCUMENT_MEDICAL_CERTIFICATE: &str = "medicalCertificate";
pub const DOCUMENT_STUDENT_CARD: &str = "studentCard";
pub const DOCUMENT_RAID_RULES: &str = "raidRules";
pub const DOCUMENT_PARENT_AUTHORIZATION: &str = "parentAuthorization";
pub const DOCUMENT_TYPES: &[&str] = &[
    DOCUMENT_ID_CARD,
    DOCUMENT_MEDICAL_CERTIFICATE,
    DOCUMENT_STUDENT_CARD,
    DOCUMENT_RAID_RULES,
    DOCUMENT_PARENT_AUTHORIZATION,
];

pub const VALIDATION_PENDING: &str = "pending";
pub const VALIDATION_ACCEPTED: &str = "accepted";
pub const VALIDATION_REFUSED: &str = "refused";
pub const VALIDATION_TEMPORARY: &str = "temporary";
pub const DOCUMENT_VALIDATIONS: &[&str] = &[
    VALIDATION_PENDING,
    VALIDATION_ACCEPTED,
    VALIDATION_REFUSED,
    VALIDATION_TEMPORARY,
];

/// Situations starting with this prefix are school students, who must
/// provide a student card.
pub const SCHOOL_SITUATION_PREFIX: &str = "centrale";

/// `core_data` key under which raid information is stored.
pub const RAID_INFORMATION_SCHEMA: &str = "raid_information";

fn validate_in(kind: &str, value: &str, allowed: &[&str]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid {kind} '{value}'. Must be one of: {}",
            allowed.join(", ")
        )))
    }
}

pub fn validate_size(size: &str) -> Result<(), CoreError> {
    validate_in("size", size, SIZES)
}

pub fn validate_difficulty(difficulty: &str) -> Result<(), CoreError> {
    validate_in("difficulty", difficulty, DIFFICULTIES)
}

pub fn validate_meeting_place(place: &str) -> Result<(), CoreError> {
    validate_in("meeting place", place, MEETING_PLACES)
}

pub fn validate_document_type(document_type: &str) -> Result<(), CoreError> {
    validate_in("document type", document_type, DOCUMENT_TYPES)
}

pub fn validate_document_validation(validation: &str) -> Result<(), CoreError> {
    validate_in("document validation", validation, DOCUMENT_VALIDATIONS)
}

// ---------------------------------------------------------------------------
// Minority
// ---------------------------------------------------------------------------

/// Age of majority.
pub const MAJORITY_AGE: i32 = 18;

/// Whether someone born on `birthday` is still a minor on `reference`.
///
/// A Feb 29 birthday comes of age on Mar 1 in non-leap years.
pub fn is_minor(birthday: NaiveDate, reference: NaiveDate) -> bool {
    let year = birthday.year() + MAJORITY_AGE;
    let majority = NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1));
    match majority {
        Some(majority) => majority > reference,
        None => false,
    }
}

// ---------------------------------------------------------------------------
// Validation progress
// ---------------------------------------------------------------------------

/// Registration items a participant must complete.
///
/// `student_card` and `parent_authorization` are `None` when the item does
/// not apply to the participant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticipantChecklist {
    pub personal_details: bool,
    pub id_card: bool,
    pub medical_certificate: bool,
    pub raid_rules: bool,
    pub student_card: Option<bool>,
    pub parent_authorization: Option<bool>,
    pub security_file: bool,
    pub payment: bool,
    pub attestation_on_honour: bool,
}

impl ParticipantChecklist {
    fn items(&self) -> Vec<bool> {
        let mut items = vec![
            self.personal_details,
            self.id_card,
            self.medical_certificate,
            self.raid_rules,
            self.security_file,
            self.payment,
            self.attestation_on_honour,
        ];
        items.extend(self.student_card);
        items.extend(self.parent_authorization);
        items
    }

    /// Number of items that apply to this participant.
    pub fn total(&self) -> u32 {
        self.items().len() as u32
    }

    /// Number of completed items.
    pub fn completed(&self) -> u32 {
        self.items().into_iter().filter(|done| *done).count() as u32
    }
}

/// Team validation progress in percent.
///
/// A team without a second member is never complete: the missing member
/// counts with as many open items as the captain.
pub fn team_validation_progress(
    captain: &ParticipantChecklist,
    second: Option<&ParticipantChecklist>,
) -> f64 {
    let (done, total) = match second {
        Some(second) => (
            captain.completed() + second.completed(),
            captain.total() + second.total(),
        ),
        None => (captain.completed(), captain.total() * 2),
    };
    if total == 0 {
        return 0.0;
    }
    if done == total {
        return 100.0;
    }
    f64::from(done) * 100.0 / f64::from(total)
}

/// Whether a team has finished registration.
pub fn is_team_validated(progress: f64) -> bool {
    progress >= 100.0
}

// ---------------------------------------------------------------------------
// Team numbering
// ---------------------------------------------------------------------------

/// Numbering base per difficulty (discovery 1xx, sports 2xx, expert 3xx).
pub fn difficulty_number_base(difficulty: &str) -> Option<i32> {
    match difficulty {
        DIFFICULTY_DISCOVERY => Some(100),
        DIFFICULTY_SPORTS => Some(200),
        DIFFICULTY_EXPERT => Some(300),
        _ => None,
    }
}

/// Next number for a validated team given the highest number already
/// assigned in its difficulty.
pub fn next_team_number(base: i32, current_max: Option<i32>) -> i32 {
    match current_max {
        Some(max) if max > base => max + 1,
        _ => base + 1,
    }
}

// ---------------------------------------------------------------------------
// Invites and merges
// ---------------------------------------------------------------------------

/// Length of team invite tokens.
pub const INVITE_TOKEN_LENGTH: usize = 10;

/// Generate a team invite token.
pub fn generate_invite_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(INVITE_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Name of a team produced by merging two teams.
pub fn merged_team_name(first: &str, second: &str) -> String {
    format!("{first} & {second}")
}

/// Keep an attribute on a merged team only when both teams agree on it.
pub fn keep_if_equal<T: PartialEq>(first: Option<T>, second: Option<T>) -> Option<T> {
    match (first, second) {
        (Some(a), Some(b)) if a == b => Some(a),
        _ => None,
    }
}

/// Number of a merged team: the smaller one when both teams had one.
pub fn merged_team_number(first: Option<i32>, second: Option<i32>) -> Option<i32> {
    match (first, second) {
        (Some(a), Some(b)) => Some(a.min(b)),
        _ => None,
    }
}
