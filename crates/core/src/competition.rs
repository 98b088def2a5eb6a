//! Sport competition rules and FFSU licence register parsing.
//!
//! The FFSU publishes licence holders as an HTML table. The HTTP request
//! lives in the API layer; this module only turns the returned page into
//! [`LicenseRow`]s and decides whether a licence appears in them.
//!
//! Schools field teams per sport, bounded by per-school quotas.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default endpoint of the FFSU licence register.
pub const DEFAULT_FFSU_URL: &str = "https://www.sport-u-licenses.com/sport-u/resultat.php";

/// Timeout applied to register lookups, in seconds.
pub const FFSU_TIMEOUT_SECS: u64 = 10;

/// Leading rows of the results page that are headers, not licence holders.
const HEADER_ROWS: usize = 2;

/// Minimum number of cells in a licence holder row.
const MIN_CELLS: usize = 11;

/// Sports categories.
pub const SPORT_CATEGORIES: &[&str] = &["masculine", "feminine"];

/// Error raised while reading the licence register.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The register could not be reached or answered with an error status.
    #[error("Licence register request failed: {0}")]
    Request(String),

    /// A CSS selector failed to compile.
    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// One licence holder row of the FFSU register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRow {
    pub licenses: Vec<String>,
    pub name: String,
    pub firstname: String,
    pub sport_without_constraints: String,
    pub sport_with_constraints: String,
}

/// Form fields posted to the register for a lookup.
pub fn ffsu_form(school_ffsu_id: &str, name: &str, firstname: &str) -> Vec<(&'static str, String)> {
    vec![
        ("NUMAS", school_ffsu_id.to_string()),
        ("NOM", name.to_string()),
        ("PRENOM", firstname.to_string()),
        ("SPORT", "tous".to_string()),
        ("SUBMIT", "Valider".to_string()),
    ]
}

/// Parse the licence holder rows out of a register results page.
///
/// Rows with fewer cells than a full holder row are skipped.
pub fn parse_license_rows(html: &str) -> Result<Vec<LicenseRow>, ScrapeError> {
    let document = Html::parse_document(html);
    let row_selector =
        Selector::parse("tr").map_err(|e| ScrapeError::Selector(e.to_string()))?;
    let cell_selector =
        Selector::parse("td").map_err(|e| ScrapeError::Selector(e.to_string()))?;

    let rows = document
        .select(&row_selector)
        .skip(HEADER_ROWS)
        .filter_map(|row| {
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect();
            if cells.len() < MIN_CELLS {
                return None;
            }
            Some(LicenseRow {
                licenses: cells[0].split_whitespace().map(str::to_string).collect(),
                name: cells[4].clone(),
                firstname: cells[5].clone(),
                sport_without_constraints: cells[9].clone(),
                sport_with_constraints: cells[10].clone(),
            })
        })
        .collect();

    Ok(rows)
}

/// Whether `license` is listed in any of the rows.
pub fn has_license(rows: &[LicenseRow], license: &str) -> bool {
    let license = license.trim();
    !license.is_empty() && rows.iter().any(|row| row.licenses.iter().any(|l| l == license))
}

/// Validate a sport definition.
pub fn validate_sport(
    name: &str,
    team_size: i32,
    substitute_max: Option<i32>,
    category: Option<&str>,
) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Sport name must not be empty".into()));
    }
    if team_size < 1 {
        return Err(CoreError::Validation(
            "team_size must be at least 1".into(),
        ));
    }
    if substitute_max.is_some_and(|max| max < 0) {
        return Err(CoreError::Validation(
            "substitute_max must not be negative".into(),
        ));
    }
    if let Some(category) = category {
        if !SPORT_CATEGORIES.contains(&category) {
            return Err(CoreError::Validation(format!(
                "Invalid sport category '{category}'. Must be one of: {}",
                SPORT_CATEGORIES.join(", ")
            )));
        }
    }
    Ok(())
}

/// Whether one more entry fits when `current` are already counted.
/// No quota means no limit.
pub fn within_quota(current: i64, quota: Option<i32>) -> bool {
    match quota {
        Some(quota) => current < i64::from(quota),
        None => true,
    }
}

/// Validate a school's quotas for a sport.
pub fn validate_quota(
    participant_quota: Option<i32>,
    team_quota: Option<i32>,
) -> Result<(), CoreError> {
    if participant_quota.is_some_and(|q| q < 0) || team_quota.is_some_and(|q| q < 0) {
        return Err(CoreError::Validation("Quotas must not be negative".into()));
    }
    Ok(())
}

/// Whether a team sport accepts teams at all.
pub fn is_team_sport(team_size: i32) -> bool {
    team_size > 1
}

/// Whether a team still has a seat for a player, or for a substitute.
///
/// Players are capped by the sport's team size. Substitutes are capped by
/// `substitute_max`, unlimited when unset.
pub fn team_has_room(
    team_size: i32,
    substitute_max: Option<i32>,
    players: i64,
    substitutes: i64,
    substitute: bool,
) -> bool {
    if substitute {
        within_quota(substitutes, substitute_max)
    } else {
        within_quota(players, Some(team_size))
    }
}
