use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::cell::Cell;
use crate::models::record::PlayerRecord;

/// Values substituted into the membership templates.
///
/// Field names are the placeholder names used inside the `.docx` templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    pub playername: String,
    pub playergender: String,
    pub playeraddress: String,
    pub playerdob: String,
    pub contactemail: String,
    pub medicalconditions: String,
    pub participation_training: String,
    pub participation_play_matches: String,
    pub photo_cons: String,
    pub player_role: String,
    pub primary_phonenumber: String,
    pub primary_contact: String,
    pub secondary_phonenumber: String,
    pub secondary_contact: String,
    pub parentname: String,
    pub parentaddress: String,
    pub parentdob: String,
    pub parentphonenumber: String,
    pub currentdate: String,
}

impl RenderContext {
    /// Build the context for `record`, stamped with `today`.
    ///
    /// Never fails: unparseable dates fall through as their raw text.
    pub fn build(record: &PlayerRecord, today: Date) -> Self {
        Self {
            playername: record.player_name.clone(),
            playergender: record.gender_id.to_string(),
            playeraddress: record.address.to_string(),
            playerdob: format_date(&record.date_of_birth),
            contactemail: record.email.to_string(),
            medicalconditions: record.medical_conditions.to_string(),
            participation_training: record.train.yes_no().to_string(),
            participation_play_matches: record.play.yes_no().to_string(),
            photo_cons: record.photo_consent.yes_no().to_string(),
            player_role: record.role.to_string(),
            primary_phonenumber: record.primary_phone.to_string(),
            primary_contact: record.primary_contact.to_string(),
            secondary_phonenumber: record.secondary_phone.or_empty(),
            secondary_contact: record.secondary_contact.or_empty(),
            parentname: record.guardian_name.or_empty(),
            parentaddress: record.guardian_address.or_empty(),
            parentdob: format_date(&record.guardian_date_of_birth),
            parentphonenumber: record.guardian_mobile.or_empty(),
            currentdate: today.to_string(),
        }
    }
}

/// Normalize an ISO-8601 date, datetime or timestamp to `YYYY-MM-DD`.
///
/// Anything that does not parse is returned as-is; empty cells become `""`.
pub fn format_date(value: &Cell) -> String {
    let raw = value.or_empty();
    match parse_iso_date(&raw) {
        Some(date) => date.to_string(),
        None => raw,
    }
}

fn parse_iso_date(s: &str) -> Option<Date> {
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = s.parse::<Date>() {
        return Some(date);
    }
    if let Ok(dt) = s.parse::<DateTime>() {
        return Some(dt.date());
    }
    // `Z`-suffixed instants are rejected by the civil parsers.
    s.parse::<Timestamp>()
        .ok()
        .map(|ts| ts.to_zoned(TimeZone::UTC).date())
}
