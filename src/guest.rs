// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Guest identity.
//!
//! A guest is known to the backend by three cookies: `guest_name` (the
//! percent-encoded `Last-First` form), a random `guest_uuid`, and a
//! `table_number`. The identity is stored with confy and, like the cookies it
//! stands in for, stops being valid a year after it was issued.

use chrono::{DateTime, Duration, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::CONFIG_NAME;

const GUEST_STORE_NAME: &str = "guest";

pub(crate) const MAX_NAME_LEN: usize = 20;

const IDENTITY_LIFETIME_DAYS: i64 = 365;

/// Characters left untouched by a URI component encoder.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum NameError {
    #[error("First and last name are both required")]
    Missing,

    #[error("Invalid characters in name. Use letters, numbers, spaces, hyphens.")]
    InvalidCharacters,

    #[error("Name too long (max {MAX_NAME_LEN} chars).")]
    TooLong,
}

/// A validated guest name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GuestName {
    first: String,
    last: String,
}

impl GuestName {
    pub(crate) fn parse(first: &str, last: &str) -> Result<Self, NameError> {
        let first = first.trim();
        let last = last.trim();

        if first.is_empty() || last.is_empty() {
            return Err(NameError::Missing);
        }
        if !first.chars().all(is_name_char) || !last.chars().all(is_name_char) {
            return Err(NameError::InvalidCharacters);
        }
        if first.chars().count() > MAX_NAME_LEN || last.chars().count() > MAX_NAME_LEN {
            return Err(NameError::TooLong);
        }

        Ok(Self {
            first: first.to_string(),
            last: last.to_string(),
        })
    }

    /// The `Last-First` form the backend stores as the author.
    pub(crate) fn encoded(&self) -> String {
        format!("{}-{}", self.last, self.first)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '-' || "áéíóúÁÉÍÓÚñÑ".contains(c)
}

/// Renders a stored `Last-First` author for captions as `Last, First`.
pub(crate) fn caption_author(author: Option<&str>, fallback: &str) -> String {
    match author.map(str::trim).filter(|author| !author.is_empty()) {
        Some(author) => author.split('-').collect::<Vec<_>>().join(", "),
        None => fallback.to_string(),
    }
}

/// Renders a stored `Last-First` name for greetings as `First Last`.
pub(crate) fn display_name(encoded: &str) -> String {
    encoded.split('-').rev().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct GuestIdentity {
    pub(crate) name: String,
    pub(crate) uuid: Uuid,
    pub(crate) table_number: String,
    pub(crate) issued_at: DateTime<Utc>,
}

impl GuestIdentity {
    pub(crate) fn new(name: &GuestName, now: DateTime<Utc>) -> Self {
        Self {
            name: name.encoded(),
            uuid: Uuid::new_v4(),
            table_number: "0".to_string(),
            issued_at: now,
        }
    }

    /// Renames the guest, keeping the uuid so earlier uploads stay theirs.
    pub(crate) fn renamed(&self, name: &GuestName, now: DateTime<Utc>) -> Self {
        Self {
            name: name.encoded(),
            issued_at: now,
            ..self.clone()
        }
    }

    pub(crate) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.issued_at > Duration::days(IDENTITY_LIFETIME_DAYS)
    }

    pub(crate) fn display_name(&self) -> String {
        display_name(&self.name)
    }
}

/// Builds the `Cookie` header value sent with every request.
pub(crate) fn cookie_header(identity: Option<&GuestIdentity>, admin_token: Option<&str>) -> Option<String> {
    let mut pairs = Vec::new();

    if let Some(identity) = identity {
        pairs.push(format!("guest_name={}", utf8_percent_encode(&identity.name, COMPONENT)));
        pairs.push(format!("guest_uuid={}", identity.uuid));
        pairs.push(format!("table_number={}", utf8_percent_encode(&identity.table_number, COMPONENT)));
    }
    if let Some(token) = admin_token.filter(|token| !token.is_empty()) {
        pairs.push(format!("admin_token={}", utf8_percent_encode(token, COMPONENT)));
    }

    if pairs.is_empty() { None } else { Some(pairs.join("; ")) }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GuestStore {
    identity: Option<GuestIdentity>,
}

/// Loads the stored identity, treating an expired one as absent.
pub(crate) fn load_identity(now: DateTime<Utc>) -> Option<GuestIdentity> {
    let store: GuestStore = confy::load(CONFIG_NAME, GUEST_STORE_NAME).unwrap_or_default();
    store.identity.filter(|identity| !identity.is_expired(now))
}

pub(crate) fn save_identity(identity: &GuestIdentity) -> Result<(), confy::ConfyError> {
    let store = GuestStore {
        identity: Some(identity.clone()),
    };
    confy::store(CONFIG_NAME, GUEST_STORE_NAME, store)
}

pub(crate) fn forget_identity() -> Result<(), confy::ConfyError> {
    confy::store(CONFIG_NAME, GUEST_STORE_NAME, GuestStore::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-06-01T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    #[test]
    fn valid_names_are_trimmed_and_encoded_last_first() {
        let name = GuestName::parse("  María José ", "Núñez-Ruiz").unwrap();

        assert_eq!(name.encoded(), "Núñez-Ruiz-María José");
    }

    #[test]
    fn names_with_symbols_are_rejected() {
        assert_eq!(GuestName::parse("Jane", "Doe;"), Err(NameError::InvalidCharacters));
        assert_eq!(GuestName::parse("<b>", "Doe"), Err(NameError::InvalidCharacters));
    }

    #[test]
    fn names_over_twenty_chars_are_rejected() {
        let long = "a".repeat(21);

        assert_eq!(GuestName::parse(&long, "Doe"), Err(NameError::TooLong));
        assert!(GuestName::parse(&"ñ".repeat(20), "Doe").is_ok());
    }

    #[test]
    fn empty_names_are_rejected() {
        assert_eq!(GuestName::parse("Jane", "   "), Err(NameError::Missing));
    }

    #[test]
    fn author_forms() {
        assert_eq!(caption_author(Some("Doe-Jane"), "Guest"), "Doe, Jane");
        assert_eq!(caption_author(None, "Guest"), "Guest");
        assert_eq!(caption_author(Some(" "), "Invitado"), "Invitado");
        assert_eq!(display_name("Doe-Jane"), "Jane Doe");
    }

    #[test]
    fn cookie_header_percent_encodes_name() {
        let name = GuestName::parse("José", "Doe").unwrap();
        let identity = GuestIdentity::new(&name, now());

        let header = cookie_header(Some(&identity), Some("s3cret")).unwrap();

        assert!(header.starts_with("guest_name=Doe-Jos%C3%A9; guest_uuid="));
        assert!(header.contains(&format!("guest_uuid={}", identity.uuid)));
        assert!(header.contains("table_number=0"));
        assert!(header.ends_with("admin_token=s3cret"));
    }

    #[test]
    fn cookie_header_absent_without_identity_or_token() {
        assert_eq!(cookie_header(None, None), None);
        assert_eq!(cookie_header(None, Some("")), None);
        assert_eq!(cookie_header(None, Some("t")).as_deref(), Some("admin_token=t"));
    }

    #[test]
    fn identity_expires_after_a_year() {
        let name = GuestName::parse("Jane", "Doe").unwrap();
        let identity = GuestIdentity::new(&name, now());

        assert!(!identity.is_expired(now() + Duration::days(364)));
        assert!(identity.is_expired(now() + Duration::days(366)));
    }

    #[test]
    fn rename_keeps_uuid() {
        let identity = GuestIdentity::new(&GuestName::parse("Jane", "Doe").unwrap(), now());
        let renamed = identity.renamed(&GuestName::parse("Janet", "Doe").unwrap(), now());

        assert_eq!(renamed.uuid, identity.uuid);
        assert_eq!(renamed.display_name(), "Janet Doe");
    }
}
