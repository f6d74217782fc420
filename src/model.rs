use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// Fixed server page size; the console never asks for anything else.
pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    Pending,
    Processing,
    InTransit,
    Delivered,
    Cancelled,
    OnHold,
    /// Anything the service sends that we don't know about, kept verbatim.
    Other(String),
}

impl DeliveryStatus {
    pub const ALL: [DeliveryStatus; 6] = [
        DeliveryStatus::Pending,
        DeliveryStatus::Processing,
        DeliveryStatus::InTransit,
        DeliveryStatus::Delivered,
        DeliveryStatus::Cancelled,
        DeliveryStatus::OnHold,
    ];

    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "pending" => Self::Pending,
            "processing" => Self::Processing,
            "in_transit" => Self::InTransit,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            "on_hold" => Self::OnHold,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::OnHold => "on_hold",
            Self::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::InTransit => "In Transit",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::OnHold => "On Hold",
            Self::Other(raw) => raw,
        }
    }

    /// Step through the selectable values. Unknown values enter the cycle
    /// at its first (or last) entry.
    pub fn cycle(&self, forward: bool) -> DeliveryStatus {
        let len = Self::ALL.len();
        let idx = Self::ALL.iter().position(|s| s == self);
        let next = match (idx, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        Self::ALL[next].clone()
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DeliveryStatus {
    fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for DeliveryStatus {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        Ok(Self::from_wire(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub event_id: String,
    pub event_name: String,
    pub event_author: String,
    pub delivery_status: DeliveryStatus,
    pub start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPage {
    pub events: Vec<EventSummary>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default, rename = "type")]
    pub user_type: Option<String>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    #[serde(rename = "-created_at")]
    NewestFirst,
    #[serde(rename = "created_at")]
    OldestFirst,
    #[serde(rename = "event_name")]
    NameAsc,
    #[serde(rename = "-event_name")]
    NameDesc,
    #[serde(rename = "start_date")]
    StartSoonest,
    #[serde(rename = "-start_date")]
    StartLatest,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::NewestFirst,
        SortKey::OldestFirst,
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::StartSoonest,
        SortKey::StartLatest,
    ];

    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::NewestFirst => "-created_at",
            SortKey::OldestFirst => "created_at",
            SortKey::NameAsc => "event_name",
            SortKey::NameDesc => "-event_name",
            SortKey::StartSoonest => "start_date",
            SortKey::StartLatest => "-start_date",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::NewestFirst => "Newest First",
            SortKey::OldestFirst => "Oldest First",
            SortKey::NameAsc => "Name A-Z",
            SortKey::NameDesc => "Name Z-A",
            SortKey::StartSoonest => "Start Date (Soonest)",
            SortKey::StartLatest => "Start Date (Latest)",
        }
    }

    pub fn cycle_next(&self) -> SortKey {
        let idx = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Arguments of one GetEvents call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    pub sort: SortKey,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PAGE_SIZE,
            search: String::new(),
            sort: SortKey::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_status_is_kept_verbatim() {
        let s: DeliveryStatus = serde_json::from_str("\"returned_to_sender\"").unwrap();
        assert_eq!(s, DeliveryStatus::Other("returned_to_sender".to_string()));
        assert_eq!(s.label(), "returned_to_sender");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"returned_to_sender\"");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(DeliveryStatus::InTransit.label(), "In Transit");
        assert_eq!(DeliveryStatus::OnHold.label(), "On Hold");
        assert_eq!(DeliveryStatus::from_wire("delivered"), DeliveryStatus::Delivered);
    }

    #[test]
    fn test_status_cycle_wraps() {
        assert_eq!(DeliveryStatus::OnHold.cycle(true), DeliveryStatus::Pending);
        assert_eq!(DeliveryStatus::Pending.cycle(false), DeliveryStatus::OnHold);
        let odd = DeliveryStatus::Other("lost".into());
        assert_eq!(odd.cycle(true), DeliveryStatus::Pending);
    }

    #[test]
    fn test_event_summary_parses_service_payload() {
        let json = r#"{
            "event_id": "ev-1",
            "event_name": "Spring Gala",
            "event_author": "host@example.com",
            "delivery_status": "in_transit",
            "start_date": "2026-05-01",
            "created_at": "2026-03-10T12:00:00Z",
            "ticket_price": 25
        }"#;
        let ev: EventSummary = serde_json::from_str(json).unwrap();
        assert_eq!(ev.delivery_status, DeliveryStatus::InTransit);
        assert_eq!(ev.location, None);
    }

    #[test]
    fn test_user_profile_type_field() {
        let json = r#"{"email":"a@b.c","first_name":"Ada","last_name":"L","type":"organizer"}"#;
        let u: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(u.user_type.as_deref(), Some("organizer"));
        assert_eq!(u.phone_number, None);
        assert_eq!(u.full_name(), "Ada L");
    }

    #[test]
    fn test_sort_default_and_params() {
        assert_eq!(SortKey::default().as_param(), "-created_at");
        assert_eq!(SortKey::StartLatest.cycle_next(), SortKey::NewestFirst);
        let k: SortKey = serde_json::from_str("\"-event_name\"").unwrap();
        assert_eq!(k, SortKey::NameDesc);
    }
}
