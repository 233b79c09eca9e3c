//! Google Calendar v3 adapter.
//!
//! Speaks the events API shapes directly with serde_json values rather
//! than a generated client: the surface used here is four endpoints. The
//! base URL is injectable so tests can point the adapter at a local mock
//! server.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::ProviderError;
use crate::event::{CalendarEvent, EventTime};
use crate::provider::{CalendarProvider, TimeRange};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/calendar/v3";
const DEFAULT_MAX_RESULTS: u32 = 250;

/// Google Calendar API client.
pub struct GoogleCalendarProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    calendar_id: String,
    token: String,
    max_results: u32,
}

impl GoogleCalendarProvider {
    /// Client for the user's primary calendar with a ready bearer token.
    /// Token acquisition (OAuth) is the embedding application's concern.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            calendar_id: "primary".to_string(),
            token: token.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Client configured from [`Config`] (`week.max_results`).
    pub fn from_config(token: impl Into<String>, config: &Config) -> Self {
        Self::new(token).with_max_results(config.week.max_results)
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Cap the number of events fetched per list call.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    /// Point at a different API root (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.base_url, self.calendar_id)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }
}

impl CalendarProvider for GoogleCalendarProvider {
    fn list_events(&self, range: TimeRange) -> Result<Vec<CalendarEvent>, ProviderError> {
        let url = format!(
            "{}?singleEvents=true&orderBy=startTime&maxResults={}&timeMin={}&timeMax={}",
            self.events_url(),
            self.max_results,
            urlencoding::encode(&range.start.to_rfc3339()),
            urlencoding::encode(&range.end.to_rfc3339()),
        );

        let response: Value = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()?
            .error_for_status()
            .map_err(|e| ProviderError::Api(e.to_string()))?
            .json()?;

        let items = response["items"]
            .as_array()
            .ok_or_else(|| ProviderError::MalformedResponse("missing items array".into()))?;

        // Events with unparseable or missing times are skipped, not errors:
        // the presentation layer only ever works on well-formed snapshots.
        Ok(items.iter().filter_map(parse_gcal_event).collect())
    }

    fn add_event(&self, event: &CalendarEvent) -> Result<CalendarEvent, ProviderError> {
        let body = to_gcal_event(event);
        let created: Value = self
            .client
            .post(self.events_url())
            .bearer_auth(&self.token)
            .json(&body)
            .send()?
            .error_for_status()
            .map_err(|e| ProviderError::Api(e.to_string()))?
            .json()?;

        parse_gcal_event(&created)
            .ok_or_else(|| ProviderError::MalformedResponse("unparseable created event".into()))
    }

    fn update_event(&self, event: &CalendarEvent) -> Result<(), ProviderError> {
        let body = to_gcal_event(event);
        let response = self
            .client
            .put(self.event_url(&event.id))
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::EventNotFound(event.id.clone()));
        }
        response
            .error_for_status()
            .map(|_| ())
            .map_err(|e| ProviderError::Api(e.to_string()))
    }

    fn delete_event(&self, event_id: &str) -> Result<(), ProviderError> {
        let response = self
            .client
            .delete(self.event_url(event_id))
            .bearer_auth(&self.token)
            .send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::EventNotFound(event_id.to_string()));
        }
        response
            .error_for_status()
            .map(|_| ())
            .map_err(|e| ProviderError::Api(e.to_string()))
    }
}

/// Parse a Google Calendar event JSON into a [`CalendarEvent`].
///
/// `start.dateTime`/`end.dateTime` make a timed event; a bare `start.date`
/// makes an all-day event. Anything else (cancelled stubs, missing times)
/// yields `None`.
pub fn parse_gcal_event(value: &Value) -> Option<CalendarEvent> {
    let id = value["id"].as_str()?.to_string();
    let title = value["summary"].as_str().unwrap_or("(no title)").to_string();

    if let (Some(start), Some(end)) = (
        value["start"]["dateTime"].as_str(),
        value["end"]["dateTime"].as_str(),
    ) {
        let start = DateTime::parse_from_rfc3339(start).ok()?.with_timezone(&Utc);
        let end = DateTime::parse_from_rfc3339(end).ok()?.with_timezone(&Utc);
        return Some(CalendarEvent {
            id,
            title,
            time: EventTime::Timed { start, end },
            managed: false,
        });
    }

    if let Some(date) = value["start"]["date"].as_str() {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        return Some(CalendarEvent {
            id,
            title,
            time: EventTime::AllDay { date },
            managed: false,
        });
    }

    None
}

/// Serialize a [`CalendarEvent`] into the Google Calendar event shape.
pub fn to_gcal_event(event: &CalendarEvent) -> Value {
    match event.time {
        EventTime::Timed { start, end } => json!({
            "summary": event.title,
            "start": {"dateTime": start.to_rfc3339()},
            "end": {"dateTime": end.to_rfc3339()},
        }),
        EventTime::AllDay { date } => {
            let date = date.format("%Y-%m-%d").to_string();
            json!({
                "summary": event.title,
                "start": {"date": date},
                "end": {"date": date},
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, 0, 0).unwrap()
    }

    #[test]
    fn parse_timed_event() {
        let value = json!({
            "id": "ev1",
            "summary": "[Task] Write report",
            "start": {"dateTime": "2026-03-02T09:00:00Z"},
            "end": {"dateTime": "2026-03-02T10:00:00Z"},
        });
        let event = parse_gcal_event(&value).unwrap();
        assert_eq!(event.id, "ev1");
        assert!(event.is_managed());
        assert_eq!(event.start(), Some(at(9)));
        assert_eq!(event.end(), Some(at(10)));
    }

    #[test]
    fn parse_all_day_event() {
        let value = json!({
            "id": "ev2",
            "summary": "Offsite",
            "start": {"date": "2026-03-02"},
            "end": {"date": "2026-03-03"},
        });
        let event = parse_gcal_event(&value).unwrap();
        assert_eq!(
            event.time,
            EventTime::AllDay {
                date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
            }
        );
    }

    #[test]
    fn parse_rejects_missing_times() {
        let value = json!({"id": "ev3", "summary": "Broken"});
        assert!(parse_gcal_event(&value).is_none());
    }

    #[test]
    fn round_trip_timed_event() {
        let event = CalendarEvent::timed("ev4", "Standup", at(9), at(10));
        let value = to_gcal_event(&event);
        assert_eq!(value["summary"], "Standup");
        assert!(value["start"]["dateTime"].as_str().is_some());
    }

    #[test]
    fn list_events_against_mock_server() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", Matcher::Regex(r"^/calendars/primary/events".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "items": [
                        {
                            "id": "a",
                            "summary": "Standup",
                            "start": {"dateTime": "2026-03-02T09:00:00Z"},
                            "end": {"dateTime": "2026-03-02T09:30:00Z"},
                        },
                        {"id": "broken", "summary": "No times"},
                    ]
                })
                .to_string(),
            )
            .create();

        let provider = GoogleCalendarProvider::new("token").with_base_url(server.url());
        let events = provider
            .list_events(TimeRange {
                start: at(0),
                end: at(0) + chrono::Duration::days(7),
            })
            .unwrap();

        mock.assert();
        // The malformed entry is filtered, not an error.
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "a");
    }

    #[test]
    fn list_sends_configured_max_results() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", Matcher::Regex(r"^/calendars/primary/events".into()))
            .match_query(Matcher::UrlEncoded("maxResults".into(), "50".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"items": []}).to_string())
            .create();

        let mut config = Config::default();
        config.week.max_results = 50;
        let provider =
            GoogleCalendarProvider::from_config("token", &config).with_base_url(server.url());
        provider
            .list_events(TimeRange {
                start: at(0),
                end: at(1),
            })
            .unwrap();

        mock.assert();
    }

    #[test]
    fn delete_missing_event_maps_to_not_found() {
        let mut server = mockito::Server::new();
        server
            .mock("DELETE", "/calendars/primary/events/ghost")
            .with_status(404)
            .create();

        let provider = GoogleCalendarProvider::new("token").with_base_url(server.url());
        match provider.delete_event("ghost") {
            Err(ProviderError::EventNotFound(id)) => assert_eq!(id, "ghost"),
            other => panic!("expected EventNotFound, got {other:?}"),
        }
    }

    #[test]
    fn server_error_surfaces_as_api_error() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", Matcher::Regex(r"^/calendars/primary/events".into()))
            .match_query(Matcher::Any)
            .with_status(500)
            .create();

        let provider = GoogleCalendarProvider::new("token").with_base_url(server.url());
        let result = provider.list_events(TimeRange {
            start: at(0),
            end: at(1),
        });
        assert!(matches!(result, Err(ProviderError::Api(_))));
    }
}
