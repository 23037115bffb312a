//! Request body validation.
//!
//! Bodies deserialize permissively (every field an optional JSON value) so
//! that shape violations - missing fields and mistyped ones alike - can be
//! collected and reported together instead of bouncing at the extractor.
//! Business rules are the scheduler's job; only field-level checks live
//! here.

use bookd_core::{parse_instant, AppointmentKind, AppointmentPatch, NewAppointment};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Wire shape shared by POST and PATCH bodies. Unknown fields are dropped;
/// field types are checked during validation, not deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentBody {
    pub title: Option<Value>,
    pub host_id: Option<Value>,
    pub buyer_id: Option<Value>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub location: Option<Value>,
    pub link: Option<Value>,
    pub start_time: Option<Value>,
    pub end_time: Option<Value>,
}

/// Validate a create request, aggregating every violated field rule.
pub fn parse_create(body: AppointmentBody) -> Result<NewAppointment, Vec<String>> {
    let mut errors = Vec::new();

    let title = non_empty_string(body.title.as_ref());
    if title.is_none() {
        errors.push("title should not be empty".to_string());
    }

    let host_id = body.host_id.as_ref().and_then(Value::as_i64);
    if host_id.is_none() {
        errors.push("hostId must be an integer number".to_string());
    }
    let buyer_id = body.buyer_id.as_ref().and_then(Value::as_i64);
    if buyer_id.is_none() {
        errors.push("buyerId must be an integer number".to_string());
    }

    let kind = parse_kind(body.kind.as_ref());
    if kind.is_none() {
        errors.push("type must be a valid enum value".to_string());
    }

    // location/link are conditionally required, so they only produce
    // violations once the kind itself is valid
    let location = non_empty_string(body.location.as_ref());
    let link = non_empty_string(body.link.as_ref());
    if kind == Some(AppointmentKind::Physical) && location.is_none() {
        errors.push("location should not be empty".to_string());
    }
    if kind == Some(AppointmentKind::Virtual) && link.is_none() {
        errors.push("link should not be empty".to_string());
    }

    let start_time = parse_time_field(body.start_time.as_ref(), "startTime", &mut errors);
    let end_time = parse_time_field(body.end_time.as_ref(), "endTime", &mut errors);

    match (title, host_id, buyer_id, kind, start_time, end_time) {
        (Some(title), Some(host_id), Some(buyer_id), Some(kind), Some(start_time), Some(end_time))
            if errors.is_empty() =>
        {
            Ok(NewAppointment {
                title,
                host_id,
                buyer_id,
                kind,
                location,
                link,
                start_time,
                end_time,
            })
        }
        _ => Err(errors),
    }
}

/// Validate a patch request; rules apply only to fields present in the body.
pub fn parse_patch(body: AppointmentBody) -> Result<AppointmentPatch, Vec<String>> {
    let mut errors = Vec::new();
    let mut patch = AppointmentPatch::default();

    if body.title.is_some() {
        match non_empty_string(body.title.as_ref()) {
            Some(title) => patch.title = Some(title),
            None => errors.push("title should not be empty".to_string()),
        }
    }

    if let Some(value) = body.host_id.as_ref() {
        match value.as_i64() {
            Some(host_id) => patch.host_id = Some(host_id),
            None => errors.push("hostId must be an integer number".to_string()),
        }
    }
    if let Some(value) = body.buyer_id.as_ref() {
        match value.as_i64() {
            Some(buyer_id) => patch.buyer_id = Some(buyer_id),
            None => errors.push("buyerId must be an integer number".to_string()),
        }
    }

    if body.kind.is_some() {
        match parse_kind(body.kind.as_ref()) {
            Some(kind) => patch.kind = Some(kind),
            None => errors.push("type must be a valid enum value".to_string()),
        }
    }

    if body.location.is_some() {
        match non_empty_string(body.location.as_ref()) {
            Some(location) => patch.location = Some(location),
            None => errors.push("location should not be empty".to_string()),
        }
    }
    if body.link.is_some() {
        match non_empty_string(body.link.as_ref()) {
            Some(link) => patch.link = Some(link),
            None => errors.push("link should not be empty".to_string()),
        }
    }

    if body.start_time.is_some() {
        patch.start_time = parse_time_field(body.start_time.as_ref(), "startTime", &mut errors);
    }
    if body.end_time.is_some() {
        patch.end_time = parse_time_field(body.end_time.as_ref(), "endTime", &mut errors);
    }

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn parse_kind(value: Option<&Value>) -> Option<AppointmentKind> {
    value.and_then(Value::as_str).and_then(|s| s.parse().ok())
}

fn parse_time_field(
    value: Option<&Value>,
    field: &str,
    errors: &mut Vec<String>,
) -> Option<DateTime<Utc>> {
    match value.and_then(Value::as_str).and_then(parse_instant) {
        Some(instant) => Some(instant),
        None => {
            errors.push(format!("{field} must be a Date instance"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> AppointmentBody {
        AppointmentBody {
            title: Some(json!("Fashion week")),
            host_id: Some(json!(1)),
            buyer_id: Some(json!(2)),
            kind: Some(json!("PHYSICAL")),
            location: Some(json!("Paris")),
            link: None,
            start_time: Some(json!("2023-01-06T16:50z")),
            end_time: Some(json!("2023-01-06T17:50z")),
        }
    }

    #[test]
    fn empty_body_reports_all_six_violations_in_order() {
        let errors = parse_create(AppointmentBody::default()).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "title should not be empty",
                "hostId must be an integer number",
                "buyerId must be an integer number",
                "type must be a valid enum value",
                "startTime must be a Date instance",
                "endTime must be a Date instance",
            ]
        );
    }

    #[test]
    fn valid_body_parses() {
        let request = parse_create(valid_body()).unwrap();
        assert_eq!(request.title, "Fashion week");
        assert_eq!(request.kind, AppointmentKind::Physical);
        assert_eq!(request.location.as_deref(), Some("Paris"));
    }

    #[test]
    fn mistyped_fields_report_the_same_violations_as_missing_ones() {
        let body = AppointmentBody {
            host_id: Some(json!("abc")),
            buyer_id: Some(json!(1.5)),
            start_time: Some(json!(1672937400)),
            ..valid_body()
        };
        let errors = parse_create(body).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "hostId must be an integer number",
                "buyerId must be an integer number",
                "startTime must be a Date instance",
            ]
        );
    }

    #[test]
    fn physical_requires_location() {
        let body = AppointmentBody {
            location: None,
            ..valid_body()
        };
        let errors = parse_create(body).unwrap_err();
        assert_eq!(errors, vec!["location should not be empty"]);
    }

    #[test]
    fn virtual_requires_link() {
        let body = AppointmentBody {
            kind: Some(json!("VIRTUAL")),
            location: None,
            link: None,
            ..valid_body()
        };
        let errors = parse_create(body).unwrap_err();
        assert_eq!(errors, vec!["link should not be empty"]);
    }

    #[test]
    fn unknown_kind_is_a_single_violation() {
        let body = AppointmentBody {
            kind: Some(json!("HYBRID")),
            ..valid_body()
        };
        let errors = parse_create(body).unwrap_err();
        assert_eq!(errors, vec!["type must be a valid enum value"]);
    }

    #[test]
    fn patch_ignores_absent_fields() {
        let patch = parse_patch(AppointmentBody::default()).unwrap();
        assert_eq!(patch, AppointmentPatch::default());
    }

    #[test]
    fn patch_validates_present_fields() {
        let body = AppointmentBody {
            title: Some(json!("   ")),
            host_id: Some(json!("abc")),
            start_time: Some(json!("not-a-date")),
            ..Default::default()
        };
        let errors = parse_patch(body).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "title should not be empty",
                "hostId must be an integer number",
                "startTime must be a Date instance",
            ]
        );
    }

    #[test]
    fn patch_rejects_blank_location_and_link() {
        let body = AppointmentBody {
            location: Some(json!("")),
            link: Some(json!("   ")),
            ..Default::default()
        };
        let errors = parse_patch(body).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "location should not be empty",
                "link should not be empty",
            ]
        );
    }

    #[test]
    fn patch_keeps_typed_time_fields() {
        let body = AppointmentBody {
            start_time: Some(json!("2023-01-06T17:51Z")),
            end_time: Some(json!("2023-01-06T20:00Z")),
            ..Default::default()
        };
        let patch = parse_patch(body).unwrap();
        assert!(patch.touches_slot());
        assert!(patch.start_time.unwrap() < patch.end_time.unwrap());
    }
}
