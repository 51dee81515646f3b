//! # Field Mapper
//!
//! Turns [`PassData`] into the ordered field groups of a manifest.
//!
//! ## Layout
//!
//! | Group       | Contents, in order                                              |
//! |-------------|-----------------------------------------------------------------|
//! | header      | header custom fields                                            |
//! | primary     | title, type-specific primary fields, primary custom fields      |
//! | secondary   | location, subtitle, type-specific, secondary custom fields      |
//! | auxiliary   | date, time, type-specific, auxiliary custom fields              |
//! | back        | contact fields, `customFields`, `backFields`                    |
//!
//! Every group is always present, even when empty. Mapping is pure: the same
//! input always yields the same groups.
//!
//! Custom fields with an empty key are dropped, as is a custom field whose
//! key repeats an earlier custom field of the same group. Built-in keys do
//! not count: a custom `contactEmail` sits beside the contact field.

use serde::{Deserialize, Serialize};

use crate::data::{non_empty, CustomField, PassData};
use crate::normalize::{normalize_alignment, normalize_date_style, Alignment, DateStyle};
use crate::pass_type::PassType;

/// One labeled display field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub key: String,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_style: Option<DateStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_style: Option<DateStyle>,
}

impl Field {
    fn new(key: &str, label: &str, value: &str, alignment: Alignment) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value: value.to_string(),
            text_alignment: Some(alignment),
            date_style: None,
            time_style: None,
        }
    }
}

/// The ordered field groups of one pass style.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldGroups {
    pub header_fields: Vec<Field>,
    pub primary_fields: Vec<Field>,
    pub secondary_fields: Vec<Field>,
    pub auxiliary_fields: Vec<Field>,
    pub back_fields: Vec<Field>,
}

/// Map pass data into field groups for the given (effective) pass type.
pub fn map_fields(pass_type: PassType, data: &PassData) -> FieldGroups {
    let header_alignment = normalize_alignment(data.header_alignment.as_deref());
    let primary_alignment = normalize_alignment(data.primary_alignment.as_deref());
    let secondary_alignment = normalize_alignment(data.secondary_alignment.as_deref());
    let auxiliary_alignment = normalize_alignment(data.auxiliary_alignment.as_deref());

    let mut groups = FieldGroups::default();

    // Common seeds.
    let title_label = if pass_type == PassType::EventTicket {
        "EVENT"
    } else {
        "TITLE"
    };
    groups.primary_fields.push(Field::new(
        "title",
        title_label,
        non_empty(&data.title).unwrap_or_default(),
        primary_alignment,
    ));

    groups.secondary_fields.push(Field::new(
        "location",
        "LOCATION",
        non_empty(&data.location).unwrap_or_default(),
        secondary_alignment,
    ));
    if let Some(subtitle) = non_empty(&data.subtitle) {
        groups
            .secondary_fields
            .push(Field::new("subtitle", "SUBTITLE", subtitle, secondary_alignment));
    }

    let date = non_empty(&data.date).unwrap_or_default();
    let mut date_field = Field::new("date", "DATE", date, auxiliary_alignment);
    date_field.date_style = normalize_date_style(data.date_style.as_deref());
    groups.auxiliary_fields.push(date_field);

    if let Some(time) = non_empty(&data.time) {
        let mut time_field = Field::new("time", "TIME", &time_value(date, time), auxiliary_alignment);
        time_field.time_style = normalize_date_style(data.time_style.as_deref());
        groups.auxiliary_fields.push(time_field);
    }

    // Type-specific fields.
    match pass_type {
        PassType::Coupon => {
            if let Some(discount) = non_empty(&data.discount) {
                groups
                    .primary_fields
                    .push(Field::new("discount", "DISCOUNT", discount, primary_alignment));
            }
        }
        PassType::BoardingPass => {
            if let Some(flight) = non_empty(&data.flight_number) {
                groups
                    .primary_fields
                    .push(Field::new("flightNumber", "FLIGHT", flight, primary_alignment));
            }
            if let Some(gate) = non_empty(&data.gate) {
                groups
                    .secondary_fields
                    .push(Field::new("gate", "GATE", gate, secondary_alignment));
            }
            if let Some(seat) = non_empty(&data.seat) {
                groups
                    .auxiliary_fields
                    .push(Field::new("seat", "SEAT", seat, auxiliary_alignment));
            }
            if let Some(boarding) = non_empty(&data.boarding_time) {
                groups.auxiliary_fields.push(Field::new(
                    "boardingTime",
                    "BOARDING",
                    boarding,
                    auxiliary_alignment,
                ));
            }
        }
        PassType::StoreCard => {
            if let Some(member) = non_empty(&data.membership_number) {
                groups.primary_fields.push(Field::new(
                    "membershipNumber",
                    "MEMBER",
                    member,
                    primary_alignment,
                ));
            }
            if let Some(balance) = non_empty(&data.balance) {
                groups
                    .secondary_fields
                    .push(Field::new("balance", "BALANCE", balance, secondary_alignment));
            }
        }
        PassType::EventTicket | PassType::Generic => {}
    }

    // Contact details ignore the configurable alignment.
    let contacts = [
        ("contactName", "NAME", &data.contact_name),
        ("contactPhone", "PHONE", &data.contact_phone),
        ("contactEmail", "EMAIL", &data.contact_email),
        ("contactAddress", "ADDRESS", &data.contact_address),
        ("contactWebsite", "WEBSITE", &data.contact_website),
    ];
    for (key, label, value) in contacts {
        if let Some(value) = non_empty(value) {
            groups
                .back_fields
                .push(Field::new(key, label, value, Alignment::Left));
        }
    }

    // User-defined fields.
    append_custom(&mut groups.header_fields, &[&data.header_fields], header_alignment);
    append_custom(&mut groups.primary_fields, &[&data.primary_fields], primary_alignment);
    append_custom(
        &mut groups.secondary_fields,
        &[&data.secondary_fields],
        secondary_alignment,
    );
    append_custom(
        &mut groups.auxiliary_fields,
        &[&data.auxiliary_fields],
        auxiliary_alignment,
    );
    append_custom(
        &mut groups.back_fields,
        &[&data.custom_fields, &data.back_fields],
        Alignment::Natural,
    );

    groups
}

/// Combine the date and time inputs into the time field's value.
///
/// `2025-06-15` + `09:00` becomes `2025-06-15T09:00:00`; a time without a
/// date is used as entered.
fn time_value(date: &str, time: &str) -> String {
    if date.is_empty() {
        return time.to_string();
    }
    if time.matches(':').count() == 1 {
        format!("{date}T{time}:00")
    } else {
        format!("{date}T{time}")
    }
}

/// Append user fields to a group, translating alignment.
///
/// A field without its own alignment takes the group's default. Keys are
/// deduplicated among the appended fields only.
fn append_custom(
    group: &mut Vec<Field>,
    lists: &[&Vec<CustomField>],
    default_alignment: Alignment,
) {
    let first_custom = group.len();
    for field in lists.iter().flat_map(|list| list.iter()) {
        let key = field.key.trim();
        if key.is_empty() {
            tracing::debug!(label = %field.label, "dropping custom field with empty key");
            continue;
        }
        if group[first_custom..].iter().any(|existing| existing.key == key) {
            tracing::debug!(key = %key, "dropping custom field with duplicate key");
            continue;
        }
        let alignment = match field.text_alignment.as_deref() {
            Some(raw) => normalize_alignment(Some(raw)),
            None => default_alignment,
        };
        group.push(Field::new(key, &field.label, &field.value, alignment));
    }
}
