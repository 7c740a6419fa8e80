//! Teammate model, the record persisted in teammates.json and exchanged by export/import.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One tracked colleague.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teammate {
    pub id: Uuid,
    pub name: String,
    /// IANA zone key. Unknown keys are kept as-is and render as empty times.
    pub time_zone_identifier: String,
    /// Avatar bytes, base64 in JSON.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "image_data")]
    pub image_data: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_id: Option<String>,
    #[serde(default)]
    pub groups: BTreeSet<String>,
}

impl Teammate {
    /// First group label in set order, used for grouped display.
    pub fn primary_group(&self) -> Option<&str> {
        self.groups.iter().next().map(String::as_str)
    }
}

/// Fields for creating a new teammate. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTeammate {
    pub name: String,
    pub time_zone_identifier: String,
    pub image_data: Option<Vec<u8>>,
    pub email: Option<String>,
    pub slack_id: Option<String>,
    pub groups: BTreeSet<String>,
}

impl NewTeammate {
    pub fn new(name: impl Into<String>, time_zone_identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            time_zone_identifier: time_zone_identifier.into(),
            ..Self::default()
        }
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub(crate) fn into_teammate(self, id: Uuid) -> Teammate {
        Teammate {
            id,
            name: self.name,
            time_zone_identifier: self.time_zone_identifier,
            image_data: self.image_data,
            email: self.email,
            slack_id: self.slack_id,
            groups: self.groups,
        }
    }
}

mod image_data {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match data {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| STANDARD.decode(encoded).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case_wire_format() {
        let teammate = NewTeammate {
            email: Some("mei@example.com".to_string()),
            slack_id: Some("U024BE7LH".to_string()),
            image_data: Some(vec![0x89, b'P', b'N', b'G']),
            ..NewTeammate::new("Mei", "Asia/Tokyo").with_groups(["Design"])
        }
        .into_teammate(Uuid::nil());

        let value = serde_json::to_value(&teammate).unwrap();
        assert_eq!(value["timeZoneIdentifier"], "Asia/Tokyo");
        assert_eq!(value["slackId"], "U024BE7LH");
        assert_eq!(value["imageData"], "iVBORw==");
        assert_eq!(value["groups"], json!(["Design"]));

        let back: Teammate = serde_json::from_value(value).unwrap();
        assert_eq!(back, teammate);
    }

    #[test]
    fn test_optional_fields_default() {
        let teammate: Teammate = serde_json::from_value(json!({
            "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "name": "Ana",
            "timeZoneIdentifier": "Europe/Lisbon"
        }))
        .unwrap();

        assert!(teammate.image_data.is_none());
        assert!(teammate.email.is_none());
        assert!(teammate.groups.is_empty());
        assert!(teammate.primary_group().is_none());
    }

    #[test]
    fn test_primary_group_is_first_in_order() {
        let teammate = NewTeammate::new("Ana", "Europe/Lisbon")
            .with_groups(["Platform", "Design"])
            .into_teammate(Uuid::new_v4());
        assert_eq!(teammate.primary_group(), Some("Design"));
    }
}
