use std::fmt;

use serde::Serialize;

use super::{ClientInfo, Device, FamilyVersion};

/// The outcome of classifying one User-Agent string.  Immutable once built;
/// `valid == false` means the input was empty and every other field is
/// absent or default.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub valid: bool,
    pub is_bot: bool,
    pub is_mobile: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<FamilyVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientInfo>,
}

impl ParseResult {
    pub(crate) fn invalid() -> Self {
        Self::default()
    }

    /// Full descriptive rendering: device facts, OS family with version,
    /// client family with version, space-joined with empty segments omitted.
    pub fn description(&self) -> String {
        self.render(|fv| fv.to_string())
    }

    /// Short rendering: device facts plus bare OS and client family names.
    pub fn short_name(&self) -> String {
        self.render(|fv| fv.family.clone())
    }

    fn render(&self, version_part: impl Fn(&FamilyVersion) -> String) -> String {
        let (true, Some(device)) = (self.valid, self.device.as_ref()) else {
            return String::new();
        };

        let mut items = Vec::new();
        let device_text = device.to_string();
        if !device_text.is_empty() {
            items.push(device_text);
        }
        if let Some(os) = &self.os {
            let text = version_part(os);
            if !text.is_empty() {
                items.push(text);
            }
        }
        if let Some(client) = &self.client {
            let text = version_part(&client.info);
            if !text.is_empty() {
                items.push(text);
            }
        }
        items.join(" ")
    }

    /// JSON rendering with web-style camelCase keys; the raw source string
    /// is only emitted when asked for.
    pub fn to_json(&self, include_source: bool) -> serde_json::Result<String> {
        if include_source {
            serde_json::to_string(self)
        } else {
            let trimmed = Self {
                source: None,
                ..self.clone()
            };
            serde_json::to_string(&trimmed)
        }
    }
}

impl fmt::Display for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceFamily;

    fn sample() -> ParseResult {
        ParseResult {
            valid: true,
            is_bot: false,
            is_mobile: true,
            source: Some("ua".into()),
            device: Some(Device {
                family: DeviceFamily::Mobile,
                company: Some("Apple".into()),
                brand: Some("iPhone".into()),
                model: None,
            }),
            os: Some(FamilyVersion::parse("iOS/5_1_1")),
            client: Some(ClientInfo {
                info: FamilyVersion::parse("Safari/7534.48.3"),
                language: None,
            }),
        }
    }

    #[test]
    fn description_joins_segments() {
        assert_eq!(
            sample().description(),
            "Apple iPhone iOS 5.1.1 Safari 7534.48.3"
        );
    }

    #[test]
    fn short_name_drops_versions() {
        assert_eq!(sample().short_name(), "Apple iPhone iOS Safari");
    }

    #[test]
    fn invalid_renders_empty() {
        assert_eq!(ParseResult::invalid().description(), "");
        assert_eq!(ParseResult::invalid().short_name(), "");
    }

    #[test]
    fn json_omits_source_unless_requested() {
        let json = sample().to_json(false).unwrap();
        assert!(!json.contains("\"source\""));
        let json = sample().to_json(true).unwrap();
        assert!(json.contains("\"source\":\"ua\""));
        assert!(json.contains("\"isMobile\":true"));
        assert!(json.contains("\"family\":\"Mobile\""));
    }
}
