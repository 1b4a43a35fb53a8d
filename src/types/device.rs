use std::fmt;

use serde::Serialize;

use super::DeviceFamily;

/// Detected hardware facts.  Present on every valid result; all fields but
/// the family are best-effort.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub family: DeviceFamily,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl Device {
    pub(crate) fn with_family(family: DeviceFamily) -> Self {
        Self {
            family,
            company: None,
            brand: None,
            model: None,
        }
    }
}

impl fmt::Display for Device {
    /// `company brand model`, space-joined, empty parts omitted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in [&self.company, &self.brand, &self.model] {
            if let Some(part) = part.as_deref().filter(|p| !p.is_empty()) {
                if !first {
                    f.write_str(" ")?;
                }
                f.write_str(part)?;
                first = false;
            }
        }
        Ok(())
    }
}
