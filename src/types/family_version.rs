use std::fmt;

use serde::Serialize;

/// A family name plus up to three numeric version components, the shared
/// shape for both OS and client identification.
///
/// Components are strictly left-to-right: `minor` is only ever set when
/// `major` is, and `patch` only when `minor` is.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyVersion {
    pub family: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<u32>,
}

impl FamilyVersion {
    /// Split a `"Name/X.Y.Z"` fragment on the first `/`; the remainder is
    /// split on `.` or `_` and parsed until the first non-numeric component.
    pub fn parse(fragment: &str) -> Self {
        let mut halves = fragment.splitn(2, '/');
        let family = halves.next().unwrap_or("").to_string();

        let mut major = None;
        let mut minor = None;
        let mut patch = None;
        if let Some(version) = halves.next() {
            let mut components = version.split(['.', '_']);
            if let Some(v) = components.next().and_then(|c| c.parse().ok()) {
                major = Some(v);
                if let Some(v) = components.next().and_then(|c| c.parse().ok()) {
                    minor = Some(v);
                    patch = components.next().and_then(|c| c.parse().ok());
                }
            }
        }

        Self {
            family,
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for FamilyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.family)?;
        // Windows families already embed their marketing version in the
        // name; appending the numeric one would render "Windows 10 10".
        if self.family.starts_with("Windows") {
            return Ok(());
        }
        if let Some(major) = self.major {
            write!(f, " {major}")?;
            if let Some(minor) = self.minor {
                write!(f, ".{minor}")?;
                if let Some(patch) = self.patch {
                    write!(f, ".{patch}")?;
                }
            }
        }
        Ok(())
    }
}

/// Client identification: a [`FamilyVersion`] plus a best-effort locale code.
#[derive(Debug, Clone, Serialize)]
pub struct ClientInfo {
    #[serde(flatten)]
    pub info: FamilyVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl fmt::Display for ClientInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.info.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_components() {
        let fv = FamilyVersion::parse("Safari/7534.48.3");
        assert_eq!(fv.family, "Safari");
        assert_eq!((fv.major, fv.minor, fv.patch), (Some(7534), Some(48), Some(3)));
    }

    #[test]
    fn underscores_split_like_dots() {
        let fv = FamilyVersion::parse("iOS/5_1_1");
        assert_eq!((fv.major, fv.minor, fv.patch), (Some(5), Some(1), Some(1)));
    }

    #[test]
    fn family_alone() {
        let fv = FamilyVersion::parse("Linux");
        assert_eq!(fv.family, "Linux");
        assert_eq!((fv.major, fv.minor, fv.patch), (None, None, None));
    }

    #[test]
    fn extra_components_are_dropped() {
        let fv = FamilyVersion::parse("Chrome/89.0.4389.86");
        assert_eq!((fv.major, fv.minor, fv.patch), (Some(89), Some(0), Some(4389)));
    }

    #[test]
    fn failure_stops_all_later_components() {
        let fv = FamilyVersion::parse("Thing/1.x.3");
        assert_eq!((fv.major, fv.minor, fv.patch), (Some(1), None, None));

        let fv = FamilyVersion::parse("Thing/x.2.3");
        assert_eq!((fv.major, fv.minor, fv.patch), (None, None, None));
    }

    #[test]
    fn round_trips_through_display() {
        assert_eq!(FamilyVersion::parse("Name/1.2.3").to_string(), "Name 1.2.3");
        assert_eq!(FamilyVersion::parse("Name/1.2").to_string(), "Name 1.2");
        assert_eq!(FamilyVersion::parse("Name/1").to_string(), "Name 1");
        assert_eq!(FamilyVersion::parse("Name").to_string(), "Name");
    }

    #[test]
    fn windows_families_render_without_version() {
        assert_eq!(FamilyVersion::parse("Windows 10/10.0").to_string(), "Windows 10");
        assert_eq!(
            FamilyVersion::parse("Windows Media Player/11.0.5721").to_string(),
            "Windows Media Player"
        );
    }
}
