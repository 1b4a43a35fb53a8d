use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum DeviceFamily {
    /// Default family when no stronger signal is found.
    #[default]
    Computer,
    Mobile,
    Tablet,
    Bot,
    #[serde(rename = "TV")]
    Tv,
}

impl DeviceFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Computer => "Computer",
            Self::Mobile => "Mobile",
            Self::Tablet => "Tablet",
            Self::Bot => "Bot",
            Self::Tv => "TV",
        }
    }
}
