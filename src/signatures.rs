use indexmap::IndexMap;

use crate::error::Result;
use crate::types::DeviceFamily;

/// One device signature: a model pattern plus the device facts it implies.
pub(crate) struct SignatureRule {
    pattern: regex::Regex,
    pub family: DeviceFamily,
    pub company: Option<&'static str>,
    pub brand: Option<&'static str>,
}

/// Read-only model signature table, keyed by the first two characters of a
/// model string so most lookups never touch a regex.  Built once per
/// classifier and shared by every parse; rule order within a prefix is the
/// match priority.
pub(crate) struct SignatureTable {
    rules: IndexMap<&'static str, Vec<SignatureRule>>,
}

impl SignatureTable {
    pub fn build() -> Result<Self> {
        let mut rules: IndexMap<&'static str, Vec<SignatureRule>> = IndexMap::new();
        rules.insert(
            "LM",
            vec![SignatureRule {
                pattern: regex::Regex::new(r"^LM-X\d+$")?,
                family: DeviceFamily::Mobile,
                company: Some("LG"),
                brand: Some("K40"),
            }],
        );
        rules.insert(
            "SM",
            vec![SignatureRule {
                pattern: regex::Regex::new(r"^SM-T\d+$")?,
                family: DeviceFamily::Tablet,
                company: Some("SAMSUNG"),
                brand: Some("Galaxy Tab"),
            }],
        );
        Ok(Self { rules })
    }

    /// Exact two-character prefix lookup, then first matching pattern wins.
    pub fn lookup(&self, model: &str) -> Option<&SignatureRule> {
        let prefix = model.get(..2)?;
        self.rules
            .get(prefix)?
            .iter()
            .find(|rule| rule.pattern.is_match(model))
    }
}
