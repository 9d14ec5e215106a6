// src/config/stages.rs
//
// Field mapping: which CRM property holds the "entered at" timestamp of
// which pipeline stage. Loaded from `stages.toml` when present:
//
// ```toml
// [[stage]]
// field = "hs_v2_date_entered_qualifiedtobuy"
// name  = "Demo Booked"
// group = "qualification"
// color = "#fff3e0"
// ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageGroup {
    Entry,
    Qualification,
    Conversion,
    FollowUp,
    Negative,
    #[default]
    Neutral,
}

impl StageGroup {
    pub const ALL: [StageGroup; 6] = [
        StageGroup::Entry,
        StageGroup::Qualification,
        StageGroup::Conversion,
        StageGroup::FollowUp,
        StageGroup::Negative,
        StageGroup::Neutral,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StageGroup::Entry => "Entry",
            StageGroup::Qualification => "Demo / qualification",
            StageGroup::Conversion => "Conversion",
            StageGroup::FollowUp => "Follow-up",
            StageGroup::Negative => "Negative",
            StageGroup::Neutral => "Other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDef {
    /// CRM property holding the timestamp the deal entered this stage.
    pub field: String,
    /// Display name used in every output.
    pub name: String,
    #[serde(default)]
    pub group: StageGroup,
    /// `#rrggbb` cell color in the dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Deserialize, Serialize)]
struct StageFile {
    #[serde(rename = "stage", default)]
    stages: Vec<StageDef>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageMap {
    stages: Vec<StageDef>,
}

impl StageMap {
    pub fn new(stages: Vec<StageDef>) -> Result<Self> {
        if stages.is_empty() {
            return Err(Error::StageMap(s!("no stages declared")));
        }
        let mut fields = HashSet::new();
        let mut names = HashSet::new();
        for st in &stages {
            if st.field.trim().is_empty() || st.name.trim().is_empty() {
                return Err(Error::StageMap(s!("stage with empty field or name")));
            }
            if !fields.insert(st.field.as_str()) {
                return Err(Error::StageMap(format!("field `{}` mapped twice", st.field)));
            }
            if !names.insert(st.name.as_str()) {
                return Err(Error::StageMap(format!("stage name `{}` used twice", st.name)));
            }
        }
        Ok(Self { stages })
    }

    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self> {
        let file: StageFile = toml::from_str(text).map_err(|source| Error::StageMapParse {
            path: origin.to_path_buf(),
            source,
        })?;
        Self::new(file.stages)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::StageMapRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Explicit path must load; otherwise use `stages.toml` if it exists,
    /// else the built-in HubSpot mapping.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::load(p);
        }
        let local = Path::new(super::consts::STAGE_MAP_FILE);
        if local.exists() {
            logf!("Stages: Using {}", local.display());
            return Self::load(local);
        }
        Ok(Self::hubspot_default())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let file = StageFile { stages: self.stages.clone() };
        Ok(toml::to_string_pretty(&file)?)
    }

    pub fn stages(&self) -> &[StageDef] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.field.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.name.as_str())
    }

    pub fn by_name(&self, name: &str) -> Option<&StageDef> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Mapping order of a stage; breaks timestamp ties in deal histories.
    pub fn rank(&self, name: &str) -> usize {
        self.stages.iter().position(|s| s.name == name).unwrap_or(usize::MAX)
    }

    /// Built-in mapping for the standard HubSpot sales pipeline properties.
    pub fn hubspot_default() -> Self {
        use StageGroup::*;
        const DEFAULT: [(&str, &str, StageGroup, &str); 20] = [
            ("hs_v2_date_entered_1091569281", "Sign-up", Entry, "#e3f2fd"),
            ("hs_v2_date_entered_1053523303", "Outreach done", Entry, "#e8eaf6"),
            ("hs_v2_date_entered_1053523302", "To reach out", Entry, "#e1f5fe"),
            ("hs_v2_date_entered_qualifiedtobuy", "Demo Booked", Qualification, "#fff3e0"),
            ("hs_v2_date_entered_presentationscheduled", "Demo Done", Qualification, "#fff8e1"),
            ("hs_v2_date_entered_appointmentscheduled", "Relevant Reply", Qualification, "#f3e5f5"),
            ("hs_v2_date_entered_contractsent", "Customer Converted", Conversion, "#e8f5e8"),
            ("hs_v2_date_entered_closedwon", "Closed Won", Conversion, "#c8e6c9"),
            ("hs_v2_date_entered_1141834547", "Post-demo follow-up", FollowUp, "#fce4ec"),
            ("hs_v2_date_entered_1053523301", "Follow-up done", FollowUp, "#f8bbd9"),
            ("hs_v2_date_entered_1158033067", "$$$$ follow-ups", FollowUp, "#e1bee7"),
            ("hs_v2_date_entered_1155410330", "Active trial $$$$ #haisha", Conversion, "#a5d6a7"),
            ("hs_v2_date_entered_202676095", "Junk", Neutral, "#f5f5f5"),
            ("hs_v2_date_entered_981662285", "Not a good fit", Negative, "#ffebee"),
            ("hs_v2_date_entered_closedlost", "Closed Lost", Negative, "#ffcdd2"),
            ("hs_v2_date_entered_1053507879", "Churned", Negative, "#ffcdd2"),
            ("hs_v2_date_entered_1155516059", "PoC not right but company relevant", Negative, "#ffcdd2"),
            ("hs_v2_date_entered_1120008054", "Timing not right", Neutral, "#eeeeee"),
            ("hs_v2_date_entered_202676096", "No Show", Neutral, "#fafafa"),
            ("hs_v2_date_entered_999971918", "Cold call done", Neutral, "#e0e0e0"),
        ];
        let stages = DEFAULT
            .iter()
            .map(|(field, name, group, color)| StageDef {
                field: s!(*field),
                name: s!(*name),
                group: *group,
                color: Some(s!(*color)),
            })
            .collect();
        Self { stages }
    }
}

/// `#rrggbb` → (r, g, b)
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let h = s.trim().strip_prefix('#')?;
    if h.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&h[0..2], 16).ok()?;
    let g = u8::from_str_radix(&h[2..4], 16).ok()?;
    let b = u8::from_str_radix(&h[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_is_valid() {
        let m = StageMap::hubspot_default();
        assert_eq!(m.len(), 20);
        assert!(StageMap::new(m.stages().to_vec()).is_ok());
        assert_eq!(m.by_name("Closed Won").unwrap().group, StageGroup::Conversion);
    }

    #[test]
    fn toml_round_trip_keeps_mapping() {
        let m = StageMap::hubspot_default();
        let text = m.to_toml_string().unwrap();
        assert!(text.contains("[[stage]]"));
        let back = StageMap::from_toml_str(&text, Path::new("mem")).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#c8e6c9"), Some((0xc8, 0xe6, 0xc9)));
        assert_eq!(parse_hex_color("c8e6c9"), None);
        assert_eq!(parse_hex_color("#zzz000"), None);
    }
}
