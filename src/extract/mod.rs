// src/extract/mod.rs
//
// CRM extraction: API payload types, the HubSpot client, and flattening
// into the deals-file layout.

mod hubspot;

pub use hubspot::HubSpotClient;

use std::collections::HashMap;

use serde::Deserialize;

use crate::config::consts::*;
use crate::config::stages::StageMap;
use crate::store::DataSet;

/// One page of `GET /crm/v3/objects/deals`.
#[derive(Debug, Default, Deserialize)]
pub struct DealsPage {
    #[serde(default)]
    pub results: Vec<RawDeal>,
    pub paging: Option<Paging>,
}

impl DealsPage {
    pub fn next_after(&self) -> Option<&str> {
        self.paging.as_ref()?.next.as_ref().map(|n| n.after.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    pub next: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
pub struct NextPage {
    pub after: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeal {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, Option<String>>,
    #[serde(default)]
    pub associations: Option<Associations>,
}

impl RawDeal {
    pub fn prop(&self, name: &str) -> &str {
        self.properties.get(name).and_then(|v| v.as_deref()).unwrap_or("")
    }

    /// Associated contact ids in association order.
    pub fn contact_ids(&self) -> Vec<&str> {
        self.associations
            .as_ref()
            .and_then(|a| a.contacts.as_ref())
            .map(|c| c.results.iter().map(|r| r.id.as_str()).collect())
            .unwrap_or_default()
    }

    /// The most recently associated contact.
    pub fn last_contact_id(&self) -> Option<&str> {
        self.contact_ids().last().copied()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Associations {
    pub contacts: Option<AssociationList>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssociationList {
    #[serde(default)]
    pub results: Vec<AssociationRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssociationRef {
    pub id: String,
}

/// Response of `POST /crm/v3/objects/contacts/batch/read`.
#[derive(Debug, Default, Deserialize)]
pub struct ContactBatch {
    #[serde(default)]
    pub results: Vec<RawContact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContact {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Option<String>>,
}

/// What the deals file keeps of a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub full_name: String,
    pub campaign: String,
}

impl From<&RawContact> for ContactInfo {
    fn from(c: &RawContact) -> Self {
        let p = |k: &str| c.properties.get(k).and_then(|v| v.as_deref()).unwrap_or("").trim();
        let full_name = [p("firstname"), p("lastname")]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self { full_name, campaign: s!(p(CONTACT_CAMPAIGN_PROP)) }
    }
}

/// Deal properties requested from the API.
pub fn deal_properties(stages: &StageMap) -> Vec<String> {
    let mut v = vec![s!(COL_NAME)];
    v.extend(stages.fields().map(String::from));
    v.extend([COL_PROBABILITY, COL_AMOUNT, COL_OWNER].map(String::from));
    v
}

/// Header of the deals file.
pub fn extract_headers(stages: &StageMap) -> Vec<String> {
    let mut h = row![COL_DEAL_ID, COL_CREATED, COL_UPDATED];
    h.extend(deal_properties(stages));
    h.extend(row![COL_CONTACT, COL_CAMPAIGN]);
    h
}

/// Flatten API deals (plus resolved contacts) into deals-file rows.
/// Deals whose contact could not be resolved get blank contact cells.
pub fn deals_to_dataset(
    deals: &[RawDeal],
    contacts: &HashMap<String, ContactInfo>,
    stages: &StageMap,
) -> DataSet {
    let props = deal_properties(stages);
    let rows = deals
        .iter()
        .map(|d| {
            let mut r = vec![
                d.id.clone(),
                d.created_at.clone().unwrap_or_default(),
                d.updated_at.clone().unwrap_or_default(),
            ];
            r.extend(props.iter().map(|p| s!(d.prop(p))));
            let contact = d.last_contact_id().and_then(|id| contacts.get(id));
            r.push(contact.map(|c| c.full_name.clone()).unwrap_or_default());
            r.push(contact.map(|c| c.campaign.clone()).unwrap_or_default());
            r
        })
        .collect();
    DataSet { headers: Some(extract_headers(stages)), rows }
}

/// Unique contact ids that are some deal's last contact, in first-seen order.
pub fn last_contact_ids(deals: &[RawDeal]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    deals
        .iter()
        .filter_map(RawDeal::last_contact_id)
        .filter(|id| seen.insert(*id))
        .map(String::from)
        .collect()
}
