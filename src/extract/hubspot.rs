// src/extract/hubspot.rs
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use serde_json::json;

use super::{deal_properties, ContactBatch, ContactInfo, DealsPage, RawDeal};
use crate::config::consts::*;
use crate::config::stages::StageMap;
use crate::error::{Error, Result};
use crate::progress::Progress;

/// Blocking HubSpot CRM v3 client authenticated with a private-app token.
pub struct HubSpotClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
    pause: Duration,
}

impl HubSpotClient {
    pub fn new(token: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(CONNECT_TIMEOUT_S))
            .timeout_read(Duration::from_secs(READ_TIMEOUT_S))
            .build();
        Self {
            agent,
            base_url: s!(API_BASE_URL),
            token: token.into(),
            pause: Duration::from_millis(REQUEST_PAUSE_MS),
        }
    }

    /// Token from `HUBSPOT_ACCESS_TOKEN`.
    pub fn from_env() -> Result<Self> {
        match std::env::var(TOKEN_ENV) {
            Ok(t) if !t.trim().is_empty() => Ok(Self::new(t.trim())),
            _ => Err(Error::MissingCredential(TOKEN_ENV)),
        }
    }

    /// Point at another host (tests, proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn auth(&self) -> String {
        join!("Bearer ", &self.token)
    }

    /// One page of deals with contact associations.
    pub fn fetch_deal_page(&self, properties: &str, after: Option<&str>) -> Result<DealsPage> {
        let url = join!(&self.base_url, "/crm/v3/objects/deals");
        let limit = PAGE_LIMIT.to_string();
        let mut req = self
            .agent
            .get(&url)
            .set("Authorization", &self.auth())
            .query("limit", &limit)
            .query("properties", properties)
            .query("associations", "contacts");
        if let Some(a) = after {
            req = req.query("after", a);
        }
        let resp = req.call()?;
        resp.into_json::<DealsPage>().map_err(|e| Error::Decode(e.to_string()))
    }

    /// Every deal, following `paging.next.after` until it disappears.
    pub fn fetch_deals(&self, stages: &StageMap, progress: &mut dyn Progress) -> Result<Vec<RawDeal>> {
        let properties = deal_properties(stages).join(",");
        let mut all = Vec::new();
        let mut after: Option<String> = None;
        let mut page = 1usize;

        loop {
            progress.log(&format!("Fetching deals page {page}…"));
            let resp = self.fetch_deal_page(&properties, after.as_deref())?;
            logd!("HubSpot: page {} → {} deals", page, resp.results.len());
            after = resp.next_after().map(String::from);
            all.extend(resp.results);
            progress.item_done(page);

            if after.is_none() { break; }
            page += 1;
            sleep(self.pause);
        }

        logf!("HubSpot: {} deals over {} page(s)", all.len(), page);
        Ok(all)
    }

    /// Name and campaign for `ids`, in batches. A failed batch is reported in
    /// the returned warnings and its contacts are left out.
    pub fn fetch_contacts(
        &self,
        ids: &[String],
        progress: &mut dyn Progress,
    ) -> (HashMap<String, ContactInfo>, Vec<String>) {
        let url = join!(&self.base_url, "/crm/v3/objects/contacts/batch/read");
        let mut out = HashMap::new();
        let mut warnings = Vec::new();

        for (i, batch) in ids.chunks(CONTACT_BATCH).enumerate() {
            progress.log(&format!("Fetching contacts {}–{} of {}…",
                i * CONTACT_BATCH + 1, i * CONTACT_BATCH + batch.len(), ids.len()));
            let body = json!({
                "properties": ["firstname", "lastname", "email", CONTACT_CAMPAIGN_PROP],
                "inputs": batch.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>(),
            });

            let result = self
                .agent
                .post(&url)
                .set("Authorization", &self.auth())
                .send_json(body)
                .map_err(Error::from)
                .and_then(|r| r.into_json::<ContactBatch>().map_err(|e| Error::Decode(e.to_string())));

            match result {
                Ok(b) => {
                    for c in &b.results {
                        out.insert(c.id.clone(), ContactInfo::from(c));
                    }
                }
                // bad credentials will fail every batch; stop early
                Err(e @ Error::Unauthorized(_)) => {
                    let msg = format!("contact lookup stopped: {e}");
                    logw!("{}", msg);
                    warnings.push(msg);
                    break;
                }
                Err(e) => {
                    let msg = format!("contact batch {} failed: {e}", i + 1);
                    logw!("{}", msg);
                    warnings.push(msg);
                }
            }
            if (i + 1) * CONTACT_BATCH < ids.len() {
                sleep(self.pause);
            }
        }

        (out, warnings)
    }
}
