// src/config/consts.rs

// CRM API
pub const API_BASE_URL: &str = "https://api.hubapi.com";
pub const TOKEN_ENV: &str = "HUBSPOT_ACCESS_TOKEN";
pub const PORTAL_ENV: &str = "HUBSPOT_PORTAL_ID";
pub const DEAL_URL_BASE: &str = "https://app.hubspot.com/contacts";
pub const PAGE_LIMIT: usize = 100; // API maximum
pub const CONTACT_BATCH: usize = 100;
pub const REQUEST_PAUSE_MS: u64 = 100; // be polite
pub const CONNECT_TIMEOUT_S: u64 = 10;
pub const READ_TIMEOUT_S: u64 = 60;

// Local files
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUT_DIR: &str = "out";
pub const STAGE_MAP_FILE: &str = "stages.toml";
pub const EXTRACT_PREFIX: &str = "hubspot_deals_";
pub const SNAPSHOTS_STEM: &str = "snapshots";
pub const CHANGES_STEM: &str = "stage_changes";
pub const MATRIX_STEM: &str = "deal_stage_matrix";
pub const STAGNANT_STEM: &str = "stagnant_deals";
pub const SUMMARY_FILE: &str = "summary.json";

// Deals file columns
pub const COL_DEAL_ID: &str = "deal_id";
pub const COL_CREATED: &str = "created_at";
pub const COL_UPDATED: &str = "updated_at";
pub const COL_NAME: &str = "dealname";
pub const COL_PROBABILITY: &str = "hs_deal_stage_probability";
pub const COL_AMOUNT: &str = "hs_deal_amount";
pub const COL_OWNER: &str = "hubspot_owner_id";
pub const COL_CONTACT: &str = "last_contact_name";
pub const COL_CAMPAIGN: &str = "last_contact_lemlist_campaign";

// Contact properties read for the last associated contact
pub const CONTACT_CAMPAIGN_PROP: &str = "lemlistlmlstcampaign";

// Filters
pub const DEFAULT_STAGNANT_THRESHOLD: usize = 3;
pub const MAX_STAGNANT_THRESHOLD: usize = 20;
