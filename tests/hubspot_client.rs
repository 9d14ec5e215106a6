// tests/hubspot_client.rs
//
// HubSpot client against a local one-shot HTTP server: status mapping,
// paging, and contact batches that fail without failing the extract.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use deal_pipeline::config::stages::StageMap;
use deal_pipeline::error::{Error, ErrorKind};
use deal_pipeline::extract::HubSpotClient;
use deal_pipeline::pipeline::run_extract;
use deal_pipeline::progress::VecProgress;

/// Serves `replies` in order, one connection each, and records the request
/// line of every request it answered.
struct Server {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Server {
    fn start(replies: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        thread::spawn(move || {
            for (status, body) in replies {
                let Ok((mut stream, _)) = listener.accept() else { return };
                let line = read_request(&stream);
                seen.lock().unwrap().push(line);
                let reply = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes());
            }
        });

        Self { base_url, requests }
    }

    fn client(&self) -> HubSpotClient {
        HubSpotClient::new("test-token").with_base_url(&self.base_url)
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Request line; headers and body are drained so the client sees a clean reply.
fn read_request(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut first = String::new();
    reader.read_line(&mut first).unwrap();

    let mut len = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap_or(0) == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((k, v)) = header.split_once(':') {
            if k.eq_ignore_ascii_case("content-length") {
                len = v.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0u8; len];
    let _ = reader.read_exact(&mut body);
    first.trim_end().to_string()
}

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("deal_pipeline_hubspot_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

const PAGE_ONE: &str = r#"{"results":[
  {"id":"1","createdAt":"2025-01-02T09:00:00Z","properties":{"dealname":"Acme"}},
  {"id":"2","createdAt":"2025-01-03T09:00:00Z","properties":{"dealname":"Beta"}}
],"paging":{"next":{"after":"p2"}}}"#;

const PAGE_TWO: &str = r#"{"results":[
  {"id":"3","createdAt":"2025-01-04T09:00:00Z","properties":{"dealname":"Gamma"}}
]}"#;

const PAGE_WITH_CONTACT: &str = r#"{"results":[
  {"id":"77","createdAt":"2025-01-02T09:00:00Z","properties":{"dealname":"Acme"},
   "associations":{"contacts":{"results":[{"id":"9001"}]}}}
]}"#;

const CONTACTS: &str = r#"{"results":[
  {"id":"c120","properties":{"firstname":"Ada","lastname":"Lovelace","lemlistlmlstcampaign":"Q1"}}
]}"#;

fn contact_ids(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("c{i}")).collect()
}

#[test]
fn rejected_token_is_unauthorized() {
    let server = Server::start(vec![(401, r#"{"message":"bad token"}"#)]);
    let err = server
        .client()
        .fetch_deals(&StageMap::hubspot_default(), &mut VecProgress::default())
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(401)), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[test]
fn server_error_keeps_status_and_body() {
    let server = Server::start(vec![(500, r#"{"message":"boom"}"#)]);
    let err = server
        .client()
        .fetch_deals(&StageMap::hubspot_default(), &mut VecProgress::default())
        .unwrap_err();
    match err {
        Error::Api { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("boom"), "{body}");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[test]
fn deal_pages_follow_the_cursor() {
    let server = Server::start(vec![(200, PAGE_ONE), (200, PAGE_TWO)]);
    let mut progress = VecProgress::default();
    let deals = server
        .client()
        .fetch_deals(&StageMap::hubspot_default(), &mut progress)
        .unwrap();

    let ids: Vec<&str> = deals.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert_eq!(progress.done, 2);

    let reqs = server.requests();
    assert_eq!(reqs.len(), 2);
    assert!(reqs[0].starts_with("GET /crm/v3/objects/deals?"), "{}", reqs[0]);
    assert!(reqs[0].contains("associations=contacts"));
    assert!(!reqs[0].contains("after="));
    assert!(reqs[1].contains("after=p2"), "{}", reqs[1]);
}

#[test]
fn failed_contact_batch_becomes_a_warning() {
    // 150 ids: two batches, the first fails
    let server = Server::start(vec![(500, r#"{"message":"try later"}"#), (200, CONTACTS)]);
    let (contacts, warnings) = server
        .client()
        .fetch_contacts(&contact_ids(150), &mut VecProgress::default());

    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].contains("contact batch 1 failed"), "{}", warnings[0]);
    assert_eq!(contacts["c120"].full_name, "Ada Lovelace");
    assert_eq!(contacts["c120"].campaign, "Q1");

    let reqs = server.requests();
    assert_eq!(reqs.len(), 2);
    assert!(reqs.iter().all(|r| r.starts_with("POST /crm/v3/objects/contacts/batch/read")));
}

#[test]
fn unauthorized_contact_lookup_stops_after_first_batch() {
    // 250 ids would be three batches
    let server = Server::start(vec![(401, "{}"), (200, CONTACTS), (200, CONTACTS)]);
    let (contacts, warnings) = server
        .client()
        .fetch_contacts(&contact_ids(250), &mut VecProgress::default());

    assert!(contacts.is_empty());
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("stopped"), "{}", warnings[0]);
    assert_eq!(server.requests().len(), 1);
}

#[test]
fn extract_still_writes_deals_when_contacts_fail() {
    let server = Server::start(vec![(200, PAGE_WITH_CONTACT), (503, "unavailable")]);
    let dir = tmp_dir("extract_contacts_down");
    let stages = StageMap::hubspot_default();

    let summary = run_extract(&server.client(), &stages, &dir, &mut VecProgress::default()).unwrap();
    assert_eq!(summary.deals, 1);
    assert_eq!(summary.warnings.len(), 1, "{:?}", summary.warnings);
    assert_eq!(summary.files_written.len(), 1);

    let text = fs::read_to_string(&summary.files_written[0]).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("deal_id,created_at,updated_at,dealname"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("77,2025-01-02T09:00:00Z,,Acme"), "{row}");
    // contact name and campaign stay blank
    assert!(row.ends_with(",,"), "{row}");
    assert_eq!(lines.next(), None);
}
