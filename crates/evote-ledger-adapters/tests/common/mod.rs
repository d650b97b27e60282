#![allow(dead_code)]

use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Response, Server, StatusCode};

use evote_ledger_core::{Ballot, Candidate};

static NEXT_DIR: AtomicU64 = AtomicU64::new(0);

/// Fresh scratch path under the system temp dir; the file itself is not created.
pub fn scratch_store_path(name: &str) -> PathBuf {
    let n = NEXT_DIR.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir()
        .join(format!("evote-ledger-tests-{}-{n}", std::process::id()))
        .join(name)
}

pub fn council_ballot() -> Ballot {
    let candidate = |id: &str, name: &str, party: &str, description: &str| Candidate {
        id: id.to_owned(),
        name: name.to_owned(),
        party: party.to_owned(),
        description: description.to_owned(),
    };
    Ballot {
        election_id: "1".to_owned(),
        title: "City Council Election 2025".to_owned(),
        candidates: vec![
            candidate("1", "Jane Smith", "Progressive Party", "Environmental sustainability"),
            candidate("2", "John Doe", "Liberty Party", "Economic growth"),
            candidate("3", "Alex Johnson", "Unity Coalition", "Common ground solutions"),
        ],
    }
}

/// Wallet state served by the mock JSON-RPC proxy.
#[derive(Debug, Clone)]
pub struct MockWallet {
    pub accounts: Vec<String>,
    pub chain_id_hex: String,
    pub reject_request_accounts: bool,
    pub calls: Vec<String>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self {
            accounts: vec!["0x3000000000000000000000000000000000000003".to_owned()],
            chain_id_hex: "0x2105".to_owned(),
            reject_request_accounts: false,
            calls: Vec::new(),
        }
    }
}

pub fn spawn_mock_wallet(
    wallet: Arc<Mutex<MockWallet>>,
) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    let join = thread::spawn(move || {
        for _ in 0..32 {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let mut body = String::new();
            let _ = req.as_reader().read_to_string(&mut body);
            let call: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            let method = call
                .get("method")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();

            let payload = {
                let mut g = wallet.lock().expect("wallet lock");
                g.calls.push(method.clone());
                match method.as_str() {
                    "eth_requestAccounts" if g.reject_request_accounts => json!({
                        "jsonrpc": "2.0",
                        "id": 1,
                        "error": {"code": 4001, "message": "User rejected the request."}
                    }),
                    "eth_requestAccounts" | "eth_accounts" => {
                        json!({"jsonrpc": "2.0", "id": 1, "result": g.accounts})
                    }
                    "eth_chainId" => {
                        json!({"jsonrpc": "2.0", "id": 1, "result": g.chain_id_hex})
                    }
                    _ => json!({
                        "jsonrpc": "2.0",
                        "id": 1,
                        "error": {"code": -32601, "message": "method not found"}
                    }),
                }
            };

            let response =
                Response::from_string(payload.to_string()).with_status_code(StatusCode(200));
            let _ = req.respond(response);
        }
    });

    (addr, join)
}
