#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use diamondcast::llm::{LlmProvider, LlmRequest, LlmResponse, UsageMetadata};
use diamondcast::mlb::{GameListing, LiveFeed, LiveFeedSource};
use diamondcast::speech::{SpeechAudio, SpeechSynthesizer};
use serde_json::{json, Value};

pub fn listing(game_pk: u64) -> GameListing {
    GameListing {
        away_team: "Away Team".to_string(),
        home_team: "Home Team".to_string(),
        game_pk,
        game_date: "2024-04-01".to_string(),
    }
}

/// Feed with two plays: a single in the 1st (away 1) and a double in the 3rd (home 1)
pub fn two_play_feed() -> Value {
    json!({
        "metaData": { "timeStamp": "20240401_230000", "gameEvents": ["single", "double"], "logicalEvents": [] },
        "gameData": {
            "status": { "detailedState": "Final" },
            "datetime": { "dateTime": "2024-04-01T23:05:00Z" },
            "teams": {
                "away": { "name": "Away Team", "record": { "leagueRecord": { "wins": 1, "losses": 0 } } },
                "home": { "name": "Home Team", "record": { "leagueRecord": { "wins": 0, "losses": 1 } } }
            }
        },
        "liveData": {
            "plays": {
                "allPlays": [
                    { "about": { "inning": 1 }, "result": { "description": "Single", "awayScore": 1 } },
                    { "about": { "inning": 3 }, "result": { "description": "Double", "homeScore": 1 } }
                ]
            }
        }
    })
}

/// One-shot HTTP server that sends a 200 with headers and a partial body,
/// then stalls. Returns its base url.
pub fn stalled_body_server(content_type: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let content_type = content_type.to_string();

    std::thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let head = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: {content_type}\r\ncontent-length: 100000\r\n\r\n"
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(b"{\"choices\"");
            let _ = stream.flush();
            std::thread::sleep(Duration::from_secs(10));
        }
    });

    format!("http://{addr}")
}

#[derive(Clone)]
pub struct MockFeeds {
    pub doc: Option<Value>,
    pub calls: Arc<Mutex<Vec<u64>>>,
    pub fail_with: Option<String>,
}

impl MockFeeds {
    pub fn new(doc: Value) -> Self {
        Self {
            doc: Some(doc),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    /// Upstream answered with a non-success status
    pub fn unavailable() -> Self {
        Self {
            doc: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            doc: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl LiveFeedSource for MockFeeds {
    async fn fetch_live_feed(&self, game_pk: u64) -> Result<Option<LiveFeed>> {
        self.calls.lock().unwrap().push(game_pk);
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.doc.clone().map(LiveFeed::new))
    }
}

#[derive(Clone)]
pub struct MockLlm {
    pub content: String,
    pub calls: Arc<Mutex<Vec<LlmRequest>>>,
    pub fail_with: Option<String>,
}

impl MockLlm {
    pub fn new(content: &str) -> Self {
        Self {
            content: content.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            content: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl LlmProvider for MockLlm {
    async fn generate(&self, request: LlmRequest) -> Result<LlmResponse> {
        self.calls.lock().unwrap().push(request);
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(LlmResponse {
            content: self.content.clone(),
            usage: UsageMetadata::default(),
            model: "mock-gpt".to_string(),
        })
    }
}

#[derive(Clone)]
pub struct MockSpeech {
    pub bytes: Vec<u8>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockSpeech {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            bytes: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, text: &str) -> Result<SpeechAudio> {
        self.calls.lock().unwrap().push(text.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(SpeechAudio {
            bytes: self.bytes.clone(),
            extension: "mp3".to_string(),
        })
    }
}
