#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio::sync::Notify;

use movie_recommender::{
    services::{CompletionProvider, RecommendationService},
    AppError, AppResult,
};

/// Completion provider that replays scripted replies and records prompts
#[derive(Default)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<AppResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<AppResult<String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// User prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, _system: &str, user: &str, _temperature: f32) -> AppResult<String> {
        self.prompts.lock().unwrap().push(user.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::ExternalApi("no scripted reply left".to_string())))
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Completion provider that holds its reply until the test releases it
pub struct GatedProvider {
    reply: String,
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedProvider {
    pub fn new(reply: String) -> Arc<Self> {
        Arc::new(Self {
            reply,
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    /// Lets one pending (or the next) completion return
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for GatedProvider {
    async fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.reply.clone())
    }

    fn name(&self) -> &'static str {
        "gated"
    }
}

pub fn recommender(provider: Arc<dyn CompletionProvider>) -> Arc<RecommendationService> {
    Arc::new(RecommendationService::new(provider, 0.7))
}

pub fn movie(title: &str, year: &str) -> Value {
    json!({
        "title": title,
        "year": year,
        "reason": format!("{} has a similar feel.", title),
        "genre": "Science Fiction",
        "streaming": "Netflix"
    })
}

pub fn movies(titles: &[(&str, &str)]) -> Value {
    Value::Array(titles.iter().map(|(t, y)| movie(t, y)).collect())
}

pub fn fenced(value: &Value) -> String {
    format!(
        "Here are five movies you might enjoy:\n\n```json\n{}\n```\n\nHappy watching!",
        serde_json::to_string_pretty(value).unwrap()
    )
}

pub fn matrix_picks() -> Value {
    movies(&[
        ("Blade Runner", "1982"),
        ("Dark City", "1998"),
        ("Ghost in the Shell", "1995"),
        ("Inception", "2010"),
        ("eXistenZ", "1999"),
    ])
}

pub fn blade_runner_picks() -> Value {
    movies(&[
        ("Blade Runner", "1982"),
        ("Alien", "1979"),
        ("Brazil", "1985"),
        ("Gattaca", "1997"),
        ("Minority Report", "2002"),
    ])
}
