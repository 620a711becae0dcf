//! Shared fixtures for document handle tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Barrier, Mutex};
use std::time::Duration;

use art_core::{decode, ByteStore, Document, MemoryStore, StoreError};
use art_document::{
    BackgroundImage, DocumentHandle, FetchError, Fetcher, ImageDecoder, RasterDecoder,
};
use async_trait::async_trait;
use tokio::sync::{oneshot, Notify};
use url::Url;

/// Upper bound on any wait in these tests.
pub const WAIT: Duration = Duration::from_secs(5);

type Reply = oneshot::Sender<Result<Vec<u8>, FetchError>>;

/// Fetcher whose retrievals block until the test releases them.
#[derive(Debug, Default)]
pub struct GatedFetcher {
    gates: Mutex<HashMap<Url, Vec<Reply>>>,
    arrived: Notify,
}

impl GatedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_pending(&self, url: &Url) -> bool {
        self.gates
            .lock()
            .expect("gates")
            .get(url)
            .is_some_and(|waiting| !waiting.is_empty())
    }

    /// Wait until a retrieval for `url` has started.
    pub async fn wait_for(&self, url: &Url) {
        let arrival = async {
            loop {
                let notified = self.arrived.notified();
                if self.is_pending(url) {
                    return;
                }
                notified.await;
            }
        };
        tokio::time::timeout(WAIT, arrival)
            .await
            .unwrap_or_else(|_| panic!("no retrieval started for {url}"));
    }

    /// Answer the oldest retrieval for `url`. Returns whether a live
    /// retrieval received the answer.
    pub fn release(&self, url: &Url, outcome: Result<Vec<u8>, FetchError>) -> bool {
        let reply = {
            let mut gates = self.gates.lock().expect("gates");
            match gates.get_mut(url) {
                Some(waiting) if !waiting.is_empty() => waiting.remove(0),
                _ => return false,
            }
        };
        reply.send(outcome).is_ok()
    }
}

#[async_trait]
impl Fetcher for GatedFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let (reply, answer) = oneshot::channel();
        self.gates
            .lock()
            .expect("gates")
            .entry(url.clone())
            .or_default()
            .push(reply);
        self.arrived.notify_waiters();
        answer
            .await
            .unwrap_or_else(|_| Err(FetchError::Task("gate dropped".to_string())))
    }
}

/// Decoder that pauses inside `decode` until the test lets it finish.
#[derive(Debug)]
pub struct GatedDecoder {
    entered: Barrier,
    proceed: Barrier,
}

impl GatedDecoder {
    pub fn new() -> Self {
        Self {
            entered: Barrier::new(2),
            proceed: Barrier::new(2),
        }
    }

    /// Wait until a decode has started.
    pub async fn wait_entered(self: &Arc<Self>) {
        let decoder = Arc::clone(self);
        let entered = tokio::task::spawn_blocking(move || {
            decoder.entered.wait();
        });
        tokio::time::timeout(WAIT, entered)
            .await
            .expect("decode started")
            .expect("join");
    }

    /// Let the paused decode return.
    pub async fn finish(self: &Arc<Self>) {
        let decoder = Arc::clone(self);
        tokio::task::spawn_blocking(move || {
            decoder.proceed.wait();
        })
        .await
        .expect("join");
    }
}

impl ImageDecoder for GatedDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<BackgroundImage, FetchError> {
        self.entered.wait();
        self.proceed.wait();
        RasterDecoder.decode(bytes)
    }
}

/// Store that remembers every write in order.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<Vec<u8>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every persisted snapshot, oldest first.
    pub fn snapshots(&self) -> Vec<Document> {
        self.writes
            .lock()
            .expect("writes")
            .iter()
            .map(|bytes| decode(bytes).expect("persisted bytes decode"))
            .collect()
    }
}

impl ByteStore for RecordingStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key)
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.writes.lock().expect("writes").push(bytes.to_vec());
        self.inner.put(key, bytes)
    }
}

/// Store that accepts nothing.
#[derive(Debug, Default)]
pub struct FailingStore;

impl ByteStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(None)
    }

    fn put(&self, _key: &str, _bytes: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Rejected("disk full".to_string()))
    }
}

/// Encode a solid-colour PNG.
pub fn png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn url(s: &str) -> Url {
    Url::parse(s).expect("url")
}

/// Wait for the handle's background retrieval to settle.
pub async fn settle(handle: &DocumentHandle) {
    tokio::time::timeout(WAIT, handle.settled())
        .await
        .expect("background fetch settled");
}
