//! Fakes and fixtures shared by unit tests.

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::core::error::{AppError, Result};
use crate::features::explorer::collaborators::{
    DistrictLookup, Geocoder, InfoPanel, MapError, MapSurface, PolygonHandle, PolygonStyle,
};
use crate::features::geo::models::{AddressComponent, District, DistrictSearchResult, STATUS_OK};
use crate::shared::llm::{ChatBackend, ChatMessage};
use crate::shared::types::LngLat;

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve upstream");
    });
    format!("http://{}", addr)
}

/// A closed square ring starting at (`lng`, `lat`)
pub fn square(lng: f64, lat: f64) -> Vec<LngLat> {
    vec![
        LngLat::new(lng, lat),
        LngLat::new(lng + 0.1, lat),
        LngLat::new(lng + 0.1, lat + 0.1),
        LngLat::new(lng, lat + 0.1),
        LngLat::new(lng, lat),
    ]
}

pub fn district_result(district: District) -> DistrictSearchResult {
    DistrictSearchResult {
        status: STATUS_OK.to_string(),
        info: "OK".to_string(),
        districts: vec![district],
    }
}

/// Map surface that records every call
#[derive(Default)]
pub struct RecordingMap {
    next_handle: AtomicU64,
    fail_len: Mutex<Option<usize>>,
    draws: Mutex<Vec<(Vec<LngLat>, PolygonStyle)>>,
    attached: Mutex<Vec<PolygonHandle>>,
    removed: Mutex<Vec<PolygonHandle>>,
    fits: Mutex<Vec<Vec<PolygonHandle>>>,
    overlays: Mutex<Vec<bool>>,
}

impl RecordingMap {
    /// Make every draw of a ring with exactly `len` points fail
    pub fn fail_draws_with_len(&self, len: usize) {
        *self.fail_len.lock().unwrap() = Some(len);
    }

    /// Successful draws, in order
    pub fn draws(&self) -> Vec<(Vec<LngLat>, PolygonStyle)> {
        self.draws.lock().unwrap().clone()
    }

    /// Polygons currently on the map
    pub fn attached(&self) -> Vec<PolygonHandle> {
        self.attached.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<PolygonHandle> {
        self.removed.lock().unwrap().clone()
    }

    pub fn fit_calls(&self) -> Vec<Vec<PolygonHandle>> {
        self.fits.lock().unwrap().clone()
    }

    pub fn overlay_changes(&self) -> Vec<bool> {
        self.overlays.lock().unwrap().clone()
    }
}

impl MapSurface for RecordingMap {
    fn draw_polygon(
        &self,
        ring: &[LngLat],
        style: &PolygonStyle,
    ) -> std::result::Result<PolygonHandle, MapError> {
        if *self.fail_len.lock().unwrap() == Some(ring.len()) {
            return Err(MapError::Draw("rejected by test map".to_string()));
        }
        let handle = PolygonHandle(self.next_handle.fetch_add(1, Ordering::SeqCst));
        self.draws
            .lock()
            .unwrap()
            .push((ring.to_vec(), style.clone()));
        self.attached.lock().unwrap().push(handle);
        Ok(handle)
    }

    fn remove_polygon(&self, handle: PolygonHandle) {
        self.attached.lock().unwrap().retain(|h| *h != handle);
        self.removed.lock().unwrap().push(handle);
    }

    fn fit_view(&self, handles: &[PolygonHandle]) {
        self.fits.lock().unwrap().push(handles.to_vec());
    }

    fn set_overlay_layers(&self, visible: bool) {
        self.overlays.lock().unwrap().push(visible);
    }
}

/// Info panel that keeps its last title, content and visibility
#[derive(Default)]
pub struct RecordingPanel {
    title: Mutex<String>,
    content: Mutex<String>,
    visible: AtomicBool,
}

impl RecordingPanel {
    pub fn title(&self) -> String {
        self.title.lock().unwrap().clone()
    }

    pub fn content(&self) -> String {
        self.content.lock().unwrap().clone()
    }
}

impl InfoPanel for RecordingPanel {
    fn set_title(&self, title: &str) {
        *self.title.lock().unwrap() = title.to_string();
    }

    fn set_content_html(&self, html: &str) {
        *self.content.lock().unwrap() = html.to_string();
    }

    fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

type Gate = (Arc<Notify>, Arc<Notify>);

/// Geocoder with a fixed answer, a call counter and an optional pause
pub struct FakeGeocoder {
    answer: std::result::Result<Option<AddressComponent>, String>,
    calls: AtomicUsize,
    hold: Mutex<Option<Gate>>,
}

impl FakeGeocoder {
    pub fn returning(answer: std::result::Result<Option<AddressComponent>, String>) -> Self {
        Self {
            answer,
            calls: AtomicUsize::new(0),
            hold: Mutex::new(None),
        }
    }

    pub fn with_adcode(adcode: &str) -> Self {
        Self::returning(Ok(Some(AddressComponent {
            adcode: Some(adcode.to_string()),
            ..AddressComponent::default()
        })))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Pause the next call: `entered` is notified once it starts, and it
    /// resumes when `release` is notified.
    pub fn hold_next(&self, entered: Arc<Notify>, release: Arc<Notify>) {
        *self.hold.lock().unwrap() = Some((entered, release));
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn reverse_geocode(&self, _location: LngLat) -> Result<Option<AddressComponent>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let hold = self.hold.lock().unwrap().take();
        if let Some((entered, release)) = hold {
            entered.notify_one();
            release.notified().await;
        }
        self.answer
            .clone()
            .map_err(AppError::ExternalServiceError)
    }
}

/// District lookup with a fixed answer that records every queried code
pub struct FakeDistricts {
    answer: DistrictSearchResult,
    queried: Mutex<Vec<String>>,
}

impl FakeDistricts {
    pub fn returning(answer: DistrictSearchResult) -> Self {
        Self {
            answer,
            queried: Mutex::new(Vec::new()),
        }
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl DistrictLookup for FakeDistricts {
    async fn search_district(&self, adcode: &str) -> Result<DistrictSearchResult> {
        self.queried.lock().unwrap().push(adcode.to_string());
        Ok(self.answer.clone())
    }
}

enum Scripted {
    Reply(Value),
    ReplyAfter(Arc<Notify>, Value),
    Fail(String),
}

/// Chat backend answering from a queue; an empty queue is an error
#[derive(Default)]
pub struct ScriptedChat {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<(Vec<ChatMessage>, String)>>,
}

impl ScriptedChat {
    pub fn reply(&self, body: Value) {
        self.script.lock().unwrap().push_back(Scripted::Reply(body));
    }

    /// Queue a reply that is held back until `gate` is notified
    pub fn reply_after(&self, gate: Arc<Notify>, body: Value) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::ReplyAfter(gate, body));
    }

    pub fn fail(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.to_string()));
    }

    pub fn calls(&self) -> Vec<(Vec<ChatMessage>, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedChat {
    async fn chat(&self, messages: Vec<ChatMessage>, style: &str) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((messages, style.to_string()));
        let next = self.script.lock().unwrap().pop_front();

        match next {
            Some(Scripted::Reply(body)) => Ok(body),
            Some(Scripted::ReplyAfter(gate, body)) => {
                gate.notified().await;
                Ok(body)
            }
            Some(Scripted::Fail(message)) => Err(AppError::ExternalServiceError(message)),
            None => Err(AppError::ExternalServiceError(
                "no scripted reply".to_string(),
            )),
        }
    }
}
