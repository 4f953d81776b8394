use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::task::JoinHandle;

use crate::features::explorer::collaborators::InfoPanel;
use crate::features::explorer::level::DifficultyLevel;
use crate::shared::llm::{extract_completion_content, ChatBackend, ChatMessage, CompletionContent};
use crate::shared::prompts::{render_panel_title, render_region_question};

pub const LOADING_HTML: &str = "<div class=\"loading\">正在加载地理知识...</div>";
pub const EMPTY_CONTENT_NOTICE: &str = "返回的内容为空";
pub const DATA_FORMAT_NOTICE: &str = "数据格式错误";
pub const RETRY_NOTICE: &str = "获取信息时出错，请稍后重试";

/// How an info fetch ended; the panel already shows the matching content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoOutcome {
    Rendered,
    EmptyContent,
    DataFormatError,
    RequestFailed,
}

/// Escape text for the panel's HTML content and turn newlines into `<br>`.
pub fn to_panel_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => html.push_str("&amp;"),
            '<' => html.push_str("&lt;"),
            '>' => html.push_str("&gt;"),
            '\n' => html.push_str("<br>"),
            _ => html.push(c),
        }
    }
    html
}

/// Owns the info panel and the process-wide difficulty level.
///
/// Fetches are not serialised: overlapping calls race and whichever response
/// arrives last is what the panel shows.
pub struct InfoPanelController {
    panel: Arc<dyn InfoPanel>,
    chat: Arc<dyn ChatBackend>,
    level: RwLock<DifficultyLevel>,
    region: Mutex<Option<String>>,
}

impl InfoPanelController {
    pub fn new(panel: Arc<dyn InfoPanel>, chat: Arc<dyn ChatBackend>) -> Self {
        Self {
            panel,
            chat,
            level: RwLock::new(DifficultyLevel::default()),
            region: Mutex::new(None),
        }
    }

    pub fn current_level(&self) -> DifficultyLevel {
        *self.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Region whose info was last requested
    pub fn current_region(&self) -> Option<String> {
        self.region
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Show the panel for `region` and fill it with a lesson at the current level
    pub async fn get_region_info(&self, region: &str) -> InfoOutcome {
        let level = self.current_level();

        let title = render_panel_title(region, level.display_name()).unwrap_or_else(|e| {
            tracing::warn!("Panel title template failed: {}", e);
            region.to_string()
        });

        *self.region.lock().unwrap_or_else(PoisonError::into_inner) = Some(region.to_string());
        self.panel.set_title(&title);
        self.panel.set_content_html(LOADING_HTML);
        self.panel.show();

        let question = render_region_question(region).unwrap_or_else(|e| {
            tracing::warn!("Region question template failed: {}", e);
            region.to_string()
        });

        let (html, outcome) = match self
            .chat
            .chat(vec![ChatMessage::user(question)], &level.style())
            .await
        {
            Ok(body) => match extract_completion_content(&body) {
                CompletionContent::Text(text) => (to_panel_html(&text), InfoOutcome::Rendered),
                CompletionContent::Empty => {
                    (EMPTY_CONTENT_NOTICE.to_string(), InfoOutcome::EmptyContent)
                }
                CompletionContent::Malformed => {
                    tracing::error!("Unexpected chat response format: {}", body);
                    (DATA_FORMAT_NOTICE.to_string(), InfoOutcome::DataFormatError)
                }
            },
            Err(e) => {
                tracing::error!("Failed to fetch info for {}: {}", region, e);
                (RETRY_NOTICE.to_string(), InfoOutcome::RequestFailed)
            }
        };

        self.panel.set_content_html(&html);
        outcome
    }

    /// Run [`Self::get_region_info`] in the background
    pub fn spawn_region_info(self: &Arc<Self>, region: String) -> JoinHandle<InfoOutcome> {
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.get_region_info(&region).await })
    }

    /// Switch the difficulty level.
    ///
    /// When the panel is open the displayed region is fetched again at the
    /// new level; the returned handle tracks that fetch.
    pub fn select_level(self: &Arc<Self>, level: DifficultyLevel) -> Option<JoinHandle<InfoOutcome>> {
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level;
        tracing::info!("Difficulty level set to {}", level);

        if !self.panel.is_visible() {
            return None;
        }

        self.current_region()
            .map(|region| self.spawn_region_info(region))
    }

    pub fn close(&self) {
        self.panel.hide();
    }

    /// A click on the map dismisses an open panel
    pub fn hide_if_visible(&self) {
        if self.panel.is_visible() {
            self.panel.hide();
        }
    }
}
