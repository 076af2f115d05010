//! Interactive layout showcase with a per-user interaction log.
//!
//! Every `/showcase` reply becomes a live surface owned by the invoking user.
//! Actions on it are serialized against its deadline through `SessionTimer`,
//! so once the terminal view is rendered nothing else is drawn over it.

mod demo;
mod views;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tokio::sync::Notify;

use crate::command::{Command, CommandContext, Responder};
use crate::message::{CommandScope, ComponentAction, Invocation, Reply};
use crate::session::{ActiveSurface, SessionTimer, SessionTracker};
use crate::surface::{ButtonStyle, Surface};

use demo::{demo_file, product, random_accent, DemoStats, SessionExport, DEMO_FILE_NAME};
use views::{
    closed_view, colors_view, expired_view, favorite_notice, log_view, main_view, product_view,
    purchase_notice, select_notice, spoiler_view, style_notice, EXPIRED_NOTICE, EXPORT_NOTICE,
    PRIVATE_NOTICE,
};

const BUTTON_IDS: &[&str] = &[
    "refresh_stats",
    "back_to_main",
    "demo_primary",
    "demo_success",
    "demo_danger",
    "reset_demo",
    "export_data",
    "close_demo",
    "clear_log",
    "demo_select",
];

const PRODUCT_PREFIXES: &[&str] = &["product_", "purchase_", "favorite_"];

/// How long a click on a just-posted showcase waits for it to be registered.
const REGISTRATION_WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoOption {
    Colors,
    Spoiler,
    Regenerate,
    Log,
}

impl DemoOption {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "colors" => Some(DemoOption::Colors),
            "spoiler" => Some(DemoOption::Spoiler),
            "regenerate" => Some(DemoOption::Regenerate),
            "log" => Some(DemoOption::Log),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            DemoOption::Colors => "colors",
            DemoOption::Spoiler => "spoiler",
            DemoOption::Regenerate => "regenerate",
            DemoOption::Log => "log",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShowcaseAction {
    RefreshStats,
    ViewProduct(u32),
    Purchase(u32),
    Favorite(u32),
    BackToMain,
    StyleDemo(ButtonStyle),
    Reset,
    Export,
    Close,
    ClearLog,
    Select(DemoOption),
}

impl ShowcaseAction {
    fn parse(custom_id: &str, values: &[String]) -> Option<Self> {
        let product_id = |prefix: &str| {
            custom_id
                .strip_prefix(prefix)
                .and_then(|id| id.parse::<u32>().ok())
        };
        if let Some(id) = product_id("product_") {
            return Some(ShowcaseAction::ViewProduct(id));
        }
        if let Some(id) = product_id("purchase_") {
            return Some(ShowcaseAction::Purchase(id));
        }
        if let Some(id) = product_id("favorite_") {
            return Some(ShowcaseAction::Favorite(id));
        }

        match custom_id {
            "refresh_stats" => Some(ShowcaseAction::RefreshStats),
            "back_to_main" => Some(ShowcaseAction::BackToMain),
            "demo_primary" => Some(ShowcaseAction::StyleDemo(ButtonStyle::Primary)),
            "demo_success" => Some(ShowcaseAction::StyleDemo(ButtonStyle::Success)),
            "demo_danger" => Some(ShowcaseAction::StyleDemo(ButtonStyle::Danger)),
            "reset_demo" => Some(ShowcaseAction::Reset),
            "export_data" => Some(ShowcaseAction::Export),
            "close_demo" => Some(ShowcaseAction::Close),
            "clear_log" => Some(ShowcaseAction::ClearLog),
            "demo_select" => values
                .first()
                .and_then(|v| DemoOption::parse(v))
                .map(ShowcaseAction::Select),
            _ => None,
        }
    }
}

struct LiveSurface {
    owner: u64,
    timer: SessionTimer,
}

pub struct ShowcaseCommand {
    tracker: Arc<SessionTracker>,
    timeout: Duration,
    recent: usize,
    /// Live surfaces keyed by message id.
    surfaces: Arc<Mutex<HashMap<u64, Arc<LiveSurface>>>>,
    /// Users with a showcase posted but not yet registered, with a count per user.
    opening: Mutex<HashMap<u64, usize>>,
    registered: Notify,
    demo: Mutex<DemoStats>,
}

impl ShowcaseCommand {
    pub fn new(tracker: Arc<SessionTracker>, timeout: Duration, recent: usize) -> Self {
        Self {
            tracker,
            timeout,
            recent,
            surfaces: Arc::new(Mutex::new(HashMap::new())),
            opening: Mutex::new(HashMap::new()),
            registered: Notify::new(),
            demo: Mutex::new(DemoStats::default()),
        }
    }

    fn main_surface(&self, username: &str) -> Surface {
        let stats = self.demo.lock().unwrap().clone();
        let accent = random_accent(&mut rand::thread_rng());
        main_view(username, &stats, accent)
    }

    fn log_surface(&self, user_id: u64) -> Surface {
        log_view(&self.tracker.get(user_id), self.recent, Utc::now())
    }

    fn drop_surface(&self, message_id: u64) {
        self.surfaces.lock().unwrap().remove(&message_id);
    }

    fn begin_opening(&self, user_id: u64) {
        *self.opening.lock().unwrap().entry(user_id).or_insert(0) += 1;
    }

    fn finish_opening(&self, user_id: u64) {
        {
            let mut opening = self.opening.lock().unwrap();
            if let Some(count) = opening.get_mut(&user_id) {
                *count -= 1;
                if *count == 0 {
                    opening.remove(&user_id);
                }
            }
        }
        self.registered.notify_waiters();
    }

    /// Live surface for a message. A click that races the registration of
    /// its user's newest showcase waits for it instead of reporting expiry.
    async fn find_surface(&self, message_id: u64, user_id: u64) -> Option<Arc<LiveSurface>> {
        let deadline = tokio::time::Instant::now() + REGISTRATION_WAIT;
        loop {
            let registered = self.registered.notified();
            if let Some(live) = self.surfaces.lock().unwrap().get(&message_id).cloned() {
                return Some(live);
            }
            if !self.opening.lock().unwrap().contains_key(&user_id) {
                return None;
            }
            if tokio::time::timeout_at(deadline, registered).await.is_err() {
                return None;
            }
        }
    }

    async fn dispatch(
        &self,
        parsed: ShowcaseAction,
        action: &ComponentAction,
        live: &LiveSurface,
        active: &mut ActiveSurface,
        responder: &dyn Responder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let user = action.user_id;

        match parsed {
            ShowcaseAction::RefreshStats => {
                {
                    let mut rng = rand::thread_rng();
                    self.demo.lock().unwrap().refresh(&mut rng);
                }
                self.tracker
                    .record(user, "Stats Refreshed", "Updated live statistics");
                responder.update(self.main_surface(&action.username)).await?;
            }
            ShowcaseAction::ViewProduct(id) => {
                self.tracker
                    .record(user, "Product Viewed", &format!("Viewed product {}", id));
                match product(id) {
                    Some(p) => {
                        let downloads = rand::thread_rng().gen_range(0..10_000);
                        responder.update(product_view(p, downloads)).await?;
                    }
                    None => {
                        responder.reply(Reply::notice("❌ Product not found.")).await?;
                    }
                }
            }
            ShowcaseAction::Purchase(id) => {
                let p = product(id);
                self.tracker.record(
                    user,
                    "Purchase Attempted",
                    &format!("Attempted to purchase {}", p.map_or("Unknown", |p| p.name)),
                );
                responder.reply(Reply::notice(purchase_notice(p))).await?;
            }
            ShowcaseAction::Favorite(id) => {
                let p = product(id);
                self.tracker.record(
                    user,
                    "Favorite Added",
                    &format!("Added {} to favorites", p.map_or("Unknown", |p| p.name)),
                );
                responder.reply(Reply::notice(favorite_notice(p))).await?;
            }
            ShowcaseAction::BackToMain => {
                self.tracker
                    .record(user, "Navigation", "Returned to main showcase");
                responder.update(self.main_surface(&action.username)).await?;
            }
            ShowcaseAction::StyleDemo(style) => {
                self.tracker
                    .record(user, "Button Clicked", &format!("{:?} style button", style));
                responder.reply(Reply::notice(style_notice(style))).await?;
            }
            ShowcaseAction::Reset => {
                self.tracker.reset(user);
                self.tracker
                    .record(user, "Demo Reset", "Cleared interaction history");
                responder.update(self.main_surface(&action.username)).await?;
            }
            ShowcaseAction::Export => {
                let snapshot = self.tracker.get(user);
                let stats = self.demo.lock().unwrap().clone();
                let json = SessionExport::new(&action.username, &snapshot, &stats).to_json()?;
                self.tracker
                    .record(user, "Data Exported", "Exported session data");
                let filename = format!("showcase-export-{}.json", Utc::now().timestamp_millis());
                responder
                    .reply(Reply::notice(EXPORT_NOTICE).with_attachment(filename, json))
                    .await?;
            }
            ShowcaseAction::Close => {
                self.tracker
                    .record(user, "Demo Closed", "Manually closed the demo");
                active.close();
                live.timer.disarm();
                self.drop_surface(action.message_id);
                log::info!("Showcase {} closed by its owner", action.message_id);
                responder.update(closed_view()).await?;
            }
            ShowcaseAction::ClearLog => {
                self.tracker.reset(user);
                self.tracker
                    .record(user, "Log Cleared", "Cleared interaction history");
                responder.update(self.log_surface(user)).await?;
            }
            ShowcaseAction::Select(option) => {
                match option {
                    DemoOption::Colors => {
                        self.tracker
                            .record(user, "Color Demo", "Viewed color variants");
                        let accent = random_accent(&mut rand::thread_rng());
                        responder.update(colors_view(accent)).await?;
                    }
                    DemoOption::Spoiler => {
                        self.tracker
                            .record(user, "Spoiler Demo", "Toggled spoiler mode");
                        responder.update(spoiler_view()).await?;
                    }
                    DemoOption::Regenerate => {
                        {
                            let mut rng = rand::thread_rng();
                            self.demo.lock().unwrap().regenerate(&mut rng);
                        }
                        self.tracker.record(
                            user,
                            "Content Regenerated",
                            "Generated new random content",
                        );
                        responder.update(self.main_surface(&action.username)).await?;
                    }
                    DemoOption::Log => {
                        self.tracker
                            .record(user, "Log Viewed", "Opened interaction log");
                        responder.update(self.log_surface(user)).await?;
                    }
                }
                responder
                    .follow_up(Reply::notice(select_notice(option.as_str())))
                    .await?;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    fn live_surfaces(&self) -> usize {
        self.surfaces.lock().unwrap().len()
    }
}

#[async_trait]
impl Command for ShowcaseCommand {
    fn name(&self) -> &str {
        "showcase"
    }

    fn description(&self) -> &str {
        "Interactive demo of every message layout feature"
    }

    fn scope(&self) -> CommandScope {
        CommandScope::Both
    }

    fn aliases(&self) -> &[&str] {
        &["cv2", "componentsv2"]
    }

    async fn execute(
        &self,
        inv: &Invocation,
        _ctx: &CommandContext,
        responder: &dyn Responder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let reply = Reply::surface(self.main_surface(&inv.username))
            .with_attachment(DEMO_FILE_NAME, demo_file(Utc::now()));

        self.begin_opening(inv.user_id);
        let posted = match responder.reply(reply).await {
            Ok(()) => {
                self.tracker
                    .record(inv.user_id, "Command Executed", "Started showcase demo");
                responder.original().await
            }
            Err(e) => Err(e),
        };
        let sent = match posted {
            Ok(sent) => sent,
            Err(e) => {
                self.finish_opening(inv.user_id);
                return Err(e);
            }
        };
        let message_id = sent.message_id;
        let live = Arc::new(LiveSurface {
            owner: inv.user_id,
            timer: SessionTimer::new(self.timeout),
        });
        self.surfaces
            .lock()
            .unwrap()
            .insert(message_id, Arc::clone(&live));

        let surfaces = Arc::clone(&self.surfaces);
        let editor = sent.editor;
        live.timer.arm(move || async move {
            if let Err(e) = editor.edit(expired_view()).await {
                log::error!("Failed to render expired showcase {}: {}", message_id, e);
            }
            surfaces.lock().unwrap().remove(&message_id);
            log::info!("Showcase {} expired", message_id);
        });
        self.finish_opening(inv.user_id);

        log::debug!(
            "Showcase {} opened for {} ({:?})",
            message_id,
            inv.username,
            self.timeout
        );
        Ok(())
    }

    fn handles_component(&self, custom_id: &str) -> bool {
        BUTTON_IDS.contains(&custom_id)
            || PRODUCT_PREFIXES.iter().any(|p| custom_id.starts_with(p))
    }

    async fn handle_component(
        &self,
        action: &ComponentAction,
        _ctx: &CommandContext,
        responder: &dyn Responder,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let live = match self.find_surface(action.message_id, action.user_id).await {
            Some(live) => live,
            None => {
                log::debug!("Action {} on inactive showcase", action.custom_id);
                return responder.reply(Reply::notice(EXPIRED_NOTICE)).await;
            }
        };

        if action.user_id != live.owner {
            log::warn!(
                "User {} tried to use showcase {} owned by {}",
                action.user_id,
                action.message_id,
                live.owner
            );
            return responder.reply(Reply::notice(PRIVATE_NOTICE)).await;
        }

        let mut active = match live.timer.acquire().await {
            Some(active) => active,
            None => return responder.reply(Reply::notice(EXPIRED_NOTICE)).await,
        };

        let parsed = match ShowcaseAction::parse(&action.custom_id, &action.values) {
            Some(parsed) => parsed,
            None => {
                log::warn!("Unknown showcase action: {}", action.custom_id);
                return responder
                    .reply(Reply::notice("❌ Unknown action."))
                    .await;
            }
        };

        self.dispatch(parsed, action, &live, &mut active, responder)
            .await
    }
}
