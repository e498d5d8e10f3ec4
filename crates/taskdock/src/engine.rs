//! The single-owner engine loop: panel control, mutation submission, and the
//! credential-gated poll scheduler.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use crate::cache::TaskCache;
use crate::gateway::Gateway;
use crate::protocol::{AuthReply, PageOp, TaskDraft, TaskId, UiEvent, ids};
use crate::render;
use crate::session::SessionStore;

/// Tunables for one engine instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay between task list refreshes once authenticated.
    pub poll_period: Duration,
    /// How long a flashed alert stays visible.
    pub alert_duration: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_period: Duration::from_millis(3000),
            alert_duration: Duration::from_millis(2000),
        }
    }
}

/// Sending half of the page-op stream.
///
/// The receiver disappearing means the page is gone; sends are therefore
/// fire-and-forget. The engine loop itself ends separately, when the event
/// channel closes.
#[derive(Debug, Clone)]
pub struct PageHandle {
    ops: mpsc::UnboundedSender<PageOp>,
}

impl PageHandle {
    pub fn new(ops: mpsc::UnboundedSender<PageOp>) -> Self {
        Self { ops }
    }

    fn send(&self, op: PageOp) {
        let _ = self.ops.send(op);
    }

    fn show(&self, id: &str) {
        self.send(PageOp::Show { id: id.to_string() });
    }

    fn hide(&self, id: &str) {
        self.send(PageOp::Hide { id: id.to_string() });
    }

    fn set_html(&self, id: &str, html: String) {
        self.send(PageOp::SetHtml {
            id: id.to_string(),
            html,
        });
    }

    fn reset_form(&self, id: &str) {
        self.send(PageOp::ResetForm { id: id.to_string() });
    }
}

/// Owns all per-session mutable state: the credential, the task snapshot,
/// and the poll timer.
///
/// One engine serves one page connection. Events and poll ticks are
/// processed one at a time on the task running [`Engine::run`], so cache
/// reads never observe a half-applied snapshot and a slow poll delays the
/// next tick instead of racing it.
pub struct Engine<G> {
    gateway: G,
    session: SessionStore,
    cache: TaskCache,
    page: PageHandle,
    config: EngineConfig,
}

impl<G: Gateway> Engine<G> {
    pub fn new(gateway: G, page: PageHandle, config: EngineConfig) -> Self {
        Self {
            gateway,
            session: SessionStore::new(),
            cache: TaskCache::new(),
            page,
            config,
        }
    }

    /// Drive the engine until the event channel closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) {
        // Absent until the first successful login; never goes away after.
        let mut poll: Option<Interval> = None;

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event, &mut poll).await;
                }
                _ = next_tick(&mut poll) => {
                    self.refresh_tasks().await;
                }
            }
        }
        debug!("event channel closed; engine stopping");
    }

    async fn handle_event(&mut self, event: UiEvent, poll: &mut Option<Interval>) {
        match event {
            UiEvent::Login { username, password } => {
                self.login(&username, &password, poll).await;
            }
            UiEvent::CreateTask { lang, name, code } => {
                self.create_task(TaskDraft { lang, name, code }).await;
            }
            UiEvent::OpenTask { id } => self.open_task(&id),
            UiEvent::CloseTask => self.show_create_form(),
        }
    }

    async fn login(&mut self, username: &str, password: &str, poll: &mut Option<Interval>) {
        match self.gateway.authenticate(username, password).await {
            Ok(AuthReply::Granted { token }) => {
                debug!("authenticated; starting task poll");
                self.session.set_credential(token);
                self.page.hide(ids::LOGIN_PANEL);
                self.page.show(ids::MAIN_PANEL);
                self.show_create_form();
                // One immediate fetch, then the recurring timer.
                self.refresh_tasks().await;
                *poll = Some(poll_interval(self.config.poll_period));
            }
            Ok(AuthReply::Denied { cause, .. }) => self.flash_alert(&cause),
            Err(err) => {
                warn!(%err, "authenticate call failed");
                self.flash_alert(&format!("login failed: {err}"));
            }
        }
    }

    async fn create_task(&self, draft: TaskDraft) {
        let Some(token) = self.session.credential() else {
            // The create form is unreachable before login; drop quietly.
            return;
        };
        match self.gateway.create_task(token, &draft).await {
            Ok(id) => {
                // The new task is not folded into the cache here; it shows
                // up on the next poll tick.
                self.page.reset_form(ids::CREATE_FORM);
                self.flash_alert(&format!("Task #{id} created"));
            }
            Err(err) => {
                warn!(%err, "create task failed");
                self.flash_alert(&format!("create failed: {err}"));
            }
        }
    }

    /// One poll tick: fetch the full snapshot, swap the cache, re-render the
    /// list. Failures skip the tick; the timer keeps running.
    async fn refresh_tasks(&mut self) {
        let Some(token) = self.session.credential() else {
            return;
        };
        match self.gateway.list_tasks(token).await {
            Ok(tasks) => {
                self.cache.replace_all(tasks);
                self.page
                    .set_html(ids::TASK_LIST, render::render_list(self.cache.all()));
            }
            Err(err) => debug!(%err, "task poll failed; retrying next tick"),
        }
    }

    fn open_task(&self, id: &TaskId) {
        match self.cache.find_by_id(id) {
            Some(task) => {
                self.page
                    .set_html(ids::DETAIL_TABLE, render::render_detail(task));
                self.page.hide(ids::CREATE_FORM);
                self.page.show(ids::DETAIL_PANEL);
            }
            None => {
                // The row came from an older snapshot and the task has since
                // dropped out.
                self.flash_alert(&format!("task {id} no longer exists"));
            }
        }
    }

    fn show_create_form(&self) {
        self.page.hide(ids::DETAIL_PANEL);
        self.page.show(ids::CREATE_FORM);
    }

    /// Show a transient alert, auto-hidden after the configured duration.
    /// A newer flash does not cancel an older hide timer.
    fn flash_alert(&self, text: &str) {
        self.page.set_html(ids::ALERT, render::escape(text));
        self.page.show(ids::ALERT);
        let page = self.page.clone();
        let visible_for = self.config.alert_duration;
        tokio::spawn(async move {
            tokio::time::sleep(visible_for).await;
            page.hide(ids::ALERT);
        });
    }
}

/// Wait for the next poll tick, or forever while unauthenticated.
async fn next_tick(poll: &mut Option<Interval>) {
    match poll.as_mut() {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// The immediate fetch happens in the login handler, so the first timer tick
/// lands one full period later. Slow polls push later ticks back instead of
/// stacking.
fn poll_interval(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
