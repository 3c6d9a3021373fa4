use eframe::egui;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::auth::{Route, Session, guard_feed, resolve_root};
use crate::common::{ApiCommand, ApiEvent, PostId};
use crate::feed::{FeedController, FeedState};

use super::components::{login_form, post_composer, post_list};
use super::state::AppState;

/// Everything the window shows, minus the window. Commands go out through
/// `dispatch` and results come back through `handle_event`.
pub struct AppModel {
    route: Route,
    session: Session,
    feed: FeedController,
    state: AppState,
    command_sender: mpsc::Sender<ApiCommand>,
}

impl AppModel {
    pub fn new(session: Session, command_sender: mpsc::Sender<ApiCommand>) -> Self {
        let mut model = Self {
            route: Route::Login,
            session,
            feed: FeedController::new(),
            state: AppState::new(),
            command_sender,
        };
        let start = resolve_root(&model.session);
        model.navigate(start);
        model
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn feed(&self) -> &FeedController {
        &self.feed
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Switches views, running the feed guard on every feed entry.
    pub fn navigate(&mut self, route: Route) {
        let route = match route {
            Route::Feed => guard_feed(&self.session).unwrap_or(Route::Feed),
            Route::Login => Route::Login,
        };
        log::info!("Navigating to {}", route.path());
        self.route = route;

        if route == Route::Feed {
            self.reload_feed();
        }
    }

    fn reload_feed(&mut self) {
        self.feed.begin_load();
        self.dispatch(ApiCommand::LoadPosts);
    }

    pub fn retry(&mut self) {
        if self.feed.retry() {
            self.dispatch(ApiCommand::LoadPosts);
        }
    }

    pub fn sign_out(&mut self) {
        if let Err(err) = self.session.sign_out() {
            log::warn!("Failed to clear session: {err}");
        }
        self.feed = FeedController::new();
        self.state.reset_feed_inputs();
        self.navigate(Route::Login);
    }

    pub fn handle_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::LoggedIn(token) => match self.session.store(&token) {
                Ok(()) => {
                    self.state.login.succeeded();
                    self.navigate(Route::Feed);
                }
                Err(err) => self.state.login.failed(err.to_string()),
            },
            ApiEvent::LoginFailed(message) => self.state.login.failed(message),
            ApiEvent::PostsLoaded(posts) => self.feed.finish_load(Ok(posts)),
            ApiEvent::PostsFailed(message) => self.feed.finish_load(Err(message)),
            ApiEvent::PostCreated(post) => {
                self.feed.insert_created(post);
                self.state.composer.succeeded();
            }
            ApiEvent::PostCreateFailed(message) => self.state.composer.failed(message),
            ApiEvent::PostUpdated { post_id, post } => {
                self.feed.apply_saved(post_id, post);
                self.state.comments.succeeded(post_id);
            }
            ApiEvent::PostUpdateFailed { post_id, message } => {
                self.state.comments.failed(post_id, message);
            }
        }
    }

    /// Hands `command` to the worker. When the channel refuses it, the
    /// command fails locally so its in-flight flag is cleared.
    pub fn dispatch(&mut self, command: ApiCommand) -> bool {
        let label = command.label();
        let (command, message) = match self.command_sender.try_send(command) {
            Ok(()) => return true,
            Err(TrySendError::Full(command)) => {
                (command, "Too many requests in flight, try again")
            }
            Err(TrySendError::Closed(command)) => (command, "Network worker is not running"),
        };
        log::warn!("Failed to send {label} command to API worker: {message}");
        self.handle_event(command.into_failure(message.to_string()));
        false
    }

    pub fn submit_comment(&mut self, post_id: PostId) {
        let Some(content) = self.state.comments.submit(post_id) else {
            return;
        };
        match self.feed.stage_comment(post_id, &content) {
            Some(post) => {
                self.dispatch(ApiCommand::UpdatePost(post));
            }
            None => self.state.comments.succeeded(post_id),
        }
    }
}

pub struct FeedApp {
    model: AppModel,
    event_receiver: mpsc::Receiver<ApiEvent>,
}

impl FeedApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        session: Session,
        command_sender: mpsc::Sender<ApiCommand>,
        event_receiver: mpsc::Receiver<ApiEvent>,
    ) -> Self {
        Self {
            model: AppModel::new(session, command_sender),
            event_receiver,
        }
    }

    fn handle_api_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.model.handle_event(event);
        }
    }

    fn show_login(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.set_max_width(320.0);
            if let Some(command) = login_form::render(ui, &mut self.model.state.login) {
                self.model.dispatch(command);
            }
        });
    }

    fn show_feed(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Feed");
            if ui.button("Sign out").clicked() {
                self.model.sign_out();
            }
        });
        ui.separator();

        if self.model.route != Route::Feed {
            return;
        }

        match self.model.feed.state().clone() {
            FeedState::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading posts...");
                });
                return;
            }
            FeedState::Error(message) => {
                ui.horizontal(|ui| {
                    ui.colored_label(egui::Color32::RED, message);
                    if ui.button("Retry").clicked() {
                        self.model.retry();
                    }
                });
                ui.separator();
            }
            FeedState::Ready => {}
        }

        if let Some(command) = post_composer::render(ui, &mut self.model.state.composer) {
            self.model.dispatch(command);
        }
        ui.separator();

        if let Some(post_id) =
            post_list::render(ui, self.model.feed.posts(), &mut self.model.state.comments)
        {
            self.model.submit_comment(post_id);
        }
    }
}

impl eframe::App for FeedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_api_events();

        egui::CentralPanel::default().show(ctx, |ui| match self.model.route {
            Route::Login => self.show_login(ui),
            Route::Feed => self.show_feed(ui),
        });

        ctx.request_repaint();
    }
}
