use crate::components::{
    finish_panel::FinishPanel,
    hud_panel::HudPanel,
    map_component::{MapComponent, MapMode},
    route_picker::RoutePicker,
};
use gloo_console::{error, info};
use gloo_render::{request_animation_frame, AnimationFrame};
use route_walker_lib::{
    navigation::{self, NavKind, NavNode, HOME},
    playback::MediaSignal,
    session::ProgressUpdate,
    Command, CommandTable, RouteCatalog, SessionEvent, SessionLifecycle, SessionPhase, WalkConfig,
};
use sphere::{SphereChange, VideoSphere};
use video::HlsVideo;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlVideoElement, Node};
use yew::{html::Scope, prelude::*};

mod api;
mod components;
mod sphere;
mod video;

enum MainMsg {
    CatalogLoaded(RouteCatalog),
    ConfigLoaded(WalkConfig),
    Select(NavNode),
    Back,
    Command(Command),
    Media(MediaSignal),
    Frame(f64),
}

struct Model {
    catalog: RouteCatalog,
    config: WalkConfig,
    nav: NavNode,
    /// Id of the selection screen shown while no walk is running.
    screen: String,
    session: SessionLifecycle<HlsVideo>,
    commands: CommandTable<HlsVideo>,
    video: HtmlVideoElement,
    sphere: VideoSphere,
    progress: Option<ProgressUpdate>,
    notice: Option<String>,
    // Dropping the handle cancels the pending frame
    _frame: AnimationFrame,
}

impl Model {
    fn new_session(link: &Scope<Self>, video: &HtmlVideoElement, config: &WalkConfig) -> SessionLifecycle<HlsVideo> {
        let backend = HlsVideo::new(video.clone(), link.callback(MainMsg::Media));
        SessionLifecycle::new(backend, config)
    }

    fn request_frame(link: &Scope<Self>) -> AnimationFrame {
        let link = link.clone();
        request_animation_frame(move |timestamp| link.send_message(MainMsg::Frame(timestamp)))
    }

    fn dispatch(&mut self, command: Command) {
        if let Err(err) = self.commands.dispatch(&mut self.session, &self.catalog, &command) {
            error!(format!("{} failed: {err}", command.action()));
            self.notice = Some(err.to_string());
        }
    }

    /// Applies the session's events to what is on screen. Returns true if
    /// anything visible changed.
    fn apply_events(&mut self) -> bool {
        let events = self.session.drain_events();
        let changed = !events.is_empty();

        for event in events {
            if let Some(change) = SphereChange::for_event(&event) {
                self.sphere.apply(change);
            }

            match event {
                SessionEvent::Started { route_key, binding } => {
                    info!(format!("Walking {route_key} ({binding:?})"));
                    self.progress = self.session.snapshot();
                    self.notice = Some("Mueve la velocidad para empezar a caminar".into());
                }
                SessionEvent::PlaybackStarted => self.notice = None,
                SessionEvent::AwaitingGesture => {
                    self.notice = Some("Toca la velocidad otra vez para iniciar el video".into());
                }
                SessionEvent::Progress(update) => self.progress = Some(update),
                SessionEvent::Finished(summary) => {
                    info!(format!("Finished {} in {}", summary.route_name, summary.time_text()));
                    self.notice = None;
                }
                SessionEvent::MediaFailed(reason) => {
                    error!(format!("Media failed: {reason}"));
                    self.progress = None;
                    self.notice = Some(format!("No se pudo reproducir el video: {reason}"));
                }
                SessionEvent::Left => {
                    self.progress = None;
                    self.notice = None;
                }
            }
        }

        changed
    }

    fn view_walk(&self, ctx: &Context<Self>) -> Html {
        let Some(route) = self.session.route().cloned() else {
            return html! {};
        };

        let link = ctx.link();
        let on_speed = link.callback(|speed: f64| MainMsg::Command(Command::SetSpeed(speed)));
        let on_end = link.callback(|()| MainMsg::Command(Command::EndRoute));
        let position = self.progress.as_ref().map_or(route.start(), |progress| progress.position);

        html! { <>
            <HudPanel
                route_name={AttrValue::from(route.name().to_string())}
                progress={self.progress.clone()}
                speed={self.session.speed()}
                notice={self.notice.clone().map(AttrValue::from)}
                {on_speed}
                {on_end}
            />
            <MapComponent
                route={route}
                {position}
                mode={MapMode::Live}
                zoom={self.config.map.zoom}
            />
        </> }
    }

    fn view_finish(&self, ctx: &Context<Self>) -> Html {
        let (Some(route), Some(summary)) = (self.session.route().cloned(), self.session.summary().cloned()) else {
            return html! {};
        };

        let link = ctx.link();
        html! {
            <FinishPanel
                {summary}
                {route}
                zoom={self.config.map.zoom}
                on_repeat={link.callback(|()| MainMsg::Command(Command::RepeatRoute))}
                on_back={link.callback(|()| MainMsg::Command(Command::LeaveFinish))}
            />
        }
    }

    fn view_picker(&self, ctx: &Context<Self>) -> Html {
        let path: Vec<NavNode> = self.nav.path_to(&self.screen)
            .unwrap_or_default()
            .into_iter()
            .cloned()
            .collect();

        let link = ctx.link();
        html! { <>
            <RoutePicker
                {path}
                on_select={link.callback(MainMsg::Select)}
                on_back={link.callback(|()| MainMsg::Back)}
            />
            if let Some(notice) = &self.notice {
                <label class="error-banner">{notice.clone()}</label>
            }
        </> }
    }
}

impl Component for Model {
    type Message = MainMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();

        let cb = link.callback(MainMsg::CatalogLoaded);
        spawn_local(async move {
            match api::get_catalog().await {
                Ok(catalog) => cb.emit(catalog),
                Err(err) => error!(format!("Using built-in routes: {err}")),
            }
        });

        let cb = link.callback(MainMsg::ConfigLoaded);
        spawn_local(async move {
            match api::get_config().await {
                Ok(config) => cb.emit(config),
                Err(err) => error!(format!("Using default walk config: {err}")),
            }
        });

        let catalog = RouteCatalog::builtin();
        let config = WalkConfig::default();
        let video = HlsVideo::create_element();

        Self {
            nav: navigation::builtin(&catalog),
            screen: HOME.to_string(),
            session: Self::new_session(&link, &video, &config),
            commands: CommandTable::standard(),
            catalog,
            config,
            video,
            sphere: VideoSphere::new(video::VIDEO_ID),
            progress: None,
            notice: None,
            _frame: Self::request_frame(&link),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            MainMsg::CatalogLoaded(catalog) => {
                info!(format!("Loaded {} routes", catalog.len()));
                let nav = navigation::builtin(&catalog);
                for region in nav.orphan_regions(&catalog) {
                    error!(format!("Region {region} is not listed on any screen"));
                }
                if nav.find(&self.screen).is_none() {
                    self.screen = HOME.to_string();
                }
                self.nav = nav;
                self.catalog = catalog;
            }
            MainMsg::ConfigLoaded(config) => {
                self.config = config;
                if self.session.phase() == SessionPhase::Idle {
                    self.session = Self::new_session(ctx.link(), &self.video, &self.config);
                } else {
                    info!("Walk config applies from the next session");
                }
            }
            MainMsg::Select(node) => match node.kind {
                NavKind::Menu => {
                    self.notice = None;
                    self.screen = node.id;
                }
                NavKind::Route { region, key } => self.dispatch(Command::StartRoute { region, key }),
            },
            MainMsg::Back => {
                if let Some(parent) = self.nav.parent_of(&self.screen) {
                    self.screen = parent.id.clone();
                }
            }
            MainMsg::Command(command) => self.dispatch(command),
            MainMsg::Media(signal) => self.session.handle_media(signal),
            MainMsg::Frame(timestamp) => {
                self.session.frame(timestamp);
                self._frame = Self::request_frame(ctx.link());
                return self.apply_events();
            }
        }

        self.apply_events();
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let phase = self.session.phase();
        let video: Node = self.video.clone().into();
        let scene: Node = self.sphere.scene().clone().into();

        html! {
            <div class="app">
                <div class={classes!("video-layer", (phase != SessionPhase::Active).then_some("hidden"))}>
                    {Html::VRef(video)}
                    {Html::VRef(scene)}
                </div>
                {match phase {
                    SessionPhase::Idle => self.view_picker(ctx),
                    SessionPhase::Active => self.view_walk(ctx),
                    SessionPhase::Finished => self.view_finish(ctx),
                }}
            </div>
        }
    }
}

fn main() {
    yew::Renderer::<Model>::new().render();
}
