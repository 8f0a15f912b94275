//! The panoramic video element, driven through the engine's media seam.

use route_walker_lib::{
    error::MediaError,
    playback::{BindingId, MediaBackend, MediaEvent, MediaSignal},
};
use gloo_console::info;
use gloo_utils::document;
use wasm_bindgen::{prelude::*, JsCast};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{js_sys::Reflect, HtmlVideoElement};
use yew::Callback;

const HLS_MIME: &str = "application/vnd.apple.mpegurl";
pub const VIDEO_ID: &str = "walkVideo";

#[wasm_bindgen]
extern "C" {
    // hls.js, loaded by index.html
    type Hls;

    #[wasm_bindgen(catch, static_method_of = Hls, js_name = isSupported)]
    fn is_supported() -> Result<bool, JsValue>;

    #[wasm_bindgen(constructor)]
    fn new() -> Hls;

    #[wasm_bindgen(method, js_name = loadSource)]
    fn load_source(this: &Hls, source: &str);

    #[wasm_bindgen(method, js_name = attachMedia)]
    fn attach_media(this: &Hls, media: &HtmlVideoElement);

    #[wasm_bindgen(method)]
    fn on(this: &Hls, event: &str, handler: &JsValue);

    #[wasm_bindgen(method)]
    fn destroy(this: &Hls);
}

// Kept alive for as long as the element handlers point at them.
struct Listeners {
    _can_play: Closure<dyn FnMut()>,
    _ended: Closure<dyn FnMut()>,
    _error: Closure<dyn FnMut()>,
    _hls_error: Option<Closure<dyn FnMut(JsValue, JsValue)>>,
}

pub struct HlsVideo {
    element: HtmlVideoElement,
    signals: Callback<MediaSignal>,
    hls: Option<Hls>,
    listeners: Option<Listeners>,
}

impl HlsVideo {
    pub fn new(element: HtmlVideoElement, signals: Callback<MediaSignal>) -> Self {
        Self {
            element,
            signals,
            hls: None,
            listeners: None,
        }
    }

    pub fn create_element() -> HtmlVideoElement {
        let video: HtmlVideoElement = document()
            .create_element("video")
            .unwrap_throw()
            .dyn_into()
            .unwrap_throw();

        video.set_id(VIDEO_ID);
        video.set_class_name("walk-video");
        video.set_cross_origin(Some("anonymous"));
        // iOS goes fullscreen without these
        let _ = video.set_attribute("playsinline", "");
        let _ = video.set_attribute("webkit-playsinline", "");
        video
    }

    fn emitter(&self, binding: BindingId, event: MediaEvent) -> Closure<dyn FnMut()> {
        let signals = self.signals.clone();
        Closure::wrap(Box::new(move || {
            signals.emit(MediaSignal::new(binding, event.clone()));
        }) as Box<dyn FnMut()>)
    }

    fn error_listener(&self, binding: BindingId) -> Closure<dyn FnMut()> {
        let signals = self.signals.clone();
        let element = self.element.clone();
        Closure::wrap(Box::new(move || {
            let reason = element.error()
                .map(|err| err.message())
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| "The video could not be loaded".to_string());
            signals.emit(MediaSignal::new(binding, MediaEvent::Failed(reason)));
        }) as Box<dyn FnMut()>)
    }

    fn hls_error_listener(&self, binding: BindingId) -> Closure<dyn FnMut(JsValue, JsValue)> {
        let signals = self.signals.clone();
        Closure::wrap(Box::new(move |_event: JsValue, data: JsValue| {
            let field = |name: &str| Reflect::get(&data, &JsValue::from_str(name)).ok();

            // hls.js recovers from non-fatal errors by itself
            if field("fatal").and_then(|fatal| fatal.as_bool()) != Some(true) {
                return;
            }

            let details = field("details")
                .and_then(|details| details.as_string())
                .unwrap_or_else(|| "Stream error".to_string());
            signals.emit(MediaSignal::new(binding, MediaEvent::Failed(details)));
        }) as Box<dyn FnMut(JsValue, JsValue)>)
    }
}

impl MediaBackend for HlsVideo {
    fn attach(&mut self, source: &str, binding: BindingId) -> Result<(), MediaError> {
        let hls_supported = Hls::is_supported().unwrap_or(false);
        let native = !self.element.can_play_type(HLS_MIME).is_empty();
        if !hls_supported && !native {
            return Err(MediaError::Unsupported(format!("This browser cannot play {source}")));
        }

        let can_play = self.emitter(binding, MediaEvent::Ready);
        let ended = self.emitter(binding, MediaEvent::Ended);
        let error = self.error_listener(binding);

        self.element.set_oncanplay(Some(can_play.as_ref().unchecked_ref()));
        self.element.set_onended(Some(ended.as_ref().unchecked_ref()));
        self.element.set_onerror(Some(error.as_ref().unchecked_ref()));

        let hls_error = if hls_supported {
            let hls = Hls::new();
            let on_error = self.hls_error_listener(binding);
            hls.on("hlsError", on_error.as_ref());
            hls.load_source(source);
            hls.attach_media(&self.element);
            self.hls = Some(hls);
            Some(on_error)
        } else {
            info!("Using native HLS playback");
            self.element.set_src(source);
            self.element.load();
            None
        };

        self.listeners = Some(Listeners {
            _can_play: can_play,
            _ended: ended,
            _error: error,
            _hls_error: hls_error,
        });

        Ok(())
    }

    fn detach(&mut self) {
        self.element.set_oncanplay(None);
        self.element.set_onended(None);
        self.element.set_onerror(None);
        let _ = self.element.pause();

        if let Some(hls) = self.hls.take() {
            hls.destroy();
        }

        let _ = self.element.remove_attribute("src");
        self.element.load();
        self.listeners = None;
    }

    fn play(&mut self, binding: BindingId) {
        let signals = self.signals.clone();

        match self.element.play() {
            Ok(promise) => spawn_local(async move {
                let event = match JsFuture::from(promise).await {
                    Ok(_) => MediaEvent::PlayGranted,
                    Err(err) => MediaEvent::PlayDeferred(format!("{err:?}")),
                };
                signals.emit(MediaSignal::new(binding, event));
            }),
            Err(err) => signals.emit(MediaSignal::new(binding, MediaEvent::PlayDeferred(format!("{err:?}")))),
        }
    }

    fn pause(&mut self) {
        let _ = self.element.pause();
    }

    fn set_muted(&mut self, muted: bool) {
        self.element.set_muted(muted);
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.element.set_playback_rate(rate);
    }
}
