//! A-Frame scene that wraps the walk video around the viewer.

use gloo_console::error;
use gloo_utils::{document, window};
use route_walker_lib::SessionEvent;
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt};
use web_sys::{js_sys::Reflect, Element, HtmlElement};

// Faces the camera forward along the recorded direction of travel.
const SPHERE_ROTATION: &str = "0 -90 0";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SphereChange {
    Attach,
    Detach,
}

impl SphereChange {
    /// Texture goes on only after playback is granted.
    pub fn for_event(event: &SessionEvent) -> Option<Self> {
        match event {
            SessionEvent::PlaybackStarted => Some(Self::Attach),
            SessionEvent::Started { .. } | SessionEvent::Finished(_) | SessionEvent::MediaFailed(_) | SessionEvent::Left => {
                Some(Self::Detach)
            }
            SessionEvent::AwaitingGesture | SessionEvent::Progress(_) => None,
        }
    }
}

fn source_selector(video_id: &str) -> String {
    format!("#{video_id}")
}

pub struct VideoSphere {
    scene: HtmlElement,
    sphere: Element,
    video_id: String,
}

impl VideoSphere {
    pub fn new(video_id: &str) -> Self {
        let scene: HtmlElement = document()
            .create_element("a-scene")
            .unwrap_throw()
            .dyn_into()
            .unwrap_throw();
        scene.set_class_name("sphere-scene");
        let _ = scene.set_attribute("embedded", "");
        let _ = scene.set_attribute("vr-mode-ui", "enabled: false");

        let sphere = document().create_element("a-videosphere").unwrap_throw();
        let _ = scene.append_child(&sphere);

        if !aframe_loaded() {
            error!("A-Frame is not loaded, the video stays flat");
        }

        Self {
            scene,
            sphere,
            video_id: video_id.to_string(),
        }
    }

    pub fn scene(&self) -> &HtmlElement {
        &self.scene
    }

    pub fn apply(&self, change: SphereChange) {
        match change {
            SphereChange::Attach => {
                let _ = self.sphere.set_attribute("src", &source_selector(&self.video_id));
                let _ = self.sphere.set_attribute("rotation", SPHERE_ROTATION);
            }
            SphereChange::Detach => {
                let _ = self.sphere.remove_attribute("src");
            }
        }
    }
}

pub fn aframe_loaded() -> bool {
    Reflect::get(&window(), &JsValue::from_str("AFRAME"))
        .map(|aframe| !aframe.is_undefined())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use route_walker_lib::playback::BindingId;

    #[test]
    fn texture_follows_granted_playback() {
        assert_eq!(SphereChange::for_event(&SessionEvent::PlaybackStarted), Some(SphereChange::Attach));
        assert_eq!(SphereChange::for_event(&SessionEvent::AwaitingGesture), None);
        assert_eq!(SphereChange::for_event(&SessionEvent::MediaFailed("net".into())), Some(SphereChange::Detach));
        assert_eq!(SphereChange::for_event(&SessionEvent::Left), Some(SphereChange::Detach));
        assert_eq!(
            SphereChange::for_event(&SessionEvent::Started { route_key: "maleconLaPaz".into(), binding: BindingId(7) }),
            Some(SphereChange::Detach)
        );
    }

    #[test]
    fn sphere_points_at_the_video_element() {
        assert_eq!(source_selector("walkVideo"), "#walkVideo");
    }
}
