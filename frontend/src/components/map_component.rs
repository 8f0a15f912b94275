use std::sync::Arc;

use gloo_timers::callback::Timeout;
use gloo_utils::document;
use leaflet::{LatLng, Map, MapOptions, Marker, Polyline, PolylineOptions, Popup, PopupOptions, TileLayer, TileLayerOptions};
use route_walker_lib::{Coordinate, RouteDescriptor};
use wasm_bindgen::{JsCast, UnwrapThrowExt};
use web_sys::{js_sys::Array, Element, HtmlElement, Node};
use yew::prelude::*;

const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

// Leaflet measures its container once; give the screen time to lay out first.
const RESIZE_DELAY_MS: u32 = 200;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MapMode {
    /// Small map following the walker.
    Live,
    /// Whole walk with start and end markers.
    Finish,
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub route: Arc<RouteDescriptor>,
    pub position: Coordinate,
    pub mode: MapMode,
    pub zoom: f64,
}

pub enum Msg {
    Grab(PointerEvent),
    Drag(PointerEvent),
    Release(PointerEvent),
    Close,
    Open,
}

/// Offset of the floating mini-map from its resting corner, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct DragOffset {
    x: f64,
    y: f64,
    grab: Option<(f64, f64)>,
}

impl DragOffset {
    fn grab(&mut self, x: f64, y: f64) {
        self.grab = Some((x - self.x, y - self.y));
    }

    fn drag(&mut self, x: f64, y: f64) -> bool {
        let Some((gx, gy)) = self.grab else {
            return false;
        };
        self.x = x - gx;
        self.y = y - gy;
        true
    }

    fn release(&mut self) {
        self.grab = None;
    }

    fn style(&self) -> String {
        format!("transform: translate({}px, {}px);", self.x, self.y)
    }
}

pub struct MapComponent {
    map: Map,
    container: HtmlElement,
    trail: Polyline,
    markers: Vec<Marker>,
    resize: Option<Timeout>,
    offset: DragOffset,
    closed: bool,
}

impl MapComponent {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }

    fn show(&mut self, props: &Props) {
        let points = [props.route.start(), props.position].map(lat_lng);
        self.trail.set_lat_lngs(&Array::from_iter(points));

        match props.mode {
            MapMode::Live => {
                self.map.set_view(&lat_lng(props.position), props.zoom);
            }
            MapMode::Finish => {
                self.replace_markers(finish_markers(&props.route, props.position));
                self.map.fit_bounds(&self.trail.get_bounds());
            }
        }
    }

    fn replace_markers(&mut self, markers: [(Coordinate, &'static str); 2]) {
        for marker in self.markers.drain(..) {
            marker.remove();
        }

        for (point, label) in markers {
            let popup = Popup::new(&PopupOptions::default(), None);
            popup.set_content(&label.into());

            let marker = Marker::new(&lat_lng(point));
            marker.bind_popup(&popup);
            marker.add_to(&self.map);
            self.markers.push(marker);
        }
    }

    fn schedule_resize(&mut self, mode: MapMode) {
        let map = self.map.clone();
        let trail = self.trail.clone();

        self.resize = Some(Timeout::new(RESIZE_DELAY_MS, move || {
            map.invalidate_size(false);
            if mode == MapMode::Finish {
                map.fit_bounds(&trail.get_bounds());
            }
        }));
    }
}

impl Component for MapComponent {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let mode = ctx.props().mode;

        let container: Element = document().create_element("div").unwrap_throw();
        let container: HtmlElement = container.dyn_into().unwrap_throw();
        container.set_class_name(match mode {
            MapMode::Live => "map mini-map",
            MapMode::Finish => "map finish-map",
        });

        let options = MapOptions::default();
        if mode == MapMode::Live {
            options.set_zoom_control(false);
            options.set_dragging(false);
            options.set_scroll_wheel_zoom(false);
        }
        let leaflet_map = Map::new_with_element(&container, &options);

        let trail_options = PolylineOptions::new();
        trail_options.set_color("rgb(0, 96, 255)".into());
        trail_options.set_weight(4.0);
        let trail = Polyline::new_with_options(&Array::new(), &trail_options);

        Self {
            map: leaflet_map,
            container,
            trail,
            markers: Vec::new(),
            resize: None,
            offset: DragOffset::default(),
            closed: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Grab(event) => {
                if let Some(target) = event.current_target().and_then(|t| t.dyn_into::<Element>().ok()) {
                    let _ = target.set_pointer_capture(event.pointer_id());
                }
                self.offset.grab(f64::from(event.client_x()), f64::from(event.client_y()));
                false
            }
            Msg::Drag(event) => self.offset.drag(f64::from(event.client_x()), f64::from(event.client_y())),
            Msg::Release(_) => {
                self.offset.release();
                false
            }
            Msg::Close => {
                self.closed = true;
                true
            }
            Msg::Open => {
                self.closed = false;
                self.schedule_resize(ctx.props().mode);
                true
            }
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            let props = ctx.props();
            self.map.set_max_zoom(19.);
            self.map.set_view(&lat_lng(props.route.start()), props.zoom);
            add_tile_layer(&self.map);
            self.trail.add_to(&self.map);
            self.show(props);
            self.schedule_resize(props.mode);
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        let props = ctx.props();

        if !Arc::ptr_eq(&props.route, &old_props.route) {
            self.map.invalidate_size(false);
        }
        self.show(props);

        false
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if ctx.props().mode == MapMode::Finish {
            return html! {
                <div class="map-frame">
                    {self.render_map()}
                </div>
            };
        }

        let link = ctx.link();
        if self.closed {
            return html! {
                <button class="map-open" onclick={link.callback(|_| Msg::Open)}>{"Mapa"}</button>
            };
        }

        html! {
            <div
                class="map-frame floating"
                style={self.offset.style()}
                onpointerdown={link.callback(Msg::Grab)}
                onpointermove={link.callback(Msg::Drag)}
                onpointerup={link.callback(Msg::Release)}
                onpointercancel={link.callback(Msg::Release)}
            >
                <button
                    class="map-close"
                    onpointerdown={Callback::from(|e: PointerEvent| e.stop_propagation())}
                    onclick={link.callback(|_| Msg::Close)}
                >{"×"}</button>
                {self.render_map()}
            </div>
        }
    }
}

/// Start of the route, and where the walker actually stopped.
fn finish_markers(route: &RouteDescriptor, final_position: Coordinate) -> [(Coordinate, &'static str); 2] {
    [(route.start(), "Inicio"), (final_position, "Fin del recorrido")]
}

fn lat_lng(point: Coordinate) -> LatLng {
    LatLng::new(point.lat, point.lng)
}

fn add_tile_layer(map: &Map) {
    let opts = TileLayerOptions::new();
    opts.set_update_when_idle(true);
    TileLayer::new_options(TILE_URL, &opts).add_to(map);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_marker_sits_where_the_walk_stopped() {
        let route = RouteDescriptor::new(
            "malecon",
            "Malecón",
            "https://example.com/malecon.m3u8",
            Coordinate::new(24.15555, -110.3224),
            Coordinate::new(24.1679, -110.3091),
            3.0,
            None,
        )
        .unwrap();
        let stopped = Coordinate::new(24.158, -110.319);

        let [(start, _), (end, label)] = finish_markers(&route, stopped);
        assert_eq!(start, route.start());
        assert_eq!(end, stopped);
        assert_eq!(label, "Fin del recorrido");
    }

    #[test]
    fn drag_follows_the_pointer_from_where_it_was_grabbed() {
        let mut offset = DragOffset::default();
        assert!(!offset.drag(50.0, 50.0));

        offset.grab(100.0, 200.0);
        assert!(offset.drag(90.0, 150.0));
        assert_eq!((offset.x, offset.y), (-10.0, -50.0));
        offset.release();

        // second drag continues from the moved position
        offset.grab(10.0, 10.0);
        offset.drag(15.0, 10.0);
        assert_eq!((offset.x, offset.y), (-5.0, -50.0));
        assert_eq!(offset.style(), "transform: translate(-5px, -50px);");
    }
}
