use route_walker_lib::{format::{format_distance, format_time}, session::ProgressUpdate};
use yew::prelude::*;

pub const MAX_SPEED: f64 = 8.0;

#[derive(PartialEq, Properties, Clone)]
pub struct HudProps {
    pub route_name: AttrValue,
    pub progress: Option<ProgressUpdate>,
    pub speed: f64,
    pub notice: Option<AttrValue>,
    pub on_speed: Callback<f64>,
    pub on_end: Callback<()>,
}

/// Counters, speed slider and the end button shown over the video.
#[function_component]
pub fn HudPanel(props: &HudProps) -> Html {
    let on_input = {
        let on_speed = props.on_speed.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            if let Ok(speed) = input.value().parse::<f64>() {
                on_speed.emit(speed);
            }
        })
    };

    let on_end = {
        let on_end = props.on_end.clone();
        Callback::from(move |_| on_end.emit(()))
    };

    let (steps, distance, time, percent) = match &props.progress {
        Some(progress) => (
            progress.steps,
            format_distance(progress.distance_km),
            format_time(progress.elapsed_secs),
            progress.progress * 100.,
        ),
        None => (0, format_distance(0.), format_time(0.), 0.),
    };

    html! {
        <div class="hud component-container">
            <h2>{props.route_name.clone()}</h2>
            <div class="hud-counters">
                <label>{format!("Pasos: {steps}")}</label>
                <label>{format!("Distancia: {distance} km")}</label>
                <label>{format!("Tiempo: {time}")}</label>
            </div>
            <div class="hud-progress">
                <div class="hud-progress-bar" style={format!("width: {percent:.1}%")} />
            </div>
            <label class="hud-speed">
                {format!("Velocidad: {:.1} km/h", props.speed)}
                <input
                    type="range"
                    min="0"
                    max={MAX_SPEED.to_string()}
                    step="0.5"
                    value={props.speed.to_string()}
                    oninput={on_input}
                />
            </label>
            if let Some(notice) = &props.notice {
                <label class="hud-notice">{notice.clone()}</label>
            }
            <button class="end-btn" onclick={on_end}>{"Terminar recorrido"}</button>
        </div>
    }
}
