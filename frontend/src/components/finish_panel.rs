use std::sync::Arc;

use route_walker_lib::{session::Completion, RouteDescriptor, SessionSummary};
use yew::prelude::*;

use crate::components::map_component::{MapComponent, MapMode};

#[derive(PartialEq, Properties, Clone)]
pub struct FinishProps {
    pub summary: SessionSummary,
    pub route: Arc<RouteDescriptor>,
    pub zoom: f64,
    pub on_repeat: Callback<()>,
    pub on_back: Callback<()>,
}

#[function_component]
pub fn FinishPanel(props: &FinishProps) -> Html {
    let summary = &props.summary;

    let on_repeat = {
        let on_repeat = props.on_repeat.clone();
        Callback::from(move |_| on_repeat.emit(()))
    };
    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_| on_back.emit(()))
    };

    let heading = match summary.completion {
        Completion::Natural => "¡Recorrido completado!",
        Completion::Manual => "Recorrido terminado",
    };

    html! {
        <div class="finish component-container">
            <h1>{heading}</h1>
            <h2>{summary.route_name.clone()}</h2>
            <label>{format!("Pasos: {}", summary.steps)}</label>
            <label>{format!("Distancia: {}", summary.distance_text())}</label>
            <label>{format!("Tiempo: {}", summary.time_text())}</label>
            if let Some(achievement) = &summary.achievement {
                <div class="achievement">
                    <h2>{achievement.title.clone()}</h2>
                    <label>{achievement.description.clone()}</label>
                </div>
            }
            <MapComponent
                route={props.route.clone()}
                position={summary.final_position}
                mode={MapMode::Finish}
                zoom={props.zoom}
            />
            <div class="bottom-panel">
                <button onclick={on_repeat}>{"Repetir recorrido"}</button>
                <button onclick={on_back}>{"Regresar"}</button>
            </div>
        </div>
    }
}
