use route_walker_lib::navigation::NavNode;
use yew::prelude::*;

#[derive(PartialEq, Properties, Clone)]
pub struct PickerProps {
    /// Root-to-screen path; the last entry is the screen shown.
    pub path: Vec<NavNode>,
    pub on_select: Callback<NavNode>,
    pub on_back: Callback<()>,
}

/// One selection screen: breadcrumb, a card per child and a back button.
#[function_component]
pub fn RoutePicker(props: &PickerProps) -> Html {
    let Some(screen) = props.path.last() else {
        return html! {};
    };

    let breadcrumb = props.path.iter()
        .map(|node| node.label.as_str())
        .collect::<Vec<&str>>()
        .join(" / ");

    let cards = screen.children.iter().map(|child| {
        let on_select = props.on_select.clone();
        let node = child.clone();
        let onclick = Callback::from(move |_| on_select.emit(node.clone()));

        let class = if child.is_route() { "card route-card" } else { "card" };
        // Menus without anything below them are listed but not selectable
        let disabled = !child.is_route() && child.children.is_empty();

        html! {
            <button key={child.id.clone()} class={class} onclick={onclick} disabled={disabled}>
                {child.label.clone()}
            </button>
        }
    });

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_| on_back.emit(()))
    };

    html! {
        <div class="picker component-container">
            <label class="breadcrumb">{breadcrumb}</label>
            <h1>{screen.label.clone()}</h1>
            <div class="cards">
                {for cards}
            </div>
            if props.path.len() > 1 {
                <button class="back-btn" onclick={on_back}>{"Regresar"}</button>
            }
        </div>
    }
}
