pub mod finish_panel;
pub mod hud_panel;
pub mod map_component;
pub mod route_picker;
