pub mod map_view;
pub mod mode_selector;
