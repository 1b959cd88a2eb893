//! Leptos components mounted into the static pages.

pub mod architecture;
