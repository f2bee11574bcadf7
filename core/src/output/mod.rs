//! Status document rendering and reboot control building.

pub mod controls;
pub mod document;

pub use controls::{
    build_controls, control_id, control_rows, parse_control_id, resolve_control, Control,
};
pub use document::{
    build_document, format_uptime, render_field, Field, HealthyTarget, StatusDocument,
    DOCUMENT_COLOUR, DOCUMENT_TITLE,
};
