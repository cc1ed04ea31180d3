//! egui rendering: filter controls, chart panels and the data overview table.

pub mod charts;
pub mod panels;
pub mod table;
