pub mod panels;
pub mod plot;
pub mod tables;

/// Placeholder for the views that skip rendering on an empty selection.
pub const EMPTY_SELECTION: &str = "Aucun film ne correspond à la sélection.";
