pub mod asana;
pub mod import;
