pub mod appointment;
pub mod settings;
