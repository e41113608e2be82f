pub mod app;
pub mod flavor;
pub mod settings;
pub mod settings_io;
