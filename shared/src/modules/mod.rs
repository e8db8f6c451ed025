pub mod fonts_set;
pub mod graphics;
pub mod logging_module;
pub mod renderer;
pub mod timezone_receiver;
pub mod update_timer;
pub mod watch_face;
