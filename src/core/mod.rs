pub mod config;

pub use config::{HintSource, ImplicitIndexing, NavigatorConfig};
