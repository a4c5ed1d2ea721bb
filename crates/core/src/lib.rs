pub mod config;
pub mod error;
pub mod table;
pub mod value;

pub use config::Config;
pub use error::*;
pub use table::*;
pub use value::*;
