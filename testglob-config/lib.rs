mod config;
mod error;
pub mod ini;
mod slot;
mod source;
mod toml;

pub use config::*;
pub use error::*;
pub use ini::{INI_SECTION, IniSource};
pub use slot::*;
pub use source::*;
pub use toml::{TOML_TABLE, TomlSource};

#[doc(no_inline)]
pub use testglob_pattern::{Dashes, PatternSet};
