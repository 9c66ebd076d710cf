mod model;
mod script_data;

pub use model::*;
pub use script_data::{LanguageViews, PlutusVersion, ScriptData};
