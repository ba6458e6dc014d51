mod result;
mod settings;

pub use result::*;
pub use settings::*;
