//! Value Objects - Immutable, identity-less domain primitives

mod model_selection;
mod option_value;

pub use model_selection::{Modality, ModelSelection};
pub use option_value::OptionValue;
