//! Terraform Cloud variable model types.

mod document;
mod payload;
mod publish;
mod value;
mod variable;

pub use document::*;
pub use payload::*;
pub use publish::*;
pub use value::*;
pub use variable::*;
