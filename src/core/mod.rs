//! Rule validation engine

pub mod template;
pub mod validator;

pub use template::{classify, TemplateShape};
pub use validator::validate;
