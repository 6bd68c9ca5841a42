mod bindings;
pub(crate) use bindings::*;

mod parse;

mod filesystem;
pub(crate) use filesystem::*;

mod platform;
pub(crate) use platform::*;
