#[macro_use]
mod util;

mod navigation;
mod parse;
