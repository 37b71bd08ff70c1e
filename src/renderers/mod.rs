//! Concrete renderers.
//!
//! [KernelRenderer] produces commands for a computer algebra kernel. [MarkupRenderer] produces
//! MathML for display, tagging each element with the node it came from.

mod kernel;
mod markup;

pub use kernel::{needs_parentheses, KernelRenderer, KernelSettings, ParenthesisStyle};
pub use markup::{MarkupOutput, MarkupRenderer, MarkupSettings};
