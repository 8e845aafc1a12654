use crate::ast::Item;

/// Failure raised by a backend. Opaque to the front end, which only reports
/// the message and moves on.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
#[error("{message}")]
pub struct EmitError {
    pub message: String,
}

/// A backend that consumes completed top-level constructs. Items arrive by
/// value, so a backend is free to take the tree apart. What comes back is
/// the backend's business: a JIT would hand out a callable, the bundled
/// [`AstDumper`] hands out text.
pub trait CodeEmitter {
    type Output;

    fn emit(&mut self, item: Item) -> Result<Self::Output, EmitError>;
}

/// The default backend: renders each construct back to source form.
pub struct AstDumper;

impl CodeEmitter for AstDumper {
    type Output = String;

    fn emit(&mut self, item: Item) -> Result<String, EmitError> {
        Ok(item.to_string())
    }
}
