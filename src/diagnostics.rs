//! Out-of-band failure record.
//!
//! A [`Diagnostics`] value is handed to [`Engine::eval`](crate::Engine::eval) by
//! callers that want a message and instruction index to show the user. The
//! engine never reads it back; it only writes it when something fails.

/// Message and failing instruction index of the most recent failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    message: String,
    index: Option<usize>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Index of the failing instruction, or `None` if nothing was reported.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_none()
    }
}

/// Record `message` and `index` into `target`. A `None` target is a no-op.
pub fn report(message: impl Into<String>, index: usize, target: Option<&mut Diagnostics>) {
    if let Some(d) = target {
        d.message = message.into();
        d.index = Some(index);
    }
}
