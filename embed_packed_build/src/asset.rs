use crate::{Error, Result, literal, mangle};

/// One input file, compressed and rendered, waiting to be placed in a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedAsset {
    original_path: String,
    identifier: String,
    compressed: Vec<u8>,
    literal: String,
}

impl EmbeddedAsset {
    /// Mangles `original_path` and renders `compressed` as its literal.
    ///
    /// # Errors
    /// [`Error::MangleFailure`] if the path has no alphanumeric characters.
    pub fn new(original_path: impl Into<String>, compressed: Vec<u8>) -> Result<Self> {
        let original_path = original_path.into();
        let identifier = mangle(&original_path);
        if identifier.is_empty() {
            return Err(Error::MangleFailure {
                path: original_path,
            });
        }
        let literal = literal::encode(&compressed, &identifier);
        Ok(Self {
            original_path,
            identifier,
            compressed,
            literal,
        })
    }

    /// The lookup key exposed to runtime callers.
    #[must_use]
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The static name the literal is declared under.
    #[must_use]
    pub fn symbol(&self) -> String {
        literal::symbol(&self.identifier)
    }

    #[must_use]
    pub fn compressed(&self) -> &[u8] {
        &self.compressed
    }

    /// The rendered `static` declaration.
    #[must_use]
    pub fn encoded_literal(&self) -> &str {
        &self.literal
    }
}
