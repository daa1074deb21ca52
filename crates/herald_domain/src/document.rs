use crate::Error;

/// Final text produced by a generation run. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Deref)]
pub struct GeneratedDocument(String);

impl GeneratedDocument {
    pub fn new(text: impl Into<String>) -> Result<Self, Error> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::EmptyGeneration);
        }
        Ok(Self(text))
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
