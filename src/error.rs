/// Errors raised by the vector space model.
///
/// All of them are precondition failures detected synchronously at the call
/// that violates them. Nothing here is transient, so nothing is retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum VsmError {
    /// A document with zero tokens reached TF computation.
    #[error("document `{}` has no tokens", .document.as_deref().unwrap_or("<unnamed>"))]
    EmptyDocument { document: Option<String> },
    /// A document name was added twice.
    #[error("document `{0}` already exists")]
    DuplicateDocument(String),
    /// A ranking request pointed past the last document.
    #[error("document index {index} out of range (document count: {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl VsmError {
    /// Attach the document name to an `EmptyDocument` error
    pub(crate) fn in_document(self, name: &str) -> Self {
        match self {
            VsmError::EmptyDocument { document: None } => VsmError::EmptyDocument {
                document: Some(name.to_string()),
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, VsmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_message_names_the_document() {
        let err = VsmError::EmptyDocument { document: None }.in_document("doc1");
        assert_eq!(err.to_string(), "document `doc1` has no tokens");
        let anon = VsmError::EmptyDocument { document: None };
        assert_eq!(anon.to_string(), "document `<unnamed>` has no tokens");
    }

    #[test]
    fn in_document_keeps_other_errors() {
        let err = VsmError::DuplicateDocument("a".into()).in_document("b");
        assert_eq!(err, VsmError::DuplicateDocument("a".into()));
    }
}
