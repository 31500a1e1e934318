use crate::CellKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("a cell with id {id:?} already exists")]
    DuplicateId { id: String },

    #[error("unknown cell handle: {index}")]
    UnknownCell { index: usize },

    #[error("cell {id:?} is a {actual:?}, expected {expected}")]
    WrongKind {
        id: String,
        actual: CellKind,
        expected: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
