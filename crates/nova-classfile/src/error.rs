use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),
    #[error("class `{0}` has no superclass but is not `java.lang.Object`")]
    MissingSuperclass(String),
    #[error("invalid class name: {0:?}")]
    InvalidClassName(String),
}
