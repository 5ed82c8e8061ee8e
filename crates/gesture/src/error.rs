use thiserror::Error;

use crate::registry::RecognizerId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GestureError {
    #[error("unknown recognizer {0:?}")]
    UnknownRecognizer(RecognizerId),
    #[error("a recognizer cannot be related to itself ({0:?})")]
    SelfRelation(RecognizerId),
    #[error("touch index {index} out of range (touches: {count})")]
    TouchIndexOutOfRange { index: usize, count: usize },
}
