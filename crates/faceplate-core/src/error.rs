use crate::WidgetId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("widget {0:?} is not in the tree")]
    UnknownWidget(WidgetId),
    #[error("widget {0:?} already has a parent")]
    AlreadyParented(WidgetId),
    #[error("widget {id:?} is not a {expected}")]
    WrongWidgetType { id: WidgetId, expected: &'static str },
    #[error("invalid theme: {0}")]
    Theme(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
