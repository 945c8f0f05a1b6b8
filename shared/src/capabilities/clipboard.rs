use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AppError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardOperation {
    WriteText { text: String },
}

impl Operation for ClipboardOperation {
    type Output = ClipboardResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    PermissionDenied,
    #[error("clipboard unavailable: {reason}")]
    Unavailable { reason: String },
}

impl From<ClipboardError> for AppError {
    fn from(e: ClipboardError) -> Self {
        AppError::new(ErrorKind::Clipboard, e.to_string())
    }
}

pub type ClipboardResult = Result<(), ClipboardError>;

#[derive(Capability)]
pub struct Clipboard<Ev> {
    context: CapabilityContext<ClipboardOperation, Ev>,
}

impl<Ev> Clipboard<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<ClipboardOperation, Ev>) -> Self {
        Self { context }
    }

    pub fn write_text<F>(&self, text: String, callback: F)
    where
        F: FnOnce(ClipboardResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context
                .request_from_shell(ClipboardOperation::WriteText { text })
                .await;
            context.update_app(callback(result));
        });
    }
}
