//! Projects API payloads into terminal text. Pure functions; nothing here touches the network.

pub mod classification;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod location;
pub mod widgets;

use crate::error::ClientError;
use widgets::{AlertKind, alert};

/// Inline message for a section that failed to load.
#[must_use]
pub fn load_failed(err: &ClientError) -> String {
    alert(AlertKind::Error, &format!("加载失败: {err}"))
}
