//! Connection indicator shared by every page.

use ifl03_common::ConnectionStatus;

use crate::surface::Surface;

pub const CONN_DOT: &str = "connDot";
pub const CONN_TEXT: &str = "connText";

/// Ids every page declares for the indicator.
pub const ELEMENTS: [&str; 2] = [CONN_DOT, CONN_TEXT];

/// Paint the dot and label for `status`.
pub fn render_connection(status: ConnectionStatus, surface: &mut Surface) {
    surface.set_class_name(
        CONN_DOT,
        &format!("size-2 rounded-full {}", status.color_class()),
    );
    surface.set_text(CONN_TEXT, status.label());
}
