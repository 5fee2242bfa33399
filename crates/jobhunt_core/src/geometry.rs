use crate::SessionError;

/// A click on the rendered snapshot, in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub client_x: f64,
    pub client_y: f64,
    /// Top-left corner of the rendered image in the same space as `client_*`.
    pub origin_x: f64,
    pub origin_y: f64,
    pub displayed_width: f64,
    pub displayed_height: f64,
    pub natural_width: f64,
    pub natural_height: f64,
}

impl ClickEvent {
    /// Click at `(x, y)` measured from the top-left corner of the rendered image.
    pub fn on_image(x: f64, y: f64, displayed: (f64, f64), natural: (f64, f64)) -> Self {
        Self {
            client_x: x,
            client_y: y,
            origin_x: 0.0,
            origin_y: 0.0,
            displayed_width: displayed.0,
            displayed_height: displayed.1,
            natural_width: natural.0,
            natural_height: natural.1,
        }
    }
}

/// Point in the remote browser's viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemotePoint {
    pub x: i64,
    pub y: i64,
}

/// Maps a click on the rendered image to the remote browser's native pixels.
pub fn map_click(click: &ClickEvent) -> Result<RemotePoint, SessionError> {
    if !is_usable(click.displayed_width) || !is_usable(click.displayed_height) {
        return Err(SessionError::GeometryUnavailable);
    }
    if !click.natural_width.is_finite() || !click.natural_height.is_finite() {
        return Err(SessionError::GeometryUnavailable);
    }

    let scale_x = click.natural_width / click.displayed_width;
    let scale_y = click.natural_height / click.displayed_height;
    let local_x = click.client_x - click.origin_x;
    let local_y = click.client_y - click.origin_y;

    let x = (local_x * scale_x).round();
    let y = (local_y * scale_y).round();
    if !x.is_finite() || !y.is_finite() {
        return Err(SessionError::GeometryUnavailable);
    }

    Ok(RemotePoint {
        x: x as i64,
        y: y as i64,
    })
}

fn is_usable(extent: f64) -> bool {
    extent.is_finite() && extent > 0.0
}
