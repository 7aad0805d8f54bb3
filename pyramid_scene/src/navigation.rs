//! Opening section links in the browsing context (wasm) or the system browser.

use bevy::prelude::*;
use bevy_egui::EguiContexts;
use url::Url;

use crate::error::NavigationError;

#[derive(Event, Clone, Debug, PartialEq, Eq)]
pub struct NavigationRequested {
    pub url: Url,
}

pub fn navigation_plugin(app: &mut App) {
    app.add_event::<NavigationRequested>()
        .add_systems(Update, open_navigation_requests);
}

fn open_navigation_requests(
    mut requests: EventReader<NavigationRequested>,
    mut contexts: EguiContexts,
) {
    for request in requests.read() {
        match navigate(&request.url, &mut contexts) {
            Ok(()) => info!("navigating to {}", request.url),
            Err(err) => warn!("could not open {}: {err}", request.url),
        }
    }
}

/// Navigates the top-level browsing context, falling back to the current one
/// when the top is missing or refuses (cross-origin embedding).
#[cfg(target_arch = "wasm32")]
fn navigate(url: &Url, _contexts: &mut EguiContexts) -> Result<(), NavigationError> {
    let window = web_sys::window().ok_or(NavigationError::NoContext)?;
    if let Ok(Some(top)) = window.top() {
        if top.location().set_href(url.as_str()).is_ok() {
            return Ok(());
        }
    }
    window
        .location()
        .set_href(url.as_str())
        .map_err(|err| NavigationError::Rejected {
            url: url.to_string(),
            reason: format!("{err:?}"),
        })
}

#[cfg(not(target_arch = "wasm32"))]
fn navigate(url: &Url, contexts: &mut EguiContexts) -> Result<(), NavigationError> {
    let ctx = contexts.try_ctx_mut().ok_or(NavigationError::NoContext)?;
    ctx.open_url(bevy_egui::egui::OpenUrl::same_tab(url.as_str()));
    Ok(())
}
