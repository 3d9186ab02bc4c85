use homemap_shared::url_state::{HistoryBackend, HistoryWrite};
use wasm_bindgen::JsValue;

/// `window.location.search` backed by the History API.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

impl HistoryBackend for BrowserHistory {
    fn query(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }

    fn write(&mut self, query: &str, how: HistoryWrite) {
        let Some(window) = web_sys::window() else {
            tracing::warn!("no window; dropping URL update");
            return;
        };
        let location = window.location();
        let path = location.pathname().unwrap_or_default();
        let hash = location.hash().unwrap_or_default();
        let url = relative_url(&path, query, &hash);

        let Ok(history) = window.history() else {
            tracing::warn!("history API unavailable");
            return;
        };
        let result = match how {
            HistoryWrite::Replace => history.replace_state_with_url(&JsValue::NULL, "", Some(&url)),
            HistoryWrite::Push => history.push_state_with_url(&JsValue::NULL, "", Some(&url)),
        };
        if let Err(e) = result {
            tracing::warn!("history write failed: {:?}", e);
        }
    }
}

/// Path, query and fragment joined into a same-document URL. An empty query
/// leaves no dangling `?`.
fn relative_url(path: &str, query: &str, hash: &str) -> String {
    let query = query.trim_start_matches('?');
    let path = if path.is_empty() { "/" } else { path };
    if query.is_empty() {
        format!("{}{}", path, hash)
    } else {
        format!("{}?{}{}", path, query, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_url_keeps_path_and_hash() {
        assert_eq!(relative_url("/map", "?lat=1&zoom=3", "#top"), "/map?lat=1&zoom=3#top");
    }

    #[test]
    fn test_relative_url_without_query() {
        assert_eq!(relative_url("/", "?", ""), "/");
        assert_eq!(relative_url("", "", ""), "/");
    }
}
