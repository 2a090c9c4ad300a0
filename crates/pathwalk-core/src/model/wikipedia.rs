//! Wikipedia navigation model over a simulated browser session.
//!
//! Edges (`e_*`) navigate; vertices (`v_*`) assert the page title the browser
//! should show. `v_start` opens the session and must come first.

use super::ActionTable;

pub const MODEL_NAME: &str = "wikipedia_navigation_models";

const MAIN_URL: &str = "http://en.wikipedia.org/wiki/Main_Page";
const ABOUT_URL: &str = "http://en.wikipedia.org/wiki/Wikipedia:About";
const CONTENTS_URL: &str = "http://en.wikipedia.org/wiki/Wikipedia:Contents";
const COMMUNITY_URL: &str = "http://en.wikipedia.org/wiki/Wikipedia:Community_Portal";
const RECENT_URL: &str = "http://en.wikipedia.org/wiki/Special:Recentchanges";

/// Browser state shared by all actions of one session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BrowserSession {
    pub open: bool,
    pub url: Option<String>,
    pub visited: Vec<String>,
}

impl BrowserSession {
    fn goto(&mut self, url: &str, page: &str) -> String {
        if !self.open {
            return format!("FAILURE: no browser session to browse to {page}");
        }
        self.url = Some(url.to_string());
        self.visited.push(url.to_string());
        format!("SUCCESS. Browsed to {page}.")
    }

    fn title(&self) -> Option<&'static str> {
        self.url.as_deref().and_then(title_for)
    }

    fn expect_title(&self, expected: &str, page: &str) -> String {
        if !self.open {
            return format!("FAILURE: no browser session while waiting for {page}");
        }
        match self.title() {
            Some(title) if title == expected => format!("SUCCESS. Arrived at {page}."),
            Some(title) => format!("FAILURE: expected title {expected:?}, browser shows {title:?}"),
            None => format!("FAILURE: expected title {expected:?}, browser has no page loaded"),
        }
    }
}

fn title_for(url: &str) -> Option<&'static str> {
    match url {
        MAIN_URL => Some("Wikipedia, the free encyclopedia"),
        ABOUT_URL => Some("Wikipedia:About - Wikipedia"),
        CONTENTS_URL => Some("Wikipedia:Contents - Wikipedia"),
        COMMUNITY_URL => Some("Wikipedia:Community portal - Wikipedia"),
        RECENT_URL => Some("Recent changes - Wikipedia"),
        _ => None,
    }
}

pub fn model() -> ActionTable<BrowserSession> {
    ActionTable::new(MODEL_NAME, BrowserSession::default())
        // Vertices
        .with_action("v_start", |b: &mut BrowserSession| {
            *b = BrowserSession {
                open: true,
                ..BrowserSession::default()
            };
            "SUCCESS. Started browser session.".to_string()
        })
        .with_action("v_wikipedia_main", |b: &mut BrowserSession| {
            b.expect_title("Wikipedia, the free encyclopedia", "Main Page")
        })
        .with_action("v_about", |b: &mut BrowserSession| {
            b.expect_title("Wikipedia:About - Wikipedia", "About Page")
        })
        .with_action("v_contents", |b: &mut BrowserSession| {
            b.expect_title("Wikipedia:Contents - Wikipedia", "Contents Page")
        })
        .with_action("v_community_portal", |b: &mut BrowserSession| {
            b.expect_title("Wikipedia:Community portal - Wikipedia", "Community Portal Page")
        })
        .with_action("v_recent_changes", |b: &mut BrowserSession| {
            b.expect_title("Recent changes - Wikipedia", "Recent Changes Page")
        })
        // Edges
        .with_action("e_main", |b: &mut BrowserSession| b.goto(MAIN_URL, "Main Page"))
        .with_action("e_about", |b: &mut BrowserSession| b.goto(ABOUT_URL, "About Page"))
        .with_action("e_contents", |b: &mut BrowserSession| {
            b.goto(CONTENTS_URL, "Contents Page")
        })
        .with_action("e_community", |b: &mut BrowserSession| {
            b.goto(COMMUNITY_URL, "Community Portal Page")
        })
        .with_action("e_recent", |b: &mut BrowserSession| {
            b.goto(RECENT_URL, "Recent Changes Page")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionProvider;

    #[test]
    fn test_exposes_all_elements() {
        let m = model();
        assert_eq!(m.action_names().len(), 11);
        for step in ["v_start", "e_main", "v_wikipedia_main", "e_recent", "v_recent_changes"] {
            assert!(m.contains(step), "missing {step}");
        }
    }

    #[test]
    fn test_navigation_path_succeeds() {
        let mut m = model();
        for step in ["v_start", "e_main", "v_wikipedia_main", "e_about", "v_about"] {
            let msg = m.invoke(step).unwrap();
            assert!(msg.starts_with("SUCCESS"), "{step}: {msg}");
        }
        assert_eq!(m.state().visited, vec![MAIN_URL, ABOUT_URL]);
    }

    #[test]
    fn test_vertex_on_wrong_page_fails() {
        let mut m = model();
        m.invoke("v_start");
        m.invoke("e_contents");
        let msg = m.invoke("v_about").unwrap();
        assert!(msg.starts_with("FAILURE"), "{msg}");
        assert!(msg.contains("Wikipedia:Contents - Wikipedia"));
    }

    #[test]
    fn test_edge_without_session_fails() {
        let mut m = model();
        let msg = m.invoke("e_main").unwrap();
        assert!(msg.starts_with("FAILURE"));
        assert!(m.state().url.is_none());
    }
}
