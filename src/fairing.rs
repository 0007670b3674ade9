//! Rocket integration: a response fairing that buffers the rendered
//! login page, injects the compiled style block, and applies the
//! layout shell rewrite before the response leaves the server.

use std::io::Cursor;
use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Request, Response};

use crate::inject;
use crate::media::{ResolvedMedia, ThemeSource};
use crate::rewrite;

pub struct LoginTheme {
    source: Arc<dyn ThemeSource>,
    login_path: String,
}

impl LoginTheme {
    pub fn new(source: Arc<dyn ThemeSource>) -> LoginTheme {
        LoginTheme::with_path(source, "/login")
    }

    pub fn with_path(source: Arc<dyn ThemeSource>, login_path: impl Into<String>) -> LoginTheme {
        LoginTheme {
            source,
            login_path: login_path.into(),
        }
    }
}

#[rocket::async_trait]
impl Fairing for LoginTheme {
    fn info(&self) -> Info {
        Info {
            name: "Login Theme",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        if req.uri().path().as_str() != self.login_path {
            return;
        }
        let is_html = res
            .content_type()
            .map(|ct| ct.top() == "text" && ct.sub() == "html")
            .unwrap_or(false);
        if !is_html {
            return;
        }
        if !self.source.has_saved() {
            return;
        }

        let body = match res.body_mut().to_string().await {
            Ok(body) => body,
            Err(e) => {
                log::warn!("login theme: could not buffer response body: {}", e);
                return;
            }
        };

        let settings = self.source.settings();
        let media = ResolvedMedia::resolve(&settings, self.source.as_ref());
        let action = req
            .uri()
            .query()
            .and_then(|q| {
                q.segments()
                    .find(|(k, _)| *k == "action")
                    .map(|(_, v)| v.to_string())
            })
            .unwrap_or_default();

        let block = inject::style_block(&settings, &media, true);
        let html = inject::inject_into_head(&body, &block);
        let html = rewrite::rewrite(&html, &settings, &media, &action);

        res.set_sized_body(html.len(), Cursor::new(html));
    }
}
