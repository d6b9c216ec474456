// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Blocking HTTP client for the event backend.
//!
//! Every call runs off the event loop (task worker, upload threads or
//! pollers), so the blocking `reqwest` client is used throughout. The guest
//! identity and the admin token travel as cookies, mirroring what a browser
//! session would send.

mod error;

pub(crate) use error::ApiError;

use std::{io::Read, time::Duration};

use reqwest::{
    blocking::{Client, RequestBuilder, Response, multipart},
    header::COOKIE,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::{
    guest::{self, GuestIdentity},
    model::{AdminStats, FeedPage, FeedQuery, FrontendConfig, MediaId, ModerationAction, MyUpload, PublicStats},
};

/// A file ready to stream to `POST /upload`.
pub(crate) struct UploadBody<R> {
    pub(crate) reader: R,
    pub(crate) length: u64,
    pub(crate) file_name: String,
    pub(crate) mime_type: &'static str,
}

#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    base_url: Url,
    http: Client,
    admin_token: Option<String>,
    identity: Option<GuestIdentity>,
}

impl ApiClient {
    pub(crate) fn new(base_url: &str, admin_token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            http,
            admin_token,
            identity: None,
        })
    }

    pub(crate) fn set_identity(&mut self, identity: Option<GuestIdentity>) {
        self.identity = identity;
    }

    pub(crate) fn identity(&self) -> Option<&GuestIdentity> {
        self.identity.as_ref()
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a media path from the feed (usually `/uploads/...`) against
    /// the server. Absolute URLs pass through unchanged.
    pub(crate) fn media_url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    pub(crate) fn feed(&self, query: &FeedQuery) -> Result<FeedPage, ApiError> {
        let mut params = vec![
            ("limit", query.limit.to_string()),
            ("order", query.order.as_str().to_string()),
        ];
        if let Some(cursor) = &query.cursor {
            params.push(("cursor", cursor.clone()));
        }

        let request = self.http.get(self.endpoint("slideshow/feed")?).query(&params);
        self.fetch_json(request)
    }

    pub(crate) fn mark_viewed(&self, id: MediaId) -> Result<(), ApiError> {
        let request = self.http.post(self.endpoint(&format!("media/{id}/viewed"))?);
        self.execute(request).map(drop)
    }

    pub(crate) fn frontend_config(&self) -> Result<FrontendConfig, ApiError> {
        let request = self.http.get(self.endpoint("config")?);
        self.fetch_json(request)
    }

    pub(crate) fn public_stats(&self) -> Result<PublicStats, ApiError> {
        let request = self.http.get(self.endpoint("public/stats")?);
        self.fetch_json(request)
    }

    pub(crate) fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        let request = self.http.get(self.endpoint("admin/stats")?);
        self.fetch_json(request)
    }

    pub(crate) fn my_uploads(&self) -> Result<Vec<MyUpload>, ApiError> {
        let request = self.http.get(self.endpoint("my-uploads")?);
        self.fetch_json(request)
    }

    /// Streams a file to `POST /upload` as the `file` part, with an optional
    /// `caption` part.
    pub(crate) fn upload<R>(&self, body: UploadBody<R>, caption: Option<&str>) -> Result<(), ApiError>
    where
        R: Read + Send + 'static,
    {
        let part = multipart::Part::reader_with_length(body.reader, body.length)
            .file_name(body.file_name)
            .mime_str(body.mime_type)?;

        let mut form = multipart::Form::new().part("file", part);
        if let Some(caption) = caption.filter(|caption| !caption.is_empty()) {
            form = form.text("caption", caption.to_string());
        }

        let request = self.http.post(self.endpoint("upload")?).multipart(form);
        self.execute(request).map(drop)
    }

    pub(crate) fn delete_media(&self, id: MediaId) -> Result<(), ApiError> {
        let request = self.http.delete(self.endpoint(&format!("media/{id}"))?);
        self.execute(request).map(drop)
    }

    pub(crate) fn moderate(&self, id: MediaId, action: ModerationAction) -> Result<(), ApiError> {
        let request = self
            .http
            .post(self.endpoint(&format!("admin/media/{id}/action"))?)
            .form(&[("action", action.as_str())]);
        self.execute(request).map(drop)
    }

    pub(crate) fn purge(&self, pin: &str) -> Result<(), ApiError> {
        let request = self.http.post(self.endpoint("admin/purge")?).form(&[("pin", pin)]);
        self.execute(request).map(drop)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(request)?;
        Ok(response.json()?)
    }

    fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match guest::cookie_header(self.identity.as_ref(), self.admin_token.as_deref()) {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        };

        let response = request.send()?;
        let status = response.status();
        debug!(url = %response.url(), %status, "Backend response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(ApiError::from_body(status, &body))
    }
}
