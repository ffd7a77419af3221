//! HTTP source: GET a URL that serves a JSON series document.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::data::SeriesSource;
use crate::domain::SeriesDocument;
use crate::error::SourceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl SeriesSource for HttpSource {
    fn fetch(&self) -> Result<SeriesDocument, SourceError> {
        let resp = self.client.get(&self.url).send()?;
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status()));
        }

        let mut doc: SeriesDocument = resp.json()?;
        if doc.source_url.is_none() {
            doc.source_url = Some(self.url.clone());
        }
        Ok(doc)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
