//! HTTP client for the remote materials database.

use crate::config::models::ApiSettings;
use pbxscreen::core::chemistry::key::CompositionKey;
use pbxscreen::core::models::entry::PourbaixEntry;
use pbxscreen::core::models::material::{MaterialId, MaterialRecord};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const SUMMARY_FIELDS: &str = "material_id,band_gap,energy_above_hull,deprecated,theoretical,elements";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}: {body}")]
    Server { status: u16, url: String, body: String },
    #[error("no data available for {query} ({status})")]
    NoData { query: String, status: u16 },
    #[error("API key is not set; pass --api-key, set MP_API_KEY, or add api.api-key to the config file")]
    MissingApiKey,
}

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Meta {
    pub total_doc: Option<usize>,
}

/// One material document of the summary endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryDoc {
    pub material_id: MaterialId,
    pub band_gap: Option<f64>,
    pub energy_above_hull: Option<f64>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub theoretical: bool,
    #[serde(default)]
    pub elements: Vec<String>,
}

impl SummaryDoc {
    pub fn record(&self) -> MaterialRecord {
        MaterialRecord {
            material_id: self.material_id.clone(),
            band_gap: self.band_gap,
            energy_above_hull: self.energy_above_hull,
            deprecated: self.deprecated,
            theoretical: self.theoretical,
        }
    }
}

/// Pages of material summaries.
pub(crate) trait SummarySource {
    async fn summary_page(
        &self,
        material_ids: Option<&[MaterialId]>,
        skip: usize,
        limit: usize,
    ) -> Result<Envelope<SummaryDoc>, ApiError>;
}

/// Pourbaix entries of a chemical system; the remote adds H and O itself.
pub(crate) trait EntrySource {
    async fn pourbaix_entries(&self, key: &CompositionKey) -> Result<Vec<PourbaixEntry>, ApiError>;
}

pub struct MaterialsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    summary_path: String,
    entries_path: String,
}

impl MaterialsClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ApiError::MissingApiKey)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            summary_path: settings.summary_path.clone(),
            entries_path: settings.entries_path.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        describe: &str,
    ) -> Result<Envelope<T>, ApiError> {
        let url = self.url(path);
        debug!(url = %url, query = describe, "requesting");
        let resp = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .query(query)
            .send()
            .await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ApiError::NoData {
                query: describe.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                url,
                body,
            });
        }
        Ok(resp.json().await?)
    }
}

impl SummarySource for MaterialsClient {
    async fn summary_page(
        &self,
        material_ids: Option<&[MaterialId]>,
        skip: usize,
        limit: usize,
    ) -> Result<Envelope<SummaryDoc>, ApiError> {
        let mut query = vec![
            ("_fields", SUMMARY_FIELDS.to_string()),
            ("_skip", skip.to_string()),
            ("_limit", limit.to_string()),
        ];
        if let Some(ids) = material_ids {
            let joined = ids.iter().map(MaterialId::as_str).collect::<Vec<_>>().join(",");
            query.push(("material_ids", joined));
        }
        self.get(&self.summary_path, &query, "material summaries").await
    }
}

impl EntrySource for MaterialsClient {
    async fn pourbaix_entries(&self, key: &CompositionKey) -> Result<Vec<PourbaixEntry>, ApiError> {
        let chemsys = key.chemsys();
        let query = [("chemsys", chemsys.clone())];
        let envelope: Envelope<PourbaixEntry> = self.get(&self.entries_path, &query, &chemsys).await?;
        Ok(envelope.data)
    }
}

/// Downloads every summary page, optionally restricted to `material_ids`
/// queried in chunks of `chunk_size`.
pub(crate) async fn fetch_all_summaries<S: SummarySource>(
    source: &S,
    material_ids: Option<&[MaterialId]>,
    page_size: usize,
    chunk_size: usize,
) -> Result<Vec<SummaryDoc>, ApiError> {
    let page_size = page_size.max(1);
    let chunks: Vec<Option<&[MaterialId]>> = match material_ids {
        Some(ids) => ids.chunks(chunk_size.max(1)).map(Some).collect(),
        None => vec![None],
    };

    let mut docs = Vec::new();
    for (i, chunk) in chunks.iter().enumerate() {
        let mut skip = 0;
        loop {
            let page = source.summary_page(*chunk, skip, page_size).await?;
            let received = page.data.len();
            let total = page.meta.and_then(|m| m.total_doc);
            docs.extend(page.data);
            skip += received;
            debug!(
                chunk = i,
                received,
                skip,
                total = ?total,
                "received summary page"
            );
            // The server may cap `_limit`, so a short page only ends the
            // listing when no total is reported.
            let exhausted = match total {
                Some(total) => skip >= total,
                None => received < page_size,
            };
            if received == 0 || exhausted {
                break;
            }
        }
    }
    info!(count = docs.len(), "downloaded material summaries");
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FakeSummaries {
        docs: Vec<SummaryDoc>,
        server_limit: Option<usize>,
        calls: Mutex<Vec<(Option<usize>, usize, usize)>>,
    }

    impl FakeSummaries {
        fn new(n: usize) -> Self {
            let docs = (0..n)
                .map(|i| SummaryDoc {
                    material_id: MaterialId::new(format!("mp-{}", i)),
                    band_gap: Some(0.0),
                    energy_above_hull: None,
                    deprecated: false,
                    theoretical: i % 2 == 0,
                    elements: vec!["Fe".to_string(), "O".to_string()],
                })
                .collect();
            Self {
                docs,
                server_limit: None,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl SummarySource for FakeSummaries {
        async fn summary_page(
            &self,
            material_ids: Option<&[MaterialId]>,
            skip: usize,
            limit: usize,
        ) -> Result<Envelope<SummaryDoc>, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push((material_ids.map(<[MaterialId]>::len), skip, limit));
            let limit = self.server_limit.map_or(limit, |cap| limit.min(cap));
            let matching: Vec<SummaryDoc> = self
                .docs
                .iter()
                .filter(|d| material_ids.is_none_or(|ids| ids.contains(&d.material_id)))
                .cloned()
                .collect();
            let total = matching.len();
            Ok(Envelope {
                data: matching.into_iter().skip(skip).take(limit).collect(),
                meta: Some(Meta {
                    total_doc: Some(total),
                }),
            })
        }
    }

    #[tokio::test]
    async fn paginates_until_total_is_reached() {
        let source = FakeSummaries::new(5);
        let docs = fetch_all_summaries(&source, None, 2, 100).await.unwrap();
        assert_eq!(docs.len(), 5);
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![(None, 0, 2), (None, 2, 2), (None, 4, 2)]
        );
    }

    #[tokio::test]
    async fn keeps_paging_when_server_caps_the_limit() {
        let mut source = FakeSummaries::new(2500);
        source.server_limit = Some(1000);
        let docs = fetch_all_summaries(&source, None, 5000, 100).await.unwrap();

        assert_eq!(docs.len(), 2500);
        let skips: Vec<usize> = source.calls.lock().unwrap().iter().map(|c| c.1).collect();
        assert_eq!(skips, vec![0, 1000, 2000]);
    }

    #[tokio::test]
    async fn queries_material_ids_in_chunks() {
        let source = FakeSummaries::new(10);
        let ids: Vec<MaterialId> = ["mp-1", "mp-3", "mp-5", "mp-404"]
            .into_iter()
            .map(MaterialId::from)
            .collect();
        let docs = fetch_all_summaries(&source, Some(&ids), 1000, 3).await.unwrap();

        assert_eq!(docs.len(), 3);
        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, Some(3));
        assert_eq!(calls[1].0, Some(1));
    }

    #[test]
    fn summary_doc_parses_api_payload() {
        let payload = r#"{
            "data": [
                {"material_id": "mp-149", "band_gap": 0.85, "energy_above_hull": 0.0,
                 "deprecated": false, "theoretical": false, "elements": ["Si"]},
                {"material_id": "mp-1", "band_gap": null, "energy_above_hull": null,
                 "deprecated": true, "theoretical": true, "elements": ["Cs"]}
            ],
            "meta": {"total_doc": 2}
        }"#;
        let envelope: Envelope<SummaryDoc> = serde_json::from_str(payload).unwrap();
        assert_eq!(envelope.meta.unwrap().total_doc, Some(2));
        let record = envelope.data[1].record();
        assert!(record.deprecated);
        assert_eq!(record.band_gap, None);
        assert_eq!(envelope.data[0].elements, vec!["Si"]);
    }

    #[test]
    fn client_requires_api_key() {
        let settings = ApiSettings {
            api_key: None,
            ..ApiSettings::default()
        };
        assert!(matches!(
            MaterialsClient::new(&settings),
            Err(ApiError::MissingApiKey)
        ));
    }

    #[test]
    fn client_joins_base_url_and_paths() {
        let settings = ApiSettings {
            base_url: "https://api.example.org/".to_string(),
            api_key: Some("secret".to_string()),
            ..ApiSettings::default()
        };
        let client = MaterialsClient::new(&settings).unwrap();
        assert_eq!(
            client.url("/materials/summary/"),
            "https://api.example.org/materials/summary/"
        );
    }
}
