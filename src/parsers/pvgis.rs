//! PVGIS typical meteorological year, downloaded by coordinates.

use crate::parsers::error::{FetchError, ParseError};
use crate::parsers::parse_timestamp;
use crate::parsers::raw_table::RawTable;
use crate::pipeline::normalizer::{canonicalize, RowIndex};
use crate::types::canonical::CanonicalTimeSeries;
use crate::types::geo::LatLon;
use crate::types::provider::ProviderFormat;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

pub const DEFAULT_PVGIS_BASE_URL: &str = "https://re.jrc.ec.europa.eu/api/v5_2";

const COL_TIME: &str = "time(UTC)";
const TIMESTAMP_FORMAT: &str = "%Y%m%d:%H%M";

#[derive(Debug, Deserialize)]
struct Envelope {
    outputs: Outputs,
}

#[derive(Debug, Deserialize)]
struct Outputs {
    tmy_hourly: Vec<Map<String, Value>>,
}

/// Downloads raw TMY payloads from a PVGIS-compatible API.
#[derive(Debug, Clone)]
pub(crate) struct PvgisLoader {
    base_url: String,
    download_client: Client,
}

impl PvgisLoader {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let download_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            download_client,
        })
    }

    fn tmy_url(&self, location: LatLon) -> String {
        format!(
            "{}/tmy?lat={}&lon={}&usehorizon=1&outputformat=json",
            self.base_url, location.0, location.1
        )
    }

    /// Performs the single GET for `location` and returns the response body.
    pub async fn download(&self, location: LatLon) -> Result<Vec<u8>, FetchError> {
        let url = self.tmy_url(location);
        info!("Requesting PVGIS TMY from {}", url);

        let response = self
            .download_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url, e)
                });
            }
        };
        // PVGIS answers a served TMY with exactly 200
        if response.status() != StatusCode::OK {
            warn!("Unexpected status {} for {}", response.status(), url);
            return Err(FetchError::UnexpectedStatus {
                url,
                status: response.status(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.clone(), e))?;
        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Flattens `outputs.tmy_hourly` into a raw table over the timestamp and the
/// mapped source columns. Other record fields (`IR(h)`, `RH`, `WD10m`, `SP`) are dropped.
fn hourly_table(records: &[Map<String, Value>]) -> Result<RawTable, ParseError> {
    let mut header = vec![COL_TIME];
    header.extend(ProviderFormat::PvgisTmy.source_columns());

    let mut table = RawTable::new(header.iter().map(|h| h.to_string()).collect());
    for (idx, record) in records.iter().enumerate() {
        let fields = header
            .iter()
            .map(|name| {
                record.get(*name).map(cell).ok_or_else(|| ParseError::MissingColumn {
                    column: name.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        table.push_row(idx + 1, fields)?;
    }
    Ok(table)
}

/// Decodes a PVGIS TMY JSON body. An empty `tmy_hourly` array is not an error;
/// it yields an empty series.
pub(crate) fn extract_tmy(body: &[u8]) -> Result<CanonicalTimeSeries, ParseError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    let raw = hourly_table(&envelope.outputs.tmy_hourly)?;

    let stamps = raw
        .column(COL_TIME)?
        .into_iter()
        .map(|value| parse_timestamp(value, TIMESTAMP_FORMAT))
        .collect::<Result<Vec<_>, _>>()?;
    debug!("PVGIS TMY: {} hourly records", stamps.len());
    canonicalize(&raw, ProviderFormat::PvgisTmy, RowIndex::Timestamps(stamps))
}
