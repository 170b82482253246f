//! The main entry point: loads one data source into a [`MonthlyClimatology`].

use crate::error::{ErrorKind, ResourceError};
use crate::parsers;
use crate::parsers::pvgis::{PvgisLoader, DEFAULT_PVGIS_BASE_URL};
use crate::pipeline;
use crate::reporter::{LogReporter, Reporter};
use crate::types::climatology::MonthlyClimatology;
use crate::types::geo::ProjectGeo;
use crate::types::provider::ProviderFormat;
use bon::bon;
use log::{info, Level};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::{fs, task};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Loads provider exports and PVGIS downloads into monthly climatologies.
///
/// Each call to [`SolarResource::normalize`] reads one file or performs one
/// HTTP request, then parses and reduces the payload on the blocking pool.
/// Calls are independent and may run concurrently.
///
/// # Examples
///
/// ```rust,no_run
/// # use solar_resource::{SolarResource, ProviderFormat, ResourceError};
/// # use std::path::Path;
/// # #[tokio::main]
/// # async fn main() -> Result<(), ResourceError> {
/// let client = SolarResource::builder().build()?;
///
/// let climatology = client
///     .normalize()
///     .format(ProviderFormat::SolargisTmy)
///     .source(Path::new("data/solargis_tmy.csv"))
///     .call()
///     .await?;
///
/// for month in climatology.months() {
///     println!("{}: {:?} kWh/m²", month.month.name(), month.ghi);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SolarResource {
    pvgis: PvgisLoader,
    reporter: Arc<dyn Reporter>,
}

#[bon]
impl SolarResource {
    /// Creates a client.
    ///
    /// * `.pvgis_base_url(String)`: Optional. Root of the PVGIS API. Defaults to
    ///   the public JRC endpoint.
    /// * `.request_timeout(Duration)`: Optional. Bound on the PVGIS request. Defaults to 60 s.
    /// * `.reporter(Arc<dyn Reporter>)`: Optional. Receives one message per failed
    ///   load. Defaults to [`LogReporter`].
    #[builder]
    pub fn new(
        pvgis_base_url: Option<String>,
        request_timeout: Option<Duration>,
        reporter: Option<Arc<dyn Reporter>>,
    ) -> Result<Self, ResourceError> {
        let base_url = pvgis_base_url.unwrap_or_else(|| DEFAULT_PVGIS_BASE_URL.to_string());
        let timeout = request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        let pvgis = PvgisLoader::new(&base_url, timeout).map_err(ResourceError::ClientBuild)?;
        Ok(Self {
            pvgis,
            reporter: reporter.unwrap_or_else(|| Arc::new(LogReporter)),
        })
    }

    /// Reads one data source and reduces it to twelve calendar months.
    ///
    /// * `.format(ProviderFormat)`: **Required.** How to interpret the source.
    /// * `.source(&Path)`: The export file. Required for every format except
    ///   [`ProviderFormat::PvgisTmy`], which ignores it.
    /// * `.geo(ProjectGeo)`: Site coordinates. Required for [`ProviderFormat::PvgisTmy`].
    ///
    /// # Errors
    ///
    /// Every failure maps onto one [`ErrorKind`] through [`ResourceError::kind`]:
    /// a missing source (or missing coordinates for PVGIS) is
    /// [`ErrorKind::EmptyInput`] and is detected before any I/O, unreadable files
    /// are [`ErrorKind::FileAccess`], payloads that do not match the provider's
    /// layout are [`ErrorKind::Format`], and PVGIS transport or status failures
    /// are [`ErrorKind::Connectivity`]. No partial climatology is returned.
    #[builder]
    pub async fn normalize(
        &self,
        format: ProviderFormat,
        source: Option<&Path>,
        geo: Option<ProjectGeo>,
    ) -> Result<MonthlyClimatology, ResourceError> {
        let result = self.load(format, source, geo).await;
        if let Err(e) = &result {
            self.report_failure(&format.to_string(), e);
        }
        result
    }

    /// Same as [`SolarResource::normalize`], but selects the format by its
    /// catalog label. Labels without a parser fail as a format error.
    #[builder]
    pub async fn normalize_label(
        &self,
        label: &str,
        source: Option<&Path>,
        geo: Option<ProjectGeo>,
    ) -> Result<MonthlyClimatology, ResourceError> {
        let format = match label.parse::<ProviderFormat>() {
            Ok(format) => format,
            Err(e) => {
                self.report_failure(label, &e);
                return Err(e);
            }
        };
        self.normalize()
            .format(format)
            .maybe_source(source)
            .maybe_geo(geo)
            .call()
            .await
    }
}

impl SolarResource {
    async fn load(
        &self,
        format: ProviderFormat,
        source: Option<&Path>,
        geo: Option<ProjectGeo>,
    ) -> Result<MonthlyClimatology, ResourceError> {
        let payload = if format.is_remote() {
            let geo = geo.ok_or(ResourceError::MissingGeo)?;
            self.pvgis
                .download(geo.lat_lon())
                .await
                .map_err(|source| ResourceError::Connectivity { format, source })?
        } else {
            let path = source
                .filter(|p| !p.as_os_str().is_empty())
                .ok_or(ResourceError::EmptyInput)?;
            fs::read(path)
                .await
                .map_err(|e| ResourceError::FileAccess(path.to_path_buf(), e))?
        };

        let climatology = task::spawn_blocking(move || {
            let series = parsers::parse(format, &payload)?;
            pipeline::to_climatology(series, format)
        })
        .await?
        .map_err(|source| ResourceError::Format { format, source })?;

        info!(
            "Loaded {} climatology, annual GHI {:.1} kWh/m²",
            format,
            climatology.annual_ghi()
        );
        Ok(climatology)
    }

    fn report_failure(&self, what: &str, error: &ResourceError) {
        let kind = error.kind();
        let level = if kind == ErrorKind::EmptyInput {
            Level::Info
        } else {
            Level::Error
        };
        let mut message = format!("{what}: {error}");
        let mut cause = std::error::Error::source(error);
        while let Some(inner) = cause {
            message.push_str(&format!(": {inner}"));
            cause = inner.source();
        }
        self.reporter.report(level, &message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::error::{FetchError, ParseError};
    use crate::parsers::pvgis::fixtures::tmy_body;
    use crate::parsers::solargis::fixtures::{monthly_averages_text, tmy_text};
    use crate::reporter::recording::RecordingReporter;
    use crate::reporter::NoopReporter;
    use chrono::Month;
    use mockito::{Matcher, Server};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_fixture(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn recording_client(base_url: Option<String>) -> (SolarResource, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::default());
        let sink: Arc<dyn Reporter> = reporter.clone();
        let client = SolarResource::builder()
            .maybe_pvgis_base_url(base_url)
            .request_timeout(Duration::from_secs(5))
            .reporter(sink)
            .build()
            .unwrap();
        (client, reporter)
    }

    fn madrid() -> ProjectGeo {
        ProjectGeo::new(40.4, -3.7, 650.0).unwrap()
    }

    async fn pvgis_server(status: usize, body: &str) -> (mockito::ServerGuard, mockito::Mock) {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/tmy")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), "40.4".into()),
                Matcher::UrlEncoded("lon".into(), "-3.7".into()),
                Matcher::UrlEncoded("usehorizon".into(), "1".into()),
                Matcher::UrlEncoded("outputformat".into(), "json".into()),
            ]))
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        (server, mock)
    }

    #[tokio::test]
    async fn test_solargis_tmy_end_to_end() -> Result<(), ResourceError> {
        let file = write_fixture(&tmy_text(1, 100.0));
        let client = SolarResource::builder()
            .reporter(Arc::new(NoopReporter))
            .build()?;

        let climatology = client
            .normalize()
            .format(ProviderFormat::SolargisTmy)
            .source(file.path())
            .call()
            .await?;

        let names: Vec<&str> = climatology.months().iter().map(|m| m.month.name()).collect();
        assert_eq!(names.first(), Some(&"January"));
        assert_eq!(names.last(), Some(&"December"));
        assert_eq!(climatology.get(Month::January).ghi, Some(100.0 * 744.0 / 1000.0));
        assert!(climatology.months()[1..].iter().all(|m| m.ghi == Some(0.0)));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_source_is_empty_input() {
        let (client, reporter) = recording_client(None);

        let err = client
            .normalize()
            .format(ProviderFormat::SolargisHistoric)
            .call()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);

        let err = client
            .normalize()
            .format(ProviderFormat::MeteonormTmy)
            .source(Path::new(""))
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::EmptyInput));

        let reports = reporter.reports();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|(level, _)| *level == Level::Info));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_file_access() {
        let (client, reporter) = recording_client(None);
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does_not_exist.csv");

        let err = client
            .normalize()
            .format(ProviderFormat::SolargisTmy)
            .source(&missing)
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::FileAccess(ref p, _) if p == &missing));
        assert_eq!(err.kind(), ErrorKind::FileAccess);

        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, Level::Error);
        assert!(reports[0].1.starts_with("Solargis - TMY: Failed to read"));
    }

    #[tokio::test]
    async fn test_monthly_averages_without_month_header_is_format_error() {
        let (client, reporter) = recording_client(None);
        let months = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        let file = write_fixture(&monthly_averages_text(&months).replace("Month;", "M;"));

        let err = client
            .normalize()
            .format(ProviderFormat::SolargisMonthlyAverages)
            .source(file.path())
            .call()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(
            err,
            ResourceError::Format {
                source: ParseError::HeaderNotFound { marker: "Month" },
                ..
            }
        ));
        assert!(reporter.reports()[0].1.contains("Header row containing 'Month' not found"));
    }

    #[tokio::test]
    async fn test_wrong_format_for_file_is_format_error() -> Result<(), Box<dyn std::error::Error>> {
        let (client, _) = recording_client(None);
        let file = write_fixture(&tmy_text(6, 10.0));

        let err = client
            .normalize()
            .format(ProviderFormat::MeteonormTmy)
            .source(file.path())
            .call()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        Ok(())
    }

    #[tokio::test]
    async fn test_unsupported_label_is_reported() {
        let (client, reporter) = recording_client(None);
        let file = write_fixture(&tmy_text(1, 1.0));

        let err = client
            .normalize_label()
            .label("NASA - TMY")
            .source(file.path())
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::UnsupportedProvider(ref l) if l == "NASA - TMY"));
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(reporter.reports().len(), 1);
    }

    #[tokio::test]
    async fn test_label_dispatch_reaches_the_parser() -> Result<(), ResourceError> {
        let (client, reporter) = recording_client(None);
        let file = write_fixture(&tmy_text(3, 20.0));

        let climatology = client
            .normalize_label()
            .label("Solargis - TMY")
            .source(file.path())
            .call()
            .await?;
        assert_eq!(climatology.get(Month::March).ghi, Some(20.0 * 744.0 / 1000.0));
        assert!(reporter.reports().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_pvgis_without_geo_is_empty_input() {
        let (client, _) = recording_client(Some("http://127.0.0.1:9".to_string()));
        let err = client
            .normalize()
            .format(ProviderFormat::PvgisTmy)
            .call()
            .await
            .unwrap_err();
        assert!(matches!(err, ResourceError::MissingGeo));
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[tokio::test]
    async fn test_pvgis_success() -> Result<(), ResourceError> {
        let body = tmy_body(&[(2010, 1), (2010, 1), (2015, 8)], 250.0);
        let (server, mock) = pvgis_server(200, &body).await;
        let (client, reporter) = recording_client(Some(server.url()));

        let climatology = client
            .normalize()
            .format(ProviderFormat::PvgisTmy)
            .geo(madrid())
            .call()
            .await?;

        mock.assert_async().await;
        assert_eq!(climatology.get(Month::January).ghi, Some(0.5));
        assert_eq!(climatology.get(Month::August).ghi, Some(0.25));
        assert!(climatology.get(Month::February).is_empty());
        assert!(reporter.reports().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_pvgis_server_error_is_connectivity() {
        let (server, mock) = pvgis_server(500, "{\"message\": \"internal\"}").await;
        let (client, reporter) = recording_client(Some(server.url()));

        let err = client
            .normalize()
            .format(ProviderFormat::PvgisTmy)
            .geo(madrid())
            .call()
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind(), ErrorKind::Connectivity);
        assert!(matches!(
            err,
            ResourceError::Connectivity {
                source: FetchError::HttpStatus { status, .. },
                ..
            } if status.as_u16() == 500
        ));
        assert_eq!(reporter.reports()[0].0, Level::Error);
    }

    #[tokio::test]
    async fn test_pvgis_success_status_other_than_200_is_connectivity() {
        let body = tmy_body(&[(2010, 1)], 100.0);
        for (status, body) in [(204, ""), (203, body.as_str())] {
            let (server, mock) = pvgis_server(status, body).await;
            let (client, reporter) = recording_client(Some(server.url()));

            let err = client
                .normalize()
                .format(ProviderFormat::PvgisTmy)
                .geo(madrid())
                .call()
                .await
                .unwrap_err();

            mock.assert_async().await;
            assert_eq!(err.kind(), ErrorKind::Connectivity, "status {status}");
            assert!(matches!(
                err,
                ResourceError::Connectivity {
                    source: FetchError::UnexpectedStatus { status: s, .. },
                    ..
                } if s.as_u16() as usize == status
            ));
            assert_eq!(reporter.reports()[0].0, Level::Error);
        }
    }

    #[tokio::test]
    async fn test_pvgis_unreachable_is_connectivity() {
        // nothing listens on the discard port
        let (client, _) = recording_client(Some("http://127.0.0.1:9".to_string()));
        let err = client
            .normalize()
            .format(ProviderFormat::PvgisTmy)
            .geo(madrid())
            .call()
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Connectivity {
                source: FetchError::NetworkRequest(..),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_pvgis_empty_array_is_all_missing() -> Result<(), ResourceError> {
        let (server, _mock) = pvgis_server(200, &tmy_body(&[], 0.0)).await;
        let (client, _) = recording_client(Some(server.url()));

        let climatology = client
            .normalize()
            .format(ProviderFormat::PvgisTmy)
            .geo(madrid())
            .call()
            .await?;
        assert_eq!(climatology.months().len(), 12);
        assert!(climatology.months().iter().all(|m| m.is_empty()));
        Ok(())
    }

    #[tokio::test]
    async fn test_pvgis_malformed_json_is_format_error() {
        let (server, _mock) = pvgis_server(200, "{\"outputs\": ").await;
        let (client, _) = recording_client(Some(server.url()));

        let err = client
            .normalize()
            .format(ProviderFormat::PvgisTmy)
            .geo(madrid())
            .call()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(matches!(
            err,
            ResourceError::Format {
                source: ParseError::JsonParse(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_pvgis_ignores_the_source_path() -> Result<(), ResourceError> {
        let (server, mock) = pvgis_server(200, &tmy_body(&[(2010, 4)], 1000.0)).await;
        let (client, _) = recording_client(Some(server.url()));

        let climatology = client
            .normalize()
            .format(ProviderFormat::PvgisTmy)
            .source(Path::new("NoFile"))
            .geo(madrid())
            .call()
            .await?;
        mock.assert_async().await;
        assert_eq!(climatology.get(Month::April).ghi, Some(1.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_loads_are_independent() -> Result<(), ResourceError> {
        let (client, _) = recording_client(None);
        let january = write_fixture(&tmy_text(1, 100.0));
        let july = write_fixture(&tmy_text(7, 50.0));

        let (a, b) = tokio::join!(
            client
                .normalize()
                .format(ProviderFormat::SolargisTmy)
                .source(january.path())
                .call(),
            client
                .normalize()
                .format(ProviderFormat::SolargisTmy)
                .source(july.path())
                .call(),
        );
        let (a, b) = (a?, b?);
        assert_eq!(a.get(Month::July).ghi, Some(0.0));
        assert_eq!(b.get(Month::July).ghi, Some(50.0 * 744.0 / 1000.0));
        Ok(())
    }
}
