mod error;
mod parsers;
mod pipeline;
mod registry;
mod reporter;
mod solar_resource;
mod types;

pub use error::{ErrorKind, ResourceError};
pub use solar_resource::*;

pub use parsers::error::{FetchError, ParseError};
pub use parsers::pvgis::DEFAULT_PVGIS_BASE_URL;

pub use registry::{InvalidSlot, SlotId, SlotStatus, SourceRegistry, SourceSlot, SLOT_COUNT};
pub use reporter::{LogReporter, NoopReporter, Reporter};

pub use types::canonical::CanonicalColumn;
pub use types::climatology::{MonthlyClimatology, MonthlyIrradiation};
pub use types::geo::{GeoError, LatLon, ProjectGeo};
pub use types::provider::{ProviderFormat, PROVIDER_CATALOG, WH_PER_KWH};
