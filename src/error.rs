use thiserror::Error;

use crate::{
    catalogue::CatalogueError, schedule::ScheduleError, sensitivity::FitError, site::SiteError,
    time::TimeError, tsky::TskyError,
};

/// Every error the library can hand back to a binary.
#[derive(Error, Debug)]
pub enum SkyplanError {
    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Site(#[from] SiteError),

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Tsky(#[from] TskyError),

    #[error(transparent)]
    Fit(#[from] FitError),
}
