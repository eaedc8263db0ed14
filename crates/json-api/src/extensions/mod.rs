//! Handler helper extensions.

mod depot;
mod params;
mod result;

pub(crate) use depot::DepotExt;
pub(crate) use params::DecimalParamExt;
pub(crate) use result::ResultExt;
