//! Money query-parameter parsing helpers.

use rust_decimal::Decimal;
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::ResultExt;

pub(crate) trait DecimalParamExt {
    /// Parse an optional decimal query parameter, rejecting malformed input
    /// with a client error naming the parameter.
    fn into_decimal(self, name: &str) -> Result<Option<Decimal>, StatusError>;
}

impl DecimalParamExt for QueryParam<String, false> {
    fn into_decimal(self, name: &str) -> Result<Option<Decimal>, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<Decimal>())
            .transpose()
            .or_400(&format!("could not parse \"{name}\" query parameter"))
    }
}
