//! Price data access port trait.

use crate::domain::error::QuantdashError;
use crate::domain::price::PricePoint;

/// A source of normalized price series.
///
/// Implementations absorb whatever shape their upstream uses and must return
/// series that went through `domain::price::normalize`.
pub trait PriceSource {
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, QuantdashError>;

    fn list_symbols(&self) -> Result<Vec<String>, QuantdashError>;
}
