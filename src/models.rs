pub mod analytics;
pub mod audit;
pub mod auth;
pub mod content;
pub mod dashboard;
pub mod inventory;
pub mod promo;
pub mod rate_plan;
pub mod reservation;
pub mod review;
pub mod room;

use serde::{Deserialize, Deserializer};

/// Tells an absent key (`None`) apart from an explicit `null` (`Some(None)`)
/// in partial-update payloads. Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
