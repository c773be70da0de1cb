//! Side effects declared by the reducer

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run refresh cycle `cycle`: fetch, decode, settle
    FetchWeather { cycle: u64 },
}
