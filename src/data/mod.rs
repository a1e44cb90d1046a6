/// Data layer: core types, errors and text-table loading.
///
/// Architecture:
/// ```text
///  instrument export (.txt)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  trim header/footer, pick columns → Interferogram
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ Interferogram │  positions (µm), signals (mV)
///   └──────────────┘
///        │
///        ▼
///   spectral::transform → Spectrum → Resolution
/// ```

pub mod error;
pub mod loader;
pub mod model;
