/// Data layer: core types, extraction, alignment and export.
///
/// Architecture:
/// ```text
///   directory
///        │
///        ▼
///   ┌──────────┐
///   │ collect   │  recursive *.thf / *.THF walk
///   └──────────┘
///        │  (per file)
///        ▼
///   ┌──────────┐
///   │  loader   │  marker scan → horizontal / vertical / defocus blocks
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  align    │  (h + v) / 2, keep rows at the requested frequencies
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  record   │  labelled flat text rows → export (.csv / .json)
///   └──────────┘
/// ```

pub mod align;
pub mod collect;
pub mod error;
pub mod export;
pub mod input;
pub mod loader;
pub mod model;
pub mod record;
