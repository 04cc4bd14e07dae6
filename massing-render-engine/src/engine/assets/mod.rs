//! Site asset management: manifest, imagery, and geolocation updates.
//!
//! The manifest and imagery are fire-and-forget loads polled per frame;
//! every failure path degrades to a usable fallback instead of blocking
//! interaction.

/// Asynchronous manifest/imagery loading with fallback and address relay.
pub mod imagery;

/// Site manifest JSON asset (location, zoom, plane size, imagery file).
pub mod site_manifest;
