// Adapters layer: concrete implementations of the domain ports for external
// systems. Real deployments plug in their own store and rules source; the
// local file-backed ones here serve the CLI and tests.

pub mod local;
