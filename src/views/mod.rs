//! View renderers. Each view builds an HTML fragment as a string; the WASM
//! side swaps the fragment into the main container after navigation.

pub mod dashboard;
pub mod explore;
pub mod home;
