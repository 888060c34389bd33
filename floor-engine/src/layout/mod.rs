//! Layout change detection

mod signature;

pub use signature::LayoutSignature;
