pub mod export;
pub mod intel;
