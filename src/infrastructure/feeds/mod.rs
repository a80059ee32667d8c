//! CERT-FR bulletin feed extraction

pub mod cert_fr;

pub use cert_fr::CertFrFeeds;
