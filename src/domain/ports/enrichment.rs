//! Enrichment port
//!
//! Post-activation sub-processes run for users that were created or
//! re-enabled: profile attribute sync, then group sync. Failures are
//! reported back but never abort a run.

use crate::domain::entities::{DomainConfig, Identity};

/// Which enrichment step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentStep {
    Attributes,
    Groups,
}

impl std::fmt::Display for EnrichmentStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentStep::Attributes => write!(f, "attribute sync"),
            EnrichmentStep::Groups => write!(f, "group sync"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentError {
    pub step: EnrichmentStep,
    pub message: String,
}

impl EnrichmentError {
    pub fn new(step: EnrichmentStep, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EnrichmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.step, self.message)
    }
}

impl std::error::Error for EnrichmentError {}

pub trait Enrichment {
    fn sync_attributes(&self, identity: &Identity, domain: &DomainConfig)
        -> Result<(), EnrichmentError>;

    fn sync_groups(&self, identity: &Identity, domain: &DomainConfig)
        -> Result<(), EnrichmentError>;
}

impl<T: Enrichment + ?Sized> Enrichment for &T {
    fn sync_attributes(
        &self,
        identity: &Identity,
        domain: &DomainConfig,
    ) -> Result<(), EnrichmentError> {
        (**self).sync_attributes(identity, domain)
    }

    fn sync_groups(&self, identity: &Identity, domain: &DomainConfig) -> Result<(), EnrichmentError> {
        (**self).sync_groups(identity, domain)
    }
}

/// Enrichment that does nothing (disable-only runs, tests)
pub struct NoopEnrichment;

impl Enrichment for NoopEnrichment {
    fn sync_attributes(
        &self,
        _identity: &Identity,
        _domain: &DomainConfig,
    ) -> Result<(), EnrichmentError> {
        Ok(())
    }

    fn sync_groups(
        &self,
        _identity: &Identity,
        _domain: &DomainConfig,
    ) -> Result<(), EnrichmentError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrichment_error_display() {
        let err = EnrichmentError::new(EnrichmentStep::Groups, "group 'x' unknown");
        assert_eq!(err.to_string(), "group sync failed: group 'x' unknown");
    }
}
