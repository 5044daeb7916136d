//! Manual bank transfer. Nothing to call; the donation is confirmed by hand.

use std::sync::Arc;

use async_trait::async_trait;
use donations_types::{
    InitiateRequest, Initiation, PaymentMethod, PaymentProvider, ProviderData, ProviderError,
};

use crate::reference::ReferenceGenerator;

pub struct ManualProvider {
    references: Arc<ReferenceGenerator>,
}

impl ManualProvider {
    pub fn new(references: Arc<ReferenceGenerator>) -> Self {
        Self { references }
    }
}

#[async_trait]
impl PaymentProvider for ManualProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Manual
    }

    async fn initiate(&self, _request: &InitiateRequest) -> Result<Initiation, ProviderError> {
        Ok(Initiation {
            reference: self.references.next(PaymentMethod::Manual),
            data: ProviderData::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedClock, request};

    #[tokio::test]
    async fn test_manual_reference_without_provider_data() {
        let references = Arc::new(ReferenceGenerator::new(Arc::new(FixedClock::at_millis(
            1_718_000_000_000,
        ))));
        let provider = ManualProvider::new(references);

        let initiation = provider.initiate(&request("Jane", 50.0)).await.unwrap();

        assert_eq!(initiation.reference, "manual_1718000000000");
        assert_eq!(initiation.data, ProviderData::default());
    }
}
