//! Telebirr mobile money. Payments are confirmed out of band, so no API call is made.

use std::sync::Arc;

use async_trait::async_trait;
use donations_types::{
    InitiateRequest, Initiation, PaymentMethod, PaymentProvider, ProviderData, ProviderError,
};

use crate::reference::ReferenceGenerator;

pub const TELEBIRR_INSTRUCTIONS: &str = "Use Telebirr app to transfer to account XYZ";

pub struct TelebirrProvider {
    references: Arc<ReferenceGenerator>,
}

impl TelebirrProvider {
    pub fn new(references: Arc<ReferenceGenerator>) -> Self {
        Self { references }
    }
}

#[async_trait]
impl PaymentProvider for TelebirrProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Telebirr
    }

    async fn initiate(&self, _request: &InitiateRequest) -> Result<Initiation, ProviderError> {
        Ok(Initiation {
            reference: self.references.next(PaymentMethod::Telebirr),
            data: ProviderData {
                message: Some(TELEBIRR_INSTRUCTIONS.to_string()),
                ..Default::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FixedClock, request};

    #[tokio::test]
    async fn test_reference_and_instructions() {
        let references = Arc::new(ReferenceGenerator::new(Arc::new(FixedClock::at_millis(42))));
        let provider = TelebirrProvider::new(references);

        let initiation = provider.initiate(&request("Jane", 20.0)).await.unwrap();

        assert_eq!(initiation.reference, "telebirr_42");
        assert_eq!(initiation.data.message.as_deref(), Some(TELEBIRR_INSTRUCTIONS));
        assert!(initiation.data.client_secret.is_none());
    }
}
