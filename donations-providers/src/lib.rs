//! # Donation Providers
//!
//! Outbound adapters implementing the `PaymentProvider` port, one per
//! payment method:
//!
//! - [`StripeProvider`] - card payments through Stripe PaymentIntents
//! - [`ChapaProvider`] - hosted checkout through the Chapa gateway
//! - [`TelebirrProvider`] - mobile money, confirmed out of band
//! - [`ManualProvider`] - bank transfer, confirmed out of band
//!
//! Locally minted references (`<method>_<epoch millis>`) come from a shared
//! [`ReferenceGenerator`] driven by an injected `Clock`.

mod chapa;
mod manual;
mod reference;
mod stripe_client;
mod telebirr;

pub use chapa::{ChapaConfig, ChapaProvider, DEFAULT_CHAPA_BASE_URL, DEFAULT_DONOR_EMAIL};
pub use manual::ManualProvider;
pub use reference::ReferenceGenerator;
pub use stripe_client::{StripeProvider, parse_currency};

/// Currency enum accepted by [`StripeProvider::new`].
pub use stripe::Currency as StripeCurrency;
pub use telebirr::{TELEBIRR_INSTRUCTIONS, TelebirrProvider};

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, TimeZone, Utc};
    use donations_types::{Amount, Clock, InitiateRequest, PaymentMethodData};

    /// Clock pinned to a single instant.
    pub struct FixedClock(pub DateTime<Utc>);

    impl FixedClock {
        pub fn at_millis(millis: i64) -> Self {
            Self(Utc.timestamp_millis_opt(millis).unwrap())
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    pub fn request(name: &str, amount: f64) -> InitiateRequest {
        InitiateRequest {
            name: name.to_string(),
            amount: Amount::new(amount).unwrap(),
            payment_method_data: PaymentMethodData::default(),
        }
    }
}
