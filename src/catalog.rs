use std::collections::HashMap;

use crate::models::{ProductDetails, ProductType};

/// Cache of queried product details, keyed by product id.
///
/// Subscription purchase flows need the offer token of the chosen base
/// plan, which only exists inside previously fetched product details. The
/// catalog keeps the latest details per product so a flow can resolve its
/// offer without re-querying the service every time.
#[derive(Debug, Default)]
pub(crate) struct ProductCatalog {
    products: HashMap<String, ProductDetails>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum OfferError {
    #[error("No product details cached for {product_id}")]
    ProductNotCached { product_id: String },
    #[error("Product {product_id} is not a subscription")]
    NotASubscription { product_id: String },
    #[error("Base Plan ID {base_plan_id} not found in {product_id} subscription")]
    BasePlanNotFound {
        product_id: String,
        base_plan_id: String,
    },
}

impl ProductCatalog {
    pub fn insert(&mut self, details: ProductDetails) {
        self.products.insert(details.product_id.clone(), details);
    }

    pub fn extend<I>(&mut self, details: I)
    where
        I: IntoIterator<Item = ProductDetails>,
    {
        for entry in details {
            self.insert(entry);
        }
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.products.contains_key(product_id)
    }

    pub fn get(&self, product_id: &str) -> Option<&ProductDetails> {
        self.products.get(product_id)
    }

    /// Resolves the offer token for a base plan. The first offer listed for
    /// the base plan wins, matching the service's offer ordering.
    pub fn offer_token_for(
        &self,
        product_id: &str,
        base_plan_id: &str,
    ) -> Result<String, OfferError> {
        let details = self
            .products
            .get(product_id)
            .ok_or_else(|| OfferError::ProductNotCached {
                product_id: product_id.to_string(),
            })?;

        if details.product_type != ProductType::Subs {
            return Err(OfferError::NotASubscription {
                product_id: product_id.to_string(),
            });
        }

        details
            .subscription_offer_details
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|offer| offer.base_plan_id == base_plan_id)
            .map(|offer| offer.offer_token.clone())
            .ok_or_else(|| OfferError::BasePlanNotFound {
                product_id: product_id.to_string(),
                base_plan_id: base_plan_id.to_string(),
            })
    }

    pub fn clear(&mut self) {
        self.products.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SubscriptionOffer;

    fn subscription(product_id: &str, offers: Vec<SubscriptionOffer>) -> ProductDetails {
        ProductDetails {
            product_id: product_id.to_string(),
            product_type: ProductType::Subs,
            name: product_id.to_string(),
            title: product_id.to_string(),
            description: String::new(),
            one_time_purchase_offer_details: None,
            subscription_offer_details: Some(offers),
        }
    }

    fn offer(base_plan_id: &str, offer_id: Option<&str>, token: &str) -> SubscriptionOffer {
        SubscriptionOffer {
            base_plan_id: base_plan_id.to_string(),
            offer_id: offer_id.map(str::to_string),
            offer_token: token.to_string(),
            offer_tags: Vec::new(),
            pricing_phases: Vec::new(),
            installment_plan_details: None,
        }
    }

    fn one_time(product_id: &str) -> ProductDetails {
        ProductDetails {
            product_id: product_id.to_string(),
            product_type: ProductType::Inapp,
            name: product_id.to_string(),
            title: product_id.to_string(),
            description: String::new(),
            one_time_purchase_offer_details: None,
            subscription_offer_details: None,
        }
    }

    #[test]
    fn resolves_offer_token_for_base_plan() {
        let mut catalog = ProductCatalog::default();
        catalog.insert(subscription(
            "premium",
            vec![offer("monthly", None, "tok-monthly"), offer("yearly", None, "tok-yearly")],
        ));

        assert_eq!(
            catalog.offer_token_for("premium", "yearly").unwrap(),
            "tok-yearly"
        );
    }

    #[test]
    fn first_offer_wins_when_base_plan_has_several() {
        let mut catalog = ProductCatalog::default();
        catalog.insert(subscription(
            "premium",
            vec![
                offer("monthly", Some("intro"), "tok-intro"),
                offer("monthly", None, "tok-base"),
            ],
        ));

        assert_eq!(
            catalog.offer_token_for("premium", "monthly").unwrap(),
            "tok-intro"
        );
    }

    #[test]
    fn missing_product_reports_not_cached() {
        let catalog = ProductCatalog::default();
        assert_eq!(
            catalog.offer_token_for("premium", "monthly"),
            Err(OfferError::ProductNotCached {
                product_id: "premium".into()
            })
        );
    }

    #[test]
    fn one_time_product_is_not_a_subscription() {
        let mut catalog = ProductCatalog::default();
        catalog.insert(one_time("gold_pack"));
        assert_eq!(
            catalog.offer_token_for("gold_pack", "monthly"),
            Err(OfferError::NotASubscription {
                product_id: "gold_pack".into()
            })
        );
    }

    #[test]
    fn unknown_base_plan_reports_not_found() {
        let mut catalog = ProductCatalog::default();
        catalog.insert(subscription("premium", vec![offer("monthly", None, "tok")]));

        let err = catalog.offer_token_for("premium", "weekly").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Base Plan ID weekly not found in premium subscription"
        );
    }

    #[test]
    fn requery_replaces_cached_details() {
        let mut catalog = ProductCatalog::default();
        catalog.insert(subscription("premium", vec![offer("monthly", None, "old")]));
        catalog.extend(vec![subscription(
            "premium",
            vec![offer("monthly", None, "new")],
        )]);

        assert_eq!(catalog.offer_token_for("premium", "monthly").unwrap(), "new");
        assert!(catalog.contains("premium"));
        assert!(catalog.get("gold_pack").is_none());
    }

    #[test]
    fn clear_empties_the_catalog() {
        let mut catalog = ProductCatalog::default();
        catalog.insert(one_time("gold_pack"));
        catalog.clear();
        assert!(!catalog.contains("gold_pack"));
    }
}
