use serde::{Deserialize, Serialize};

/// Plugin configuration, read from the `play-billing` entry of the host
/// app's plugin config. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Forwarded to the billing client's pending-purchases parameters so
    /// one-time products may complete while in the PENDING state.
    #[serde(default = "default_true")]
    pub enable_pending_one_time_products: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_pending_one_time_products: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Inapp,
    Subs,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductType::Inapp => "inapp",
            ProductType::Subs => "subs",
        }
    }
}

/// Response codes reported by the billing service. Values track the SDK's
/// `BillingResponseCode` constants; codes this crate does not know yet are
/// carried through as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingResponseCode {
    ServiceTimeout,
    FeatureNotSupported,
    ServiceDisconnected,
    Ok,
    UserCanceled,
    ServiceUnavailable,
    BillingUnavailable,
    ItemUnavailable,
    DeveloperError,
    Error,
    ItemAlreadyOwned,
    ItemNotOwned,
    NetworkError,
    Other(i32),
}

impl BillingResponseCode {
    pub fn code(&self) -> i32 {
        match self {
            BillingResponseCode::ServiceTimeout => -3,
            BillingResponseCode::FeatureNotSupported => -2,
            BillingResponseCode::ServiceDisconnected => -1,
            BillingResponseCode::Ok => 0,
            BillingResponseCode::UserCanceled => 1,
            BillingResponseCode::ServiceUnavailable => 2,
            BillingResponseCode::BillingUnavailable => 3,
            BillingResponseCode::ItemUnavailable => 4,
            BillingResponseCode::DeveloperError => 5,
            BillingResponseCode::Error => 6,
            BillingResponseCode::ItemAlreadyOwned => 7,
            BillingResponseCode::ItemNotOwned => 8,
            BillingResponseCode::NetworkError => 12,
            BillingResponseCode::Other(code) => *code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            -3 => BillingResponseCode::ServiceTimeout,
            -2 => BillingResponseCode::FeatureNotSupported,
            -1 => BillingResponseCode::ServiceDisconnected,
            0 => BillingResponseCode::Ok,
            1 => BillingResponseCode::UserCanceled,
            2 => BillingResponseCode::ServiceUnavailable,
            3 => BillingResponseCode::BillingUnavailable,
            4 => BillingResponseCode::ItemUnavailable,
            5 => BillingResponseCode::DeveloperError,
            6 => BillingResponseCode::Error,
            7 => BillingResponseCode::ItemAlreadyOwned,
            8 => BillingResponseCode::ItemNotOwned,
            12 => BillingResponseCode::NetworkError,
            other => BillingResponseCode::Other(other),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, BillingResponseCode::Ok)
    }
}

impl Serialize for BillingResponseCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for BillingResponseCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i32::deserialize(deserializer)?;
        Ok(BillingResponseCode::from_code(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseState {
    Unspecified,
    Purchased,
    Pending,
}

impl Serialize for PurchaseState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(match self {
            PurchaseState::Unspecified => 0,
            PurchaseState::Purchased => 1,
            PurchaseState::Pending => 2,
        })
    }
}

impl<'de> Deserialize<'de> for PurchaseState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i32::deserialize(deserializer)?;
        match value {
            0 => Ok(PurchaseState::Unspecified),
            1 => Ok(PurchaseState::Purchased),
            2 => Ok(PurchaseState::Pending),
            _ => Err(serde::de::Error::custom(format!(
                "Invalid purchase state: {value}"
            ))),
        }
    }
}

/// Outcome of a billing service call, attached to every SDK response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkStatus {
    pub response_code: BillingResponseCode,
    #[serde(default)]
    pub debug_message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountIdentifiers {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfuscated_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfuscated_profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingPurchaseUpdate {
    #[serde(default)]
    pub products: Vec<String>,
    pub purchase_token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub order_id: Option<String>,
    pub package_name: String,
    #[serde(default)]
    pub products: Vec<String>,
    pub purchase_state: PurchaseState,
    pub purchase_time: i64,
    pub purchase_token: String,
    #[serde(default)]
    pub quantity: i32,
    pub is_acknowledged: bool,
    pub is_auto_renewing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_identifiers: Option<AccountIdentifiers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_purchase_update: Option<PendingPurchaseUpdate>,
    pub original_json: String,
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPhase {
    pub billing_cycle_count: i32,
    pub billing_period: String,
    pub formatted_price: String,
    pub price_amount_micros: i64,
    pub price_currency_code: String,
    pub recurrence_mode: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentPlanDetails {
    pub installment_plan_commitment_payments_count: i32,
    pub subsequent_installment_plan_commitment_payments_count: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionOffer {
    pub base_plan_id: String,
    pub offer_id: Option<String>,
    pub offer_token: String,
    #[serde(default)]
    pub offer_tags: Vec<String>,
    #[serde(default)]
    pub pricing_phases: Vec<PricingPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_plan_details: Option<InstallmentPlanDetails>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneTimePurchaseOffer {
    pub formatted_price: String,
    pub price_currency_code: String,
    pub price_amount_micros: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetails {
    pub product_id: String,
    pub product_type: ProductType,
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_purchase_offer_details: Option<OneTimePurchaseOffer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_offer_details: Option<Vec<SubscriptionOffer>>,
}

/// A product the service could not return details for, with the SDK's
/// status-code reason.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfetchedProduct {
    pub product_id: String,
    pub reason: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SayHelloRequest {
    #[serde(default)]
    pub says: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPurchasesRequest {
    #[serde(default)]
    pub product_type: ProductType,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryProductDetailsRequest {
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub product_type: ProductType,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub product_ids: Vec<String>,
    #[serde(default)]
    pub is_offer_personalized: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub product_ids: Vec<String>,
    pub base_plan_ids: Vec<String>,
    #[serde(default)]
    pub is_offer_personalized: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumePurchaseRequest {
    pub purchase_token: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcknowledgePurchaseRequest {
    pub purchase_token: String,
}

#[cfg(any(target_os = "android", test))]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LaunchPurchaseFlowRequest {
    pub product_id: String,
    pub product_type: ProductType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_token: Option<String>,
    pub is_offer_personalized: bool,
}

#[cfg(any(target_os = "android", test))]
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct SdkAck {
    #[serde(flatten)]
    pub status: SdkStatus,
}

#[cfg(any(target_os = "android", test))]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryPurchasesResponse {
    #[serde(flatten)]
    pub status: SdkStatus,
    #[serde(default)]
    pub purchases: Vec<Purchase>,
}

#[cfg(any(target_os = "android", test))]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryProductDetailsResponse {
    #[serde(flatten)]
    pub status: SdkStatus,
    #[serde(default)]
    pub product_details: Vec<ProductDetails>,
    #[serde(default)]
    pub unfetched_products: Vec<UnfetchedProduct>,
}

#[cfg(any(target_os = "android", test))]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConsumePurchaseResponse {
    #[serde(flatten)]
    pub status: SdkStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_token: Option<String>,
}

/// Callbacks streamed from the billing client's listeners over the
/// connection channel.
#[cfg(any(target_os = "android", test))]
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub(crate) enum SdkCallback {
    #[serde(rename_all = "camelCase")]
    SetupFinished {
        response_code: BillingResponseCode,
        #[serde(default)]
        debug_message: String,
    },
    ServiceDisconnected,
    #[serde(rename_all = "camelCase")]
    PurchasesUpdated {
        response_code: BillingResponseCode,
        #[serde(default)]
        debug_message: String,
        purchases: Option<Vec<Purchase>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_code_roundtrips_known_and_unknown_values() {
        for code in [-3, -2, -1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 12] {
            let parsed = BillingResponseCode::from_code(code);
            assert_eq!(parsed.code(), code);
            assert!(!matches!(parsed, BillingResponseCode::Other(_)));
        }
        let unknown = BillingResponseCode::from_code(99);
        assert_eq!(unknown, BillingResponseCode::Other(99));
        assert_eq!(serde_json::to_value(unknown).unwrap(), json!(99));
    }

    #[test]
    fn purchase_state_rejects_out_of_range_values() {
        assert_eq!(
            serde_json::from_value::<PurchaseState>(json!(1)).unwrap(),
            PurchaseState::Purchased
        );
        assert!(serde_json::from_value::<PurchaseState>(json!(7)).is_err());
    }

    #[test]
    fn purchase_deserializes_from_sdk_payload() {
        let purchase: Purchase = serde_json::from_value(json!({
            "orderId": "GPA.1234-5678",
            "packageName": "com.example.app",
            "products": ["gold_pack"],
            "purchaseState": 1,
            "purchaseTime": 1722470400000i64,
            "purchaseToken": "opaque-token",
            "quantity": 1,
            "isAcknowledged": false,
            "isAutoRenewing": false,
            "originalJson": "{}",
            "signature": "sig"
        }))
        .unwrap();
        assert_eq!(purchase.products, vec!["gold_pack"]);
        assert_eq!(purchase.purchase_state, PurchaseState::Purchased);
        assert!(purchase.account_identifiers.is_none());
    }

    #[test]
    fn product_details_carry_subscription_offers() {
        let details: ProductDetails = serde_json::from_value(json!({
            "productId": "premium",
            "productType": "subs",
            "name": "Premium",
            "title": "Premium (App)",
            "description": "All features",
            "subscriptionOfferDetails": [{
                "basePlanId": "monthly",
                "offerId": null,
                "offerToken": "tok-1",
                "offerTags": ["intro"],
                "pricingPhases": [{
                    "billingCycleCount": 0,
                    "billingPeriod": "P1M",
                    "formattedPrice": "$4.99",
                    "priceAmountMicros": 4990000i64,
                    "priceCurrencyCode": "USD",
                    "recurrenceMode": 1
                }]
            }]
        }))
        .unwrap();
        assert_eq!(details.product_type, ProductType::Subs);
        let offers = details.subscription_offer_details.unwrap();
        assert_eq!(offers[0].offer_token, "tok-1");
        assert_eq!(offers[0].pricing_phases[0].billing_period, "P1M");
    }

    #[test]
    fn query_request_defaults_to_inapp() {
        let request: QueryProductDetailsRequest =
            serde_json::from_value(json!({ "productIds": ["gold_pack"] })).unwrap();
        assert_eq!(request.product_type, ProductType::Inapp);
        assert_eq!(request.product_type.as_str(), "inapp");
    }

    #[test]
    fn launch_flow_request_omits_missing_offer_token() {
        let request = LaunchPurchaseFlowRequest {
            product_id: "gold_pack".into(),
            product_type: ProductType::Inapp,
            offer_token: None,
            is_offer_personalized: false,
        };
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(value["productId"], "gold_pack");
        assert_eq!(value["productType"], "inapp");
        assert!(value.get("offerToken").is_none());
    }

    #[test]
    fn sdk_ack_flattens_status_fields() {
        let ack: SdkAck = serde_json::from_value(json!({
            "responseCode": 0,
            "debugMessage": ""
        }))
        .unwrap();
        assert!(ack.status.response_code.is_ok());
    }

    #[test]
    fn sdk_callback_uses_event_tag() {
        let callback: SdkCallback = serde_json::from_value(json!({
            "event": "purchasesUpdated",
            "responseCode": 1,
            "debugMessage": "User canceled"
        }))
        .unwrap();
        match callback {
            SdkCallback::PurchasesUpdated {
                response_code,
                purchases,
                ..
            } => {
                assert_eq!(response_code, BillingResponseCode::UserCanceled);
                assert!(purchases.is_none());
            }
            other => panic!("unexpected callback: {other:?}"),
        }
    }

    #[test]
    fn config_defaults_enable_pending_one_time_products() {
        let config: Config = serde_json::from_value(json!({})).unwrap();
        assert!(config.enable_pending_one_time_products);
        let config: Config =
            serde_json::from_value(json!({ "enablePendingOneTimeProducts": false })).unwrap();
        assert!(!config.enable_pending_one_time_products);
    }
}
