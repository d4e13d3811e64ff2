use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime};

use crate::models::{
    BillingResponseCode, ConsumePurchaseResponse, ProductDetails, Purchase,
    QueryProductDetailsResponse, QueryPurchasesResponse, SdkStatus, UnfetchedProduct,
};

pub(crate) const PLUGIN_NAME: &str = "play-billing";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloPayload {
    pub says: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub response_code: BillingResponseCode,
    pub debug_message: String,
}

impl From<SdkStatus> for StatusPayload {
    fn from(status: SdkStatus) -> Self {
        Self {
            response_code: status.response_code,
            debug_message: status.debug_message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasesPayload {
    pub response_code: BillingResponseCode,
    pub purchases: Vec<Purchase>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailsPayload {
    pub response_code: BillingResponseCode,
    pub product_details: Vec<ProductDetails>,
    pub unfetched_products: Vec<UnfetchedProduct>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseErrorPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<BillingResponseCode>,
    pub debug_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_plan_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub response_code: BillingResponseCode,
    pub debug_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_token: Option<String>,
}

/// Diagnostic payload for the `billing-info` signal. Always stamped with
/// the plugin name so scripts can tell apart multiple plugins feeding the
/// same listener.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoPayload {
    pub plugin_name: &'static str,
    pub fun_name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<BillingResponseCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_message: Option<String>,
}

impl InfoPayload {
    pub fn new(fun_name: &'static str) -> Self {
        Self {
            plugin_name: PLUGIN_NAME,
            fun_name,
            response_code: None,
            debug_message: None,
        }
    }

    pub fn with_status(mut self, response_code: BillingResponseCode, message: String) -> Self {
        self.response_code = Some(response_code);
        self.debug_message = Some(message);
        self
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.debug_message = Some(message);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotImplementedPayload {
    pub status: &'static str,
    pub fun_name: &'static str,
    pub debug_message: String,
}

impl NotImplementedPayload {
    pub fn new(fun_name: &'static str) -> Self {
        Self {
            status: "not_implemented",
            fun_name,
            debug_message: format!("{fun_name} is not yet implemented."),
        }
    }
}

/// One engine-facing signal. Every asynchronous billing outcome maps to
/// exactly one variant; `name` is the event the host scripts listen on.
#[derive(Debug, Clone)]
pub(crate) enum BillingEvent {
    HelloResponse(HelloPayload),
    StartConnection,
    Connected,
    Disconnected,
    QueryPurchases(PurchasesPayload),
    QueryPurchasesError(StatusPayload),
    QueryProductDetails(ProductDetailsPayload),
    QueryProductDetailsError(StatusPayload),
    PurchaseError(PurchaseErrorPayload),
    PurchasesUpdated(PurchasesPayload),
    PurchaseCancelled(StatusPayload),
    PurchasesUpdateError(StatusPayload),
    PurchaseConsumed(TokenPayload),
    PurchaseConsumedError(TokenPayload),
    PurchaseAcknowledged(TokenPayload),
    PurchaseAcknowledgedError(TokenPayload),
    BillingInfo(InfoPayload),
    InAppMessageResult(NotImplementedPayload),
    PriceChangeError(NotImplementedPayload),
    AlternativeBillingOnlyTransactionReported(NotImplementedPayload),
}

impl BillingEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BillingEvent::HelloResponse(_) => "play-billing://hello-response",
            BillingEvent::StartConnection => "play-billing://start-connection",
            BillingEvent::Connected => "play-billing://connected",
            BillingEvent::Disconnected => "play-billing://disconnected",
            BillingEvent::QueryPurchases(_) => "play-billing://query-purchases",
            BillingEvent::QueryPurchasesError(_) => "play-billing://query-purchases-error",
            BillingEvent::QueryProductDetails(_) => "play-billing://query-product-details",
            BillingEvent::QueryProductDetailsError(_) => {
                "play-billing://query-product-details-error"
            }
            BillingEvent::PurchaseError(_) => "play-billing://purchase-error",
            BillingEvent::PurchasesUpdated(_) => "play-billing://purchases-updated",
            BillingEvent::PurchaseCancelled(_) => "play-billing://purchase-cancelled",
            BillingEvent::PurchasesUpdateError(_) => "play-billing://purchases-update-error",
            BillingEvent::PurchaseConsumed(_) => "play-billing://purchase-consumed",
            BillingEvent::PurchaseConsumedError(_) => "play-billing://purchase-consumed-error",
            BillingEvent::PurchaseAcknowledged(_) => "play-billing://purchase-acknowledged",
            BillingEvent::PurchaseAcknowledgedError(_) => {
                "play-billing://purchase-acknowledged-error"
            }
            BillingEvent::BillingInfo(_) => "play-billing://billing-info",
            BillingEvent::InAppMessageResult(_) => "play-billing://in-app-message-result",
            BillingEvent::PriceChangeError(_) => "play-billing://price-change-error",
            BillingEvent::AlternativeBillingOnlyTransactionReported(_) => {
                "play-billing://alternative-billing-only-transaction-reported"
            }
        }
    }
}

pub(crate) fn emit<R: Runtime>(app: &AppHandle<R>, event: BillingEvent) -> crate::Result<()> {
    let name = event.name();
    match event {
        BillingEvent::StartConnection | BillingEvent::Connected | BillingEvent::Disconnected => {
            app.emit(name, ())?
        }
        BillingEvent::HelloResponse(payload) => app.emit(name, payload)?,
        BillingEvent::QueryPurchases(payload) | BillingEvent::PurchasesUpdated(payload) => {
            app.emit(name, payload)?
        }
        BillingEvent::QueryPurchasesError(payload)
        | BillingEvent::QueryProductDetailsError(payload)
        | BillingEvent::PurchaseCancelled(payload)
        | BillingEvent::PurchasesUpdateError(payload) => app.emit(name, payload)?,
        BillingEvent::QueryProductDetails(payload) => app.emit(name, payload)?,
        BillingEvent::PurchaseError(payload) => app.emit(name, payload)?,
        BillingEvent::PurchaseConsumed(payload)
        | BillingEvent::PurchaseConsumedError(payload)
        | BillingEvent::PurchaseAcknowledged(payload)
        | BillingEvent::PurchaseAcknowledgedError(payload) => app.emit(name, payload)?,
        BillingEvent::BillingInfo(payload) => app.emit(name, payload)?,
        BillingEvent::InAppMessageResult(payload)
        | BillingEvent::PriceChangeError(payload)
        | BillingEvent::AlternativeBillingOnlyTransactionReported(payload) => {
            app.emit(name, payload)?
        }
    }
    Ok(())
}

/// Routes a purchases-updated callback. `OK` without a purchase list is the
/// service echoing an already-handled update and produces no signal.
pub(crate) fn purchases_update_event(
    response_code: BillingResponseCode,
    debug_message: String,
    purchases: Option<Vec<Purchase>>,
) -> Option<BillingEvent> {
    match response_code {
        BillingResponseCode::Ok => purchases.map(|purchases| {
            BillingEvent::PurchasesUpdated(PurchasesPayload {
                response_code,
                purchases,
            })
        }),
        BillingResponseCode::UserCanceled => {
            Some(BillingEvent::PurchaseCancelled(StatusPayload {
                response_code,
                debug_message,
            }))
        }
        _ => Some(BillingEvent::PurchasesUpdateError(StatusPayload {
            response_code,
            debug_message,
        })),
    }
}

pub(crate) fn query_purchases_event(response: QueryPurchasesResponse) -> BillingEvent {
    if response.status.response_code.is_ok() {
        BillingEvent::QueryPurchases(PurchasesPayload {
            response_code: response.status.response_code,
            purchases: response.purchases,
        })
    } else {
        BillingEvent::QueryPurchasesError(response.status.into())
    }
}

pub(crate) fn query_product_details_event(response: QueryProductDetailsResponse) -> BillingEvent {
    if response.status.response_code.is_ok() {
        BillingEvent::QueryProductDetails(ProductDetailsPayload {
            response_code: response.status.response_code,
            product_details: response.product_details,
            unfetched_products: response.unfetched_products,
        })
    } else {
        BillingEvent::QueryProductDetailsError(response.status.into())
    }
}

pub(crate) fn consume_event(
    purchase_token: String,
    response: ConsumePurchaseResponse,
) -> BillingEvent {
    let payload = TokenPayload {
        response_code: response.status.response_code,
        debug_message: response.status.debug_message,
        purchase_token: response.purchase_token.or(Some(purchase_token)),
    };
    if payload.response_code.is_ok() {
        BillingEvent::PurchaseConsumed(payload)
    } else {
        BillingEvent::PurchaseConsumedError(payload)
    }
}

pub(crate) fn acknowledge_event(purchase_token: String, status: SdkStatus) -> BillingEvent {
    let payload = TokenPayload {
        response_code: status.response_code,
        debug_message: status.debug_message,
        purchase_token: Some(purchase_token),
    };
    if payload.response_code.is_ok() {
        BillingEvent::PurchaseAcknowledged(payload)
    } else {
        BillingEvent::PurchaseAcknowledgedError(payload)
    }
}
